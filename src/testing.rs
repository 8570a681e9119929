//! Mock seams for exercising the navigation core without a browser.
//!
//! Everything here records what the router did to it (surface states,
//! chrome updates, content requests, behavior start/stop order) so tests
//! can assert on the externally visible protocol rather than on internals.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};
use crate::content::{ContentError, ContentSource};
use crate::session::SessionStore;
use crate::surface::{NavChrome, PageSurface};

/// In-memory session store.
#[derive(Debug, Default)]
pub struct FakeSessionStore {
	values: RefCell<HashMap<String, String>>,
}

impl FakeSessionStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a cookie value.
	pub fn set(&self, name: &str, value: &str) {
		self.values
			.borrow_mut()
			.insert(name.to_string(), value.to_string());
	}

	/// Removes a cookie.
	pub fn clear(&self, name: &str) {
		self.values.borrow_mut().remove(name);
	}
}

impl SessionStore for FakeSessionStore {
	fn read(&self, name: &str) -> Option<String> {
		self.values.borrow().get(name).cloned()
	}
}

/// A surface state transition observed by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
	/// The loading indicator was shown.
	Loading,
	/// Content markup was injected.
	Content(String),
	/// An error view was rendered.
	Error {
		/// The failed resource.
		resource: String,
		/// The error detail.
		detail: String,
	},
	/// The not-found view was rendered.
	NotFound,
	/// Focus moved into the new content.
	Focus,
}

/// Mount-point mock that records every state transition.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	events: RefCell<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
	/// Creates a surface with no recorded events.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns all recorded events in order.
	pub fn events(&self) -> Vec<SurfaceEvent> {
		self.events.borrow().clone()
	}

	/// Returns the last event, skipping focus moves.
	///
	/// The terminal visual state is what most tests assert on.
	pub fn terminal_state(&self) -> Option<SurfaceEvent> {
		self.events
			.borrow()
			.iter()
			.rev()
			.find(|e| !matches!(e, SurfaceEvent::Focus))
			.cloned()
	}
}

impl PageSurface for RecordingSurface {
	fn show_loading(&self) {
		self.events.borrow_mut().push(SurfaceEvent::Loading);
	}

	fn show_content(&self, html: &str) {
		self.events
			.borrow_mut()
			.push(SurfaceEvent::Content(html.to_string()));
	}

	fn show_error(&self, resource: &str, detail: &str) {
		self.events.borrow_mut().push(SurfaceEvent::Error {
			resource: resource.to_string(),
			detail: detail.to_string(),
		});
	}

	fn show_not_found(&self) {
		self.events.borrow_mut().push(SurfaceEvent::NotFound);
	}

	fn focus_first(&self) {
		self.events.borrow_mut().push(SurfaceEvent::Focus);
	}
}

/// Navigation-chrome mock recording active-link updates and menu closes.
#[derive(Debug, Default)]
pub struct RecordingChrome {
	active: RefCell<Vec<String>>,
	menu_closes: Cell<usize>,
}

impl RecordingChrome {
	/// Creates a chrome mock with no recorded updates.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns every path passed to `set_active`, in order.
	pub fn active_history(&self) -> Vec<String> {
		self.active.borrow().clone()
	}

	/// Returns the most recent active path.
	pub fn current_active(&self) -> Option<String> {
		self.active.borrow().last().cloned()
	}

	/// Returns how many times the menu was collapsed.
	pub fn menu_closes(&self) -> usize {
		self.menu_closes.get()
	}
}

impl NavChrome for RecordingChrome {
	fn set_active(&self, path: &str) {
		self.active.borrow_mut().push(path.to_string());
	}

	fn close_menu(&self) {
		self.menu_closes.set(self.menu_closes.get() + 1);
	}
}

#[derive(Debug, Clone)]
struct Scripted {
	result: Result<String, ContentError>,
	delay: Duration,
}

/// Content source answering from a script of canned responses.
#[derive(Debug, Default)]
pub struct ScriptedContentSource {
	responses: RefCell<HashMap<String, Scripted>>,
	requests: RefCell<Vec<String>>,
}

impl ScriptedContentSource {
	/// Creates a source with no scripted responses.
	pub fn new() -> Self {
		Self::default()
	}

	/// Scripts a successful response.
	pub fn ok(self, resource: &str, body: &str) -> Self {
		self.script(resource, Ok(body.to_string()), Duration::ZERO)
	}

	/// Scripts a successful response delivered after `delay`.
	pub fn ok_delayed(self, resource: &str, body: &str, delay: Duration) -> Self {
		self.script(resource, Ok(body.to_string()), delay)
	}

	/// Scripts a non-success HTTP status.
	pub fn status(self, resource: &str, status: u16) -> Self {
		self.script(resource, Err(ContentError::status(status, resource)), Duration::ZERO)
	}

	/// Scripts a network failure.
	pub fn network_failure(self, resource: &str, detail: &str) -> Self {
		self.script(resource, Err(ContentError::network(detail)), Duration::ZERO)
	}

	fn script(self, resource: &str, result: Result<String, ContentError>, delay: Duration) -> Self {
		self.responses
			.borrow_mut()
			.insert(resource.to_string(), Scripted { result, delay });
		self
	}

	/// Returns every requested resource, in request order.
	pub fn requests(&self) -> Vec<String> {
		self.requests.borrow().clone()
	}
}

#[async_trait(?Send)]
impl ContentSource for ScriptedContentSource {
	async fn fetch(&self, resource: &str, _token: u64) -> Result<String, ContentError> {
		self.requests.borrow_mut().push(resource.to_string());

		let scripted = self.responses.borrow().get(resource).cloned();
		match scripted {
			Some(Scripted { result, delay }) => {
				if !delay.is_zero() {
					crate::platform::sleep(delay).await;
				}
				result
			}
			None => Err(ContentError::network(format!("no scripted response for {}", resource))),
		}
	}
}

/// Shared, ordered log of behavior start/stop events.
#[derive(Debug, Clone, Default)]
pub struct SharedLog(Rc<RefCell<Vec<String>>>);

impl SharedLog {
	/// Creates an empty log.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an entry.
	pub fn push(&self, entry: impl Into<String>) {
		self.0.borrow_mut().push(entry.into());
	}

	/// Returns all entries in order.
	pub fn entries(&self) -> Vec<String> {
		self.0.borrow().clone()
	}
}

/// Behavior module that logs `start:{name}#{token}` / `stop:{name}#{token}`.
///
/// Optionally delays or fails its start, for race and error-path tests.
#[derive(Debug, Clone)]
pub struct ProbeBehavior {
	name: String,
	log: SharedLog,
	delay: Duration,
	fail: bool,
}

impl ProbeBehavior {
	/// Creates a probe module writing to `log`.
	pub fn new(name: &str, log: SharedLog) -> Self {
		Self {
			name: name.to_string(),
			log,
			delay: Duration::ZERO,
			fail: false,
		}
	}

	/// Delays the start by `delay`.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	/// Makes the start report a failure.
	pub fn failing(mut self) -> Self {
		self.fail = true;
		self
	}
}

#[async_trait(?Send)]
impl BehaviorModule for ProbeBehavior {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		if !self.delay.is_zero() {
			crate::platform::sleep(self.delay).await;
		}
		if self.fail {
			return Err(BehaviorError::failed(&self.name, "scripted failure"));
		}

		self.log.push(format!("start:{}#{}", self.name, ctx.load_token));

		let mut handle = BehaviorHandle::new(&self.name);
		let log = self.log.clone();
		let label = format!("stop:{}#{}", self.name, ctx.load_token);
		handle.on_stop(move || log.push(label));
		Ok(handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_scripted_source_records_requests() {
		let source = ScriptedContentSource::new().ok("a.html", "<h1>A</h1>");

		assert_eq!(source.fetch("a.html", 1).await.unwrap(), "<h1>A</h1>");
		assert!(source.fetch("b.html", 2).await.is_err());
		assert_eq!(source.requests(), vec!["a.html", "b.html"]);
	}

	#[test]
	fn test_recording_surface_terminal_state_skips_focus() {
		let surface = RecordingSurface::new();
		surface.show_loading();
		surface.show_content("<h1>Hi</h1>");
		surface.focus_first();

		assert_eq!(
			surface.terminal_state(),
			Some(SurfaceEvent::Content("<h1>Hi</h1>".to_string()))
		);
	}

	#[test]
	fn test_fake_session_store_roundtrip() {
		let store = FakeSessionStore::new();
		assert_eq!(store.read("session"), None);

		store.set("session", "tok");
		assert_eq!(store.read("session"), Some("tok".to_string()));

		store.clear("session");
		assert_eq!(store.read("session"), None);
	}
}
