//! Boot wiring for the EduFlash client.
//!
//! Declares the site's route table and, on wasm, assembles the navigator
//! over the browser-backed seams, performs the initial dispatch, and
//! re-dispatches on every `hashchange`.

use std::sync::Arc;

use crate::navigator::Navigator;
use crate::routes::{RouteEntry, RouteTable};

/// Path of the login route, the redirect target for protected routes.
pub const LOGIN_PATH: &str = "/login";

/// Builds the site's route table.
///
/// The table is static configuration; an invalid declaration is a fatal
/// startup error, not something to limp past.
pub fn default_table() -> RouteTable {
	RouteTable::new(vec![
		RouteEntry::new("/", "static/pages/home.html"),
		RouteEntry::new(LOGIN_PATH, "static/pages/login_signup.html").with_behavior("login"),
		RouteEntry::new("/paths", "static/pages/paths.html").with_behavior("paths"),
		RouteEntry::new("/topics", "static/pages/topic.html").with_behavior("topics"),
		RouteEntry::new("/topics/{path}", "static/pages/topic.html").with_behavior("topics"),
		RouteEntry::new("/lessons", "static/pages/lessons.html").with_behavior("lessons"),
		RouteEntry::new("/lessons/{lesson}", "static/pages/lessons.html").with_behavior("lessons"),
		RouteEntry::new("/profile", "static/pages/profile.html")
			.with_behavior("profile")
			.protected(),
		RouteEntry::new("/create", "static/pages/create.html")
			.with_behavior("create")
			.protected(),
	])
	.expect("default route table is statically valid")
}

/// The assembled client application.
pub struct App {
	navigator: Arc<Navigator>,
}

impl std::fmt::Debug for App {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("App").field("navigator", &self.navigator).finish()
	}
}

impl App {
	/// Wraps an already-assembled navigator.
	pub fn new(navigator: Arc<Navigator>) -> Self {
		Self { navigator }
	}

	/// Returns the app's navigator.
	pub fn navigator(&self) -> Arc<Navigator> {
		self.navigator.clone()
	}

	/// Assembles the app over the browser-backed seams.
	#[cfg(target_arch = "wasm32")]
	pub fn bootstrap() -> Self {
		use crate::api::ApiClient;
		use crate::content::HttpContentSource;
		use crate::dom::{DomChrome, DomSurface};
		use crate::guard::AccessGuard;
		use crate::lifecycle::BehaviorLifecycle;
		use crate::pages::default_registry;
		use crate::session::CookieSessionStore;

		let lifecycle = BehaviorLifecycle::new(default_registry(Arc::new(ApiClient::new())));
		let guard = AccessGuard::new(Arc::new(CookieSessionStore::new()), LOGIN_PATH);
		let navigator = Navigator::new(
			default_table(),
			lifecycle,
			guard,
			Arc::new(HttpContentSource::new()),
			Arc::new(DomSurface::new()),
			Arc::new(DomChrome::new()),
		);
		Self::new(Arc::new(navigator))
	}

	/// Performs the initial dispatch and subscribes to `hashchange`.
	#[cfg(target_arch = "wasm32")]
	pub fn mount(self) -> Result<(), wasm_bindgen::JsValue> {
		use wasm_bindgen::JsCast;
		use wasm_bindgen::closure::Closure;

		dispatch(self.navigator.clone());

		let navigator = self.navigator.clone();
		let on_hashchange = Closure::wrap(Box::new(move |_: web_sys::Event| {
			dispatch(navigator.clone());
		}) as Box<dyn FnMut(web_sys::Event)>);

		let window = web_sys::window()
			.ok_or_else(|| wasm_bindgen::JsValue::from_str("window not available"))?;
		window.add_event_listener_with_callback(
			"hashchange",
			on_hashchange.as_ref().unchecked_ref(),
		)?;
		// The listener lives for the page lifetime, the same lifetime as
		// the navigation state itself.
		on_hashchange.forget();

		Ok(())
	}
}

/// Runs one navigation for the current fragment on the browser event loop.
#[cfg(target_arch = "wasm32")]
fn dispatch(navigator: Arc<Navigator>) {
	use crate::navigator::NavigationOutcome;

	crate::platform::spawn_local(async move {
		let fragment = crate::location::current_fragment();
		if let NavigationOutcome::Redirected(target) = navigator.navigate(&fragment).await {
			// Keep the address bar in step with the replaced navigation
			// without emitting another hashchange.
			crate::location::replace_fragment(&target);
		}
	});
}
