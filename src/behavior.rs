//! The behavior-module capability.
//!
//! A behavior module is the executable unit of page-specific logic attached
//! after content injection. The capability is explicit rather than
//! script-tag shaped: a module's [`start`] returns a [`BehaviorHandle`]
//! owning every teardown action, and the router calls
//! [`BehaviorHandle::stop`] before the next module starts. Deactivation
//! never depends on garbage collection or DOM removal timing.
//!
//! [`start`]: BehaviorModule::start

use std::collections::HashMap;

use async_trait::async_trait;

/// Error raised while loading or starting a behavior module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorError {
	/// No module is registered under the requested locator.
	Unknown(String),
	/// The module's initialization reported a failure.
	Failed {
		/// The module locator.
		resource: String,
		/// What went wrong.
		detail: String,
	},
	/// The module did not finish starting within the bounded wait.
	Timeout(String),
}

impl BehaviorError {
	/// Creates an unknown-module error.
	pub fn unknown(resource: impl Into<String>) -> Self {
		Self::Unknown(resource.into())
	}

	/// Creates an initialization-failure error.
	pub fn failed(resource: impl Into<String>, detail: impl Into<String>) -> Self {
		Self::Failed {
			resource: resource.into(),
			detail: detail.into(),
		}
	}

	/// Creates a bounded-wait expiry error.
	pub fn timeout(resource: impl Into<String>) -> Self {
		Self::Timeout(resource.into())
	}
}

impl std::fmt::Display for BehaviorError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unknown(resource) => write!(f, "no behavior module registered: {}", resource),
			Self::Failed { resource, detail } => {
				write!(f, "behavior module {} failed to start: {}", resource, detail)
			}
			Self::Timeout(resource) => {
				write!(f, "behavior module {} timed out while starting", resource)
			}
		}
	}
}

impl std::error::Error for BehaviorError {}

/// Per-attach context handed to a starting module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
	/// The matched route key.
	pub key: String,
	/// The normalized location path.
	pub path: String,
	/// Path parameters merged with query parameters.
	pub params: HashMap<String, String>,
	/// The navigation's load token. Fresh on every attach, so repeated
	/// visits to the same route re-run initialization instead of being
	/// deduplicated.
	pub load_token: u64,
}

impl PageContext {
	/// Returns a parameter by name.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

/// Ownership handle for an attached behavior module.
///
/// Holds the teardown actions registered during [`BehaviorModule::start`]
/// (listener removals, interval cancellations) and runs them exactly once
/// on [`stop`](Self::stop). Dropping an unstopped handle also runs them, as
/// a backstop; the lifecycle always stops explicitly.
pub struct BehaviorHandle {
	name: String,
	teardown: Vec<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for BehaviorHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BehaviorHandle")
			.field("name", &self.name)
			.field("teardown_count", &self.teardown.len())
			.finish()
	}
}

impl BehaviorHandle {
	/// Creates a handle for the named module.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			teardown: Vec::new(),
		}
	}

	/// Returns the module name this handle belongs to.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Registers a teardown action to run when the module is detached.
	pub fn on_stop(&mut self, action: impl FnOnce() + 'static) {
		self.teardown.push(Box::new(action));
	}

	/// Keeps `guard` alive until the module is detached.
	///
	/// Convenience for RAII resources such as DOM listener handles.
	pub fn hold<T: 'static>(&mut self, guard: T) {
		self.on_stop(move || drop(guard));
	}

	/// Detaches the module, running teardown in registration order.
	pub fn stop(mut self) {
		self.run_teardown();
	}

	fn run_teardown(&mut self) {
		for action in self.teardown.drain(..) {
			action();
		}
	}
}

impl Drop for BehaviorHandle {
	fn drop(&mut self) {
		self.run_teardown();
	}
}

/// The executable unit of page-specific logic.
#[async_trait(?Send)]
pub trait BehaviorModule: std::fmt::Debug {
	/// Runs the module's top-level initialization against the freshly
	/// injected content.
	///
	/// Every listener or timer the module installs must be registered on
	/// the returned handle so detaching removes it entirely.
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError>;
}

/// Factory producing a fresh module instance per attach.
pub type BehaviorFactory = Box<dyn Fn() -> Box<dyn BehaviorModule>>;

/// Registry mapping behavior locators to module factories.
///
/// Instantiating through a factory on every attach plays the role of a
/// cache-busted script URL: top-level initialization re-runs on every
/// visit, never skipped because a previous visit already executed it.
#[derive(Default)]
pub struct BehaviorRegistry {
	factories: HashMap<String, BehaviorFactory>,
}

impl std::fmt::Debug for BehaviorRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BehaviorRegistry")
			.field("modules", &self.factories.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl BehaviorRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a factory under a locator, replacing any previous one.
	pub fn register(
		&mut self,
		resource: impl Into<String>,
		factory: impl Fn() -> Box<dyn BehaviorModule> + 'static,
	) {
		self.factories.insert(resource.into(), Box::new(factory));
	}

	/// Returns whether a locator is registered.
	pub fn contains(&self, resource: &str) -> bool {
		self.factories.contains_key(resource)
	}

	/// Produces a fresh module instance for a locator.
	pub fn instantiate(&self, resource: &str) -> Result<Box<dyn BehaviorModule>, BehaviorError> {
		match self.factories.get(resource) {
			Some(factory) => Ok(factory()),
			None => Err(BehaviorError::unknown(resource)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell;
	use std::rc::Rc;

	#[derive(Debug)]
	struct NoopModule;

	#[async_trait(?Send)]
	impl BehaviorModule for NoopModule {
		async fn start(&self, _ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
			Ok(BehaviorHandle::new("noop"))
		}
	}

	fn context() -> PageContext {
		PageContext {
			key: "/paths".to_string(),
			path: "/paths".to_string(),
			params: HashMap::new(),
			load_token: 1,
		}
	}

	#[test]
	fn test_handle_runs_teardown_in_order() {
		let log = Rc::new(RefCell::new(Vec::new()));

		let mut handle = BehaviorHandle::new("probe");
		let first = log.clone();
		handle.on_stop(move || first.borrow_mut().push("first"));
		let second = log.clone();
		handle.on_stop(move || second.borrow_mut().push("second"));

		handle.stop();
		assert_eq!(*log.borrow(), vec!["first", "second"]);
	}

	#[test]
	fn test_handle_drop_backstop_runs_once() {
		let count = Rc::new(RefCell::new(0));

		{
			let mut handle = BehaviorHandle::new("probe");
			let count = count.clone();
			handle.on_stop(move || *count.borrow_mut() += 1);
		}
		assert_eq!(*count.borrow(), 1);
	}

	#[test]
	fn test_handle_hold_drops_guard_on_stop() {
		struct Guard(Rc<RefCell<bool>>);
		impl Drop for Guard {
			fn drop(&mut self) {
				*self.0.borrow_mut() = true;
			}
		}

		let dropped = Rc::new(RefCell::new(false));
		let mut handle = BehaviorHandle::new("probe");
		handle.hold(Guard(dropped.clone()));
		assert!(!*dropped.borrow());

		handle.stop();
		assert!(*dropped.borrow());
	}

	#[tokio::test]
	async fn test_registry_instantiates_fresh_modules() {
		let mut registry = BehaviorRegistry::new();
		registry.register("noop", || Box::new(NoopModule));
		assert!(registry.contains("noop"));

		let module = registry.instantiate("noop").unwrap();
		let handle = module.start(&context()).await.unwrap();
		assert_eq!(handle.name(), "noop");
	}

	#[test]
	fn test_registry_unknown_locator() {
		let registry = BehaviorRegistry::new();
		let err = registry.instantiate("missing").unwrap_err();
		assert_eq!(err, BehaviorError::unknown("missing"));
	}

	#[test]
	fn test_context_param_lookup() {
		let mut params = HashMap::new();
		params.insert("path".to_string(), "mathematics".to_string());
		let ctx = PageContext {
			key: "/topics/{path}".to_string(),
			path: "/topics/mathematics".to_string(),
			params,
			load_token: 3,
		};
		assert_eq!(ctx.param("path"), Some("mathematics"));
		assert_eq!(ctx.param("missing"), None);
	}

	#[test]
	fn test_behavior_error_display() {
		assert_eq!(
			BehaviorError::unknown("paths").to_string(),
			"no behavior module registered: paths"
		);
		assert_eq!(
			BehaviorError::failed("paths", "fetch failed").to_string(),
			"behavior module paths failed to start: fetch failed"
		);
		assert_eq!(
			BehaviorError::timeout("paths").to_string(),
			"behavior module paths timed out while starting"
		);
	}
}
