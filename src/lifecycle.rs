//! Single-slot behavior-module lifecycle.
//!
//! The lifecycle owns the one slot an attached module may occupy. Its state
//! machine has two states, `Empty` and `Attached`, and one ordering rule:
//! the previous module is detached (teardown run, handle dropped) before
//! the next module's initialization is awaited. Stale event listeners and
//! intervals from a departed page must not fire after navigating away.
//!
//! Module starts are awaited under a bound; a module that never signals
//! completion becomes a load failure instead of hanging the navigation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorRegistry, PageContext};
use crate::platform;

/// Default bound on a module's `start`.
pub const DEFAULT_START_BOUND: Duration = Duration::from_secs(10);

/// The single-slot lifecycle for behavior modules.
pub struct BehaviorLifecycle {
	registry: BehaviorRegistry,
	slot: Mutex<Option<BehaviorHandle>>,
	start_bound: Duration,
	next_token: AtomicU64,
}

impl std::fmt::Debug for BehaviorLifecycle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BehaviorLifecycle")
			.field("attached", &self.attached_name())
			.field("start_bound", &self.start_bound)
			.finish()
	}
}

impl BehaviorLifecycle {
	/// Creates a lifecycle over the given registry.
	pub fn new(registry: BehaviorRegistry) -> Self {
		Self {
			registry,
			slot: Mutex::new(None),
			start_bound: DEFAULT_START_BOUND,
			next_token: AtomicU64::new(1),
		}
	}

	/// Overrides the bound on module starts.
	pub fn with_start_bound(mut self, bound: Duration) -> Self {
		self.start_bound = bound;
		self
	}

	/// Allocates the next load token.
	///
	/// Tokens increase monotonically; each navigation gets a fresh one so
	/// module loads and content fetches are never deduplicated by caches.
	pub fn next_token(&self) -> u64 {
		self.next_token.fetch_add(1, Ordering::Relaxed)
	}

	/// Detaches the currently attached module, if any.
	///
	/// Returns whether a module was attached. After this call the slot is
	/// `Empty` and every teardown action of the departed module has run.
	pub fn detach(&self) -> bool {
		let previous = self.slot().take();
		match previous {
			Some(handle) => {
				crate::debug_log!("detaching behavior module {}", handle.name());
				handle.stop();
				true
			}
			None => false,
		}
	}

	/// Instantiates and starts the module registered under `resource`.
	///
	/// The returned handle is *not* stored; the caller decides whether the
	/// navigation that requested the load is still current before calling
	/// [`store`](Self::store). The wait is bounded: a module that neither
	/// completes nor fails within the bound yields
	/// [`BehaviorError::Timeout`].
	pub async fn load(
		&self,
		resource: &str,
		ctx: &PageContext,
	) -> Result<BehaviorHandle, BehaviorError> {
		let module = self.registry.instantiate(resource)?;
		match platform::timeout(self.start_bound, module.start(ctx)).await {
			Ok(result) => result,
			Err(_) => Err(BehaviorError::timeout(resource)),
		}
	}

	/// Stores a started module's handle in the slot.
	///
	/// The slot is expected to be empty, since the navigator detaches
	/// before loading. If a handle is somehow present it is stopped first,
	/// keeping the at-most-one invariant unconditional.
	pub fn store(&self, handle: BehaviorHandle) {
		let previous = self.slot().replace(handle);
		if let Some(stale) = previous {
			crate::warn_log!("slot occupied by {} at store time", stale.name());
			stale.stop();
		}
	}

	/// Returns whether a module is currently attached.
	pub fn is_attached(&self) -> bool {
		self.slot().is_some()
	}

	/// Returns the attached module's name, if any.
	pub fn attached_name(&self) -> Option<String> {
		self.slot().as_ref().map(|h| h.name().to_string())
	}

	fn slot(&self) -> std::sync::MutexGuard<'_, Option<BehaviorHandle>> {
		self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::behavior::BehaviorModule;
	use crate::testing::{ProbeBehavior, SharedLog};
	use async_trait::async_trait;
	use std::collections::HashMap;

	fn context(token: u64) -> PageContext {
		PageContext {
			key: "/paths".to_string(),
			path: "/paths".to_string(),
			params: HashMap::new(),
			load_token: token,
		}
	}

	fn lifecycle_with(log: &SharedLog) -> BehaviorLifecycle {
		let mut registry = BehaviorRegistry::new();
		let paths = log.clone();
		registry.register("paths", move || Box::new(ProbeBehavior::new("paths", paths.clone())));
		let lessons = log.clone();
		registry.register("lessons", move || {
			Box::new(ProbeBehavior::new("lessons", lessons.clone()))
		});
		BehaviorLifecycle::new(registry)
	}

	#[tokio::test]
	async fn test_attach_then_detach() {
		let log = SharedLog::new();
		let lifecycle = lifecycle_with(&log);

		let handle = lifecycle.load("paths", &context(1)).await.unwrap();
		lifecycle.store(handle);
		assert!(lifecycle.is_attached());
		assert_eq!(lifecycle.attached_name(), Some("paths".to_string()));

		assert!(lifecycle.detach());
		assert!(!lifecycle.is_attached());
		assert_eq!(log.entries(), vec!["start:paths#1", "stop:paths#1"]);
	}

	#[tokio::test]
	async fn test_detach_runs_before_next_start() {
		let log = SharedLog::new();
		let lifecycle = lifecycle_with(&log);

		let handle = lifecycle.load("paths", &context(1)).await.unwrap();
		lifecycle.store(handle);

		lifecycle.detach();
		let handle = lifecycle.load("lessons", &context(2)).await.unwrap();
		lifecycle.store(handle);

		assert_eq!(
			log.entries(),
			vec!["start:paths#1", "stop:paths#1", "start:lessons#2"]
		);
	}

	#[tokio::test]
	async fn test_detach_on_empty_slot_is_noop() {
		let log = SharedLog::new();
		let lifecycle = lifecycle_with(&log);
		assert!(!lifecycle.detach());
		assert!(log.entries().is_empty());
	}

	#[tokio::test]
	async fn test_unknown_module_fails_load() {
		let lifecycle = BehaviorLifecycle::new(BehaviorRegistry::new());
		let err = lifecycle.load("missing", &context(1)).await.unwrap_err();
		assert_eq!(err, BehaviorError::unknown("missing"));
	}

	#[tokio::test(start_paused = true)]
	async fn test_hung_start_times_out() {
		#[derive(Debug)]
		struct HungModule;

		#[async_trait(?Send)]
		impl BehaviorModule for HungModule {
			async fn start(&self, _ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
				std::future::pending().await
			}
		}

		let mut registry = BehaviorRegistry::new();
		registry.register("hung", || Box::new(HungModule));
		let lifecycle =
			BehaviorLifecycle::new(registry).with_start_bound(Duration::from_millis(100));

		let err = lifecycle.load("hung", &context(1)).await.unwrap_err();
		assert_eq!(err, BehaviorError::timeout("hung"));
		assert!(!lifecycle.is_attached());
	}

	#[tokio::test]
	async fn test_store_defensively_stops_occupant() {
		let log = SharedLog::new();
		let lifecycle = lifecycle_with(&log);

		let first = lifecycle.load("paths", &context(1)).await.unwrap();
		lifecycle.store(first);
		let second = lifecycle.load("lessons", &context(2)).await.unwrap();
		lifecycle.store(second);

		assert_eq!(lifecycle.attached_name(), Some("lessons".to_string()));
		assert_eq!(
			log.entries(),
			vec!["start:paths#1", "start:lessons#2", "stop:paths#1"]
		);
	}

	#[tokio::test]
	async fn test_tokens_increase() {
		let lifecycle = BehaviorLifecycle::new(BehaviorRegistry::new());
		let a = lifecycle.next_token();
		let b = lifecycle.next_token();
		assert!(b > a);
	}
}
