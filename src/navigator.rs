//! The navigation entry point.
//!
//! `Navigator` drives the full pipeline for one navigation: resolve the
//! location, consult the access guard, sync the chrome, load content,
//! cycle the behavior module. It is the single writer of all navigation
//! state; the mount point, the behavior slot, and the current-route
//! record are mutated from here and nowhere else.
//!
//! ## Latest navigation wins
//!
//! Every navigation is stamped with a monotonically increasing sequence
//! number. After every suspension point the navigator re-checks that its
//! stamp is still the latest; if a newer navigation has started in the
//! meantime, the older one abandons silently without touching the surface
//! or the behavior slot. A slow fetch can therefore never overwrite the
//! result of a faster navigation that started after it.

use std::sync::Arc;
use std::sync::Mutex;

use crate::behavior::{BehaviorError, PageContext};
use crate::content::{ContentError, ContentSource};
use crate::guard::{AccessDecision, AccessGuard};
use crate::lifecycle::BehaviorLifecycle;
use crate::location::Location;
use crate::routes::RouteTable;
use crate::surface::{NavChrome, PageSurface};

/// A load failure surfaced by a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
	/// The content fragment could not be fetched.
	Content(ContentError),
	/// The behavior module could not be loaded or started.
	Behavior(BehaviorError),
}

impl std::fmt::Display for NavigationError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Content(err) => write!(f, "content load failed: {}", err),
			Self::Behavior(err) => write!(f, "behavior load failed: {}", err),
		}
	}
}

impl std::error::Error for NavigationError {}

/// Terminal state of one navigation.
///
/// Every variant corresponds to a rendered surface state (or, for
/// [`Superseded`](Self::Superseded), to deliberately not touching the
/// surface at all); none of them represents an unhandled failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// Content rendered and any declared behavior module attached.
	Rendered(String),
	/// A protected route was replaced by a redirect to the given path.
	Redirected(String),
	/// No route matched; the not-found view rendered.
	NotFound,
	/// A load failure rendered the error view.
	Failed(NavigationError),
	/// A newer navigation started before this one finished; its result was
	/// discarded without rendering.
	Superseded,
}

#[derive(Debug, Default)]
struct NavigationState {
	epoch: u64,
	current_key: Option<String>,
}

/// The router / page-lifecycle manager.
pub struct Navigator {
	table: RouteTable,
	lifecycle: BehaviorLifecycle,
	guard: AccessGuard,
	content: Arc<dyn ContentSource>,
	surface: Arc<dyn PageSurface>,
	chrome: Arc<dyn NavChrome>,
	state: Mutex<NavigationState>,
}

impl std::fmt::Debug for Navigator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("table", &self.table)
			.field("current_route", &self.current_route())
			.finish()
	}
}

impl Navigator {
	/// Creates a navigator over the given table, lifecycle, and seams.
	pub fn new(
		table: RouteTable,
		lifecycle: BehaviorLifecycle,
		guard: AccessGuard,
		content: Arc<dyn ContentSource>,
		surface: Arc<dyn PageSurface>,
		chrome: Arc<dyn NavChrome>,
	) -> Self {
		Self {
			table,
			lifecycle,
			guard,
			content,
			surface,
			chrome,
			state: Mutex::new(NavigationState::default()),
		}
	}

	/// Returns the key of the last successfully resolved route.
	pub fn current_route(&self) -> Option<String> {
		self.state().current_key.clone()
	}

	/// Returns the name of the currently attached behavior module.
	pub fn attached_behavior(&self) -> Option<String> {
		self.lifecycle.attached_name()
	}

	/// Performs a full navigation for the given location fragment.
	///
	/// Never panics and never returns an error: every failure mode ends in
	/// a rendered surface state and a descriptive [`NavigationOutcome`].
	pub async fn navigate(&self, fragment: &str) -> NavigationOutcome {
		let seq = self.begin();
		let location = Location::parse(fragment);
		crate::debug_log!("navigation #{} to {}", seq, location.path);

		let Some((entry, resolved)) = self.table.resolve(&location.path, &location.query) else {
			crate::warn_log!("no route matches {}", location.path);
			self.chrome.set_active(&location.path);
			self.chrome.close_menu();
			self.lifecycle.detach();
			self.surface.show_not_found();
			self.finish(seq, None);
			return NavigationOutcome::NotFound;
		};

		if let AccessDecision::Redirect(target) = self.guard.check(entry) {
			crate::info_log!("{} is protected, redirecting to {}", location.path, target);
			// The redirect replaces the pending navigation: re-enter with
			// the login location instead of rendering anything here.
			Box::pin(self.navigate(&target)).await;
			return NavigationOutcome::Redirected(target);
		}

		// Chrome sync is best-effort and independent of load success; it
		// runs for the attempted route even when the fetch below fails.
		self.chrome.set_active(&location.path);
		self.chrome.close_menu();

		self.surface.show_loading();
		let token = self.lifecycle.next_token();
		let html = match self.content.fetch(entry.content(), token).await {
			Ok(html) => html,
			Err(err) => {
				if self.superseded(seq) {
					return NavigationOutcome::Superseded;
				}
				crate::error_log!("content fetch for {} failed: {}", entry.content(), err);
				self.lifecycle.detach();
				self.surface.show_error(entry.content(), &err.to_string());
				self.finish(seq, Some(resolved.key.clone()));
				return NavigationOutcome::Failed(NavigationError::Content(err));
			}
		};

		if self.superseded(seq) {
			return NavigationOutcome::Superseded;
		}

		self.surface.show_content(&html);
		self.surface.focus_first();

		// Detach-first: the departing module's teardown completes before
		// the next module's initialization is awaited.
		self.lifecycle.detach();

		if let Some(behavior) = entry.behavior() {
			let ctx = PageContext {
				key: resolved.key.clone(),
				path: location.path.clone(),
				params: resolved.params.clone(),
				load_token: token,
			};
			match self.lifecycle.load(behavior, &ctx).await {
				Ok(handle) => {
					if self.superseded(seq) {
						// A newer navigation owns the slot now; this
						// module was started for a stale page.
						handle.stop();
						return NavigationOutcome::Superseded;
					}
					self.lifecycle.store(handle);
				}
				Err(err) => {
					if self.superseded(seq) {
						return NavigationOutcome::Superseded;
					}
					crate::error_log!("behavior module {} failed: {}", behavior, err);
					self.surface.show_error(behavior, &err.to_string());
					self.finish(seq, Some(resolved.key.clone()));
					return NavigationOutcome::Failed(NavigationError::Behavior(err));
				}
			}
		}

		self.finish(seq, Some(resolved.key.clone()));
		crate::info_log!("navigation #{} rendered {}", seq, resolved.key);
		NavigationOutcome::Rendered(resolved.key)
	}

	/// Stamps a new navigation, making every older one stale.
	fn begin(&self) -> u64 {
		let mut state = self.state();
		state.epoch += 1;
		state.epoch
	}

	/// Returns whether a newer navigation has started since `seq`.
	fn superseded(&self, seq: u64) -> bool {
		self.state().epoch != seq
	}

	/// Records the navigation result if it is still the latest.
	fn finish(&self, seq: u64, key: Option<String>) {
		let mut state = self.state();
		if state.epoch == seq {
			state.current_key = key;
		}
	}

	fn state(&self) -> std::sync::MutexGuard<'_, NavigationState> {
		self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_navigation_error_display() {
		let err = NavigationError::Content(ContentError::status(500, "home.html"));
		assert_eq!(err.to_string(), "content load failed: home.html returned status 500");

		let err = NavigationError::Behavior(BehaviorError::timeout("paths"));
		assert_eq!(
			err.to_string(),
			"behavior load failed: behavior module paths timed out while starting"
		);
	}
}
