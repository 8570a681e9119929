//! Access decisions for protected routes.
//!
//! The guard sits between route resolution and page loading. For a
//! protected route without valid session evidence it replaces the pending
//! navigation with a redirect to the login route: the protected page's
//! content is never fetched and its behavior module never runs, not even
//! transiently.

use std::sync::Arc;

use crate::routes::RouteEntry;
use crate::session::{SESSION_COOKIE, SessionStore, is_valid_evidence};

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
	/// Navigation may proceed.
	Allowed,
	/// Navigation is replaced by a redirect to the given path.
	Redirect(String),
}

/// Decides whether a resolved route may render.
///
/// Session evidence is re-read from the store on every check; it is never
/// cached across navigations. The check is UI convenience only; see the
/// [`session`](crate::session) module for the trust boundary.
pub struct AccessGuard {
	sessions: Arc<dyn SessionStore>,
	login_path: String,
}

impl std::fmt::Debug for AccessGuard {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AccessGuard")
			.field("login_path", &self.login_path)
			.finish()
	}
}

impl AccessGuard {
	/// Creates a guard redirecting unauthenticated visitors to `login_path`.
	pub fn new(sessions: Arc<dyn SessionStore>, login_path: impl Into<String>) -> Self {
		Self {
			sessions,
			login_path: login_path.into(),
		}
	}

	/// Returns whether valid session evidence currently exists.
	pub fn has_session(&self) -> bool {
		let value = self.sessions.read(SESSION_COOKIE);
		is_valid_evidence(value.as_deref())
	}

	/// Checks a route against the current session evidence.
	pub fn check(&self, entry: &RouteEntry) -> AccessDecision {
		if !entry.is_protected() || self.has_session() {
			AccessDecision::Allowed
		} else {
			AccessDecision::Redirect(self.login_path.clone())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::FakeSessionStore;

	fn guard_with(value: Option<&str>) -> AccessGuard {
		let store = FakeSessionStore::new();
		if let Some(v) = value {
			store.set(SESSION_COOKIE, v);
		}
		AccessGuard::new(Arc::new(store), "/login")
	}

	#[test]
	fn test_unprotected_route_always_allowed() {
		let guard = guard_with(None);
		let entry = RouteEntry::new("/paths", "paths.html");
		assert_eq!(guard.check(&entry), AccessDecision::Allowed);
	}

	#[test]
	fn test_protected_route_with_session_allowed() {
		let guard = guard_with(Some("tok123"));
		let entry = RouteEntry::new("/profile", "profile.html").protected();
		assert_eq!(guard.check(&entry), AccessDecision::Allowed);
	}

	#[test]
	fn test_protected_route_without_session_redirects() {
		let guard = guard_with(None);
		let entry = RouteEntry::new("/profile", "profile.html").protected();
		assert_eq!(
			guard.check(&entry),
			AccessDecision::Redirect("/login".to_string())
		);
	}

	#[test]
	fn test_sentinel_cookie_counts_as_unset() {
		let guard = guard_with(Some("undefined"));
		let entry = RouteEntry::new("/profile", "profile.html").protected();
		assert_eq!(
			guard.check(&entry),
			AccessDecision::Redirect("/login".to_string())
		);
	}

	#[test]
	fn test_evidence_reread_each_check() {
		let store = Arc::new(FakeSessionStore::new());
		let guard = AccessGuard::new(store.clone(), "/login");
		let entry = RouteEntry::new("/profile", "profile.html").protected();

		assert_eq!(
			guard.check(&entry),
			AccessDecision::Redirect("/login".to_string())
		);

		// Logout-in-another-tab in reverse: evidence appears between checks.
		store.set(SESSION_COOKIE, "tok");
		assert_eq!(guard.check(&entry), AccessDecision::Allowed);
	}
}
