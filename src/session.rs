//! Session evidence.
//!
//! The router decides whether to show protected UI by inspecting a
//! client-persisted `session` cookie. The check is deliberately weak (the
//! cookie only needs to be present, non-empty, and not the literal
//! `"undefined"` left behind by a cleared login) and exists purely to
//! avoid flashing protected pages at anonymous visitors. Real authorization
//! is enforced server-side; nothing here is security-sensitive.
//!
//! Evidence is re-read on every navigation rather than cached, because it
//! can change out-of-band (logout in another tab, cookie expiry).

/// Name of the session cookie inspected on every navigation.
pub const SESSION_COOKIE: &str = "session";

/// Sentinel value written by the login page when clearing a session.
pub const UNSET_SENTINEL: &str = "undefined";

/// Read-only access to client-persisted session state.
pub trait SessionStore {
	/// Returns the raw value of the named cookie, if present.
	fn read(&self, name: &str) -> Option<String>;
}

/// Extracts a cookie value from a `Cookie`-header-shaped string.
///
/// The whole string is percent-decoded first, matching how the site's pages
/// write and read the cookie.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
	let decoded = urlencoding::decode(header)
		.map(|cow| cow.into_owned())
		.unwrap_or_else(|_| header.to_string());

	for part in decoded.split(';') {
		let part = part.trim_start();
		if let Some(value) = part.strip_prefix(name) {
			if let Some(value) = value.strip_prefix('=') {
				return Some(value.to_string());
			}
		}
	}
	None
}

/// Applies the evidence validity policy to a raw cookie value.
///
/// Valid means present, non-empty, and not the `"undefined"` sentinel. Any
/// other value counts as an authenticated session; no expiry or signature
/// validation happens client-side.
pub fn is_valid_evidence(value: Option<&str>) -> bool {
	match value {
		Some(v) => !v.is_empty() && v != UNSET_SENTINEL,
		None => false,
	}
}

/// Session store backed by `document.cookie`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSessionStore;

#[cfg(target_arch = "wasm32")]
impl CookieSessionStore {
	/// Creates a cookie-backed store.
	pub fn new() -> Self {
		Self
	}
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for CookieSessionStore {
	fn read(&self, name: &str) -> Option<String> {
		use wasm_bindgen::JsCast;

		let document = web_sys::window()?.document()?;
		let html_document = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
		let header = html_document.cookie().ok()?;
		cookie_value(&header, name)
	}
}
