//! Seams between the navigation core and the browser UI.
//!
//! The router owns exactly two pieces of visible state: the single mount
//! point all page content is injected into, and the navigation chrome
//! (active-link marking, mobile menu). Both are reached through narrow
//! traits so the core stays testable without a DOM; the browser-backed
//! implementations live in [`dom`](crate::dom).

/// The single mount point for page content.
///
/// Implementations must guarantee the mount always ends a navigation in a
/// terminal visual state (content, error, or not-found), never stuck on
/// the loading indicator.
pub trait PageSurface {
	/// Shows the transient loading indicator, synchronously, before any
	/// fetch begins.
	fn show_loading(&self);

	/// Replaces the mount content with fetched markup.
	fn show_content(&self, html: &str);

	/// Renders an in-place error view for a failed resource.
	fn show_error(&self, resource: &str, detail: &str);

	/// Renders the terminal not-found view.
	fn show_not_found(&self);

	/// Moves keyboard focus to the first focusable element of the new
	/// content, falling back to the mount itself.
	fn focus_first(&self);
}

/// Navigation chrome kept in sync with the resolved route.
///
/// Chrome updates are best-effort UI polish: they run whether or not the
/// page load succeeds and must never fail a navigation.
pub trait NavChrome {
	/// Marks navigation links current/not-current against the given path.
	fn set_active(&self, path: &str);

	/// Collapses the mobile menu overlay and releases the scroll lock.
	fn close_menu(&self);
}
