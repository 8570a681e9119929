//! The site's page behavior modules.
//!
//! One module per interactive page, each implementing
//! [`BehaviorModule`](crate::behavior::BehaviorModule). DOM wiring is
//! wasm-only; the view-building helpers are pure functions so the modules'
//! rendering logic runs under native tests too. All listeners go through
//! [`EventHandle`](crate::dom::EventHandle) guards parked on the module's
//! handle, so detaching a page removes its listeners entirely.

pub mod create;
pub mod lessons;
pub mod login;
pub mod paths;
pub mod profile;
pub mod topics;

pub use create::CreatePage;
pub use lessons::LessonsPage;
pub use login::LoginPage;
pub use paths::PathsPage;
pub use profile::ProfilePage;
pub use topics::TopicsPage;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::behavior::BehaviorRegistry;

/// Builds the registry of all EduFlash page modules.
pub fn default_registry(api: Arc<ApiClient>) -> BehaviorRegistry {
	let mut registry = BehaviorRegistry::new();

	registry.register("login", || Box::new(LoginPage::new()));

	let paths_api = api.clone();
	registry.register("paths", move || Box::new(PathsPage::new(paths_api.clone())));

	let topics_api = api.clone();
	registry.register("topics", move || Box::new(TopicsPage::new(topics_api.clone())));

	let lessons_api = api.clone();
	registry.register("lessons", move || Box::new(LessonsPage::new(lessons_api.clone())));

	registry.register("profile", || Box::new(ProfilePage::new()));
	registry.register("create", || Box::new(CreatePage::new()));

	registry
}

/// Escapes text for interpolation into markup.
pub(crate) fn html_escape(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

/// Shows a transient toast message, removed again after three seconds.
#[cfg(target_arch = "wasm32")]
pub(crate) fn show_message(text: &str) {
	use std::time::Duration;

	let Some(document) = crate::dom::document() else {
		return;
	};
	let Some(body) = document.body() else {
		return;
	};
	let Ok(toast) = document.create_element("div") else {
		return;
	};
	toast.set_class_name("toast-message");
	toast.set_text_content(Some(text));
	if body.append_child(&toast).is_err() {
		return;
	}

	crate::platform::spawn_local(async move {
		crate::platform::sleep(Duration::from_secs(3)).await;
		toast.remove();
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_registry_covers_all_pages() {
		let registry = default_registry(Arc::new(ApiClient::new()));
		for name in ["login", "paths", "topics", "lessons", "profile", "create"] {
			assert!(registry.contains(name), "missing page module: {}", name);
		}
	}

	#[test]
	fn test_html_escape() {
		assert_eq!(html_escape("a < b & c"), "a &lt; b &amp; c");
		assert_eq!(html_escape(r#"say "hi""#), "say &quot;hi&quot;");
	}
}
