//! Profile page behavior (protected route).
//!
//! Wires the edit-profile toggle, the save flow that copies the settings
//! form back into the profile header, and the share button. Persisting the
//! profile is the backend's business.

use async_trait::async_trait;

use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};

/// Builds the shareable profile URL for the current document location.
pub fn share_url(origin: &str, pathname: &str) -> String {
	format!("{}{}#/profile", origin, pathname)
}

/// The profile page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfilePage;

impl ProfilePage {
	/// Creates the page module.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait(?Send)]
impl BehaviorModule for ProfilePage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("profile");

		#[cfg(target_arch = "wasm32")]
		let handle = wire(handle)?;

		crate::debug_log!("profile page attached (token {})", ctx.load_token);
		Ok(handle)
	}
}

#[cfg(target_arch = "wasm32")]
fn wire(mut handle: BehaviorHandle) -> Result<BehaviorHandle, BehaviorError> {
	use std::cell::Cell;
	use std::rc::Rc;

	use wasm_bindgen::JsCast;

	use crate::dom::{EventHandle, element_by_id};
	use crate::pages::show_message;

	fn set_settings_visible(visible: bool) {
		if let Some(section) = element_by_id("settings-section") {
			if let Some(section) = section.dyn_ref::<web_sys::HtmlElement>() {
				let _ = section
					.style()
					.set_property("display", if visible { "block" } else { "none" });
			}
		}
		if let Some(button) = element_by_id("editProfileBtn") {
			button.set_text_content(Some(if visible { "Cancel Edit" } else { "Edit Profile" }));
		}
	}

	fn input_value(id: &str) -> Option<String> {
		let element = element_by_id(id)?;
		if let Some(input) = element.dyn_ref::<web_sys::HtmlInputElement>() {
			return Some(input.value());
		}
		element
			.dyn_ref::<web_sys::HtmlTextAreaElement>()
			.map(|area| area.value())
	}

	fn set_text(id: &str, value: &str) {
		if let Some(element) = element_by_id(id) {
			element.set_text_content(Some(value));
		}
	}

	let editing = Rc::new(Cell::new(false));

	if let Some(edit_btn) = element_by_id("editProfileBtn") {
		let editing = editing.clone();
		let toggle = EventHandle::listen(&edit_btn, "click", move |_| {
			let now_editing = !editing.get();
			editing.set(now_editing);
			set_settings_visible(now_editing);
		})
		.map_err(|_| BehaviorError::failed("profile", "failed to attach edit listener"))?;
		handle.hold(toggle);
	}

	if let Some(cancel_btn) = element_by_id("cancelEditBtn") {
		let editing = editing.clone();
		let cancel = EventHandle::listen(&cancel_btn, "click", move |_| {
			editing.set(false);
			set_settings_visible(false);
		})
		.map_err(|_| BehaviorError::failed("profile", "failed to attach cancel listener"))?;
		handle.hold(cancel);
	}

	if let Some(save_btn) = element_by_id("saveSettingsBtn") {
		let editing = editing.clone();
		let save = EventHandle::listen(&save_btn, "click", move |_| {
			if let Some(name) = input_value("displayName") {
				set_text("profileName", &name);
			}
			if let Some(username) = input_value("username") {
				set_text("profileUsername", &format!("@{}", username));
			}
			if let Some(bio) = input_value("bio") {
				set_text("profileBio", &bio);
			}
			editing.set(false);
			set_settings_visible(false);
			show_message("Profile updated successfully!");
		})
		.map_err(|_| BehaviorError::failed("profile", "failed to attach save listener"))?;
		handle.hold(save);
	}

	if let Some(share_btn) = element_by_id("shareProfileBtn") {
		let share = EventHandle::listen(&share_btn, "click", move |_| {
			let Some(location) = web_sys::window().map(|w| w.location()) else {
				return;
			};
			let origin = location.origin().unwrap_or_default();
			let pathname = location.pathname().unwrap_or_default();
			show_message(&format!("Profile URL: {}", share_url(&origin, &pathname)));
		})
		.map_err(|_| BehaviorError::failed("profile", "failed to attach share listener"))?;
		handle.hold(share);
	}

	Ok(handle)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_share_url() {
		assert_eq!(
			share_url("https://eduflash.example", "/"),
			"https://eduflash.example/#/profile"
		);
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let ctx = PageContext {
			key: "/profile".to_string(),
			path: "/profile".to_string(),
			params: HashMap::new(),
			load_token: 1,
		};
		let handle = ProfilePage::new().start(&ctx).await.unwrap();
		assert_eq!(handle.name(), "profile");
	}
}
