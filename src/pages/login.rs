//! Login / signup page behavior.
//!
//! Toggles between the login and registration forms and enforces the
//! client-side password policy on signup. Authentication itself is the
//! backend's business; this page only drives the forms.

use async_trait::async_trait;

use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};

/// Checks the signup password policy.
///
/// At least eight characters, one lowercase, one uppercase, one digit, and
/// one special character from `@$!%*?&_`; nothing outside that alphabet.
pub fn password_meets_policy(password: &str) -> bool {
	const SPECIALS: &str = "@$!%*?&_";

	let mut has_lower = false;
	let mut has_upper = false;
	let mut has_digit = false;
	let mut has_special = false;

	for c in password.chars() {
		if c.is_ascii_lowercase() {
			has_lower = true;
		} else if c.is_ascii_uppercase() {
			has_upper = true;
		} else if c.is_ascii_digit() {
			has_digit = true;
		} else if SPECIALS.contains(c) {
			has_special = true;
		} else {
			return false;
		}
	}

	password.len() >= 8 && has_lower && has_upper && has_digit && has_special
}

/// The login / signup page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPage;

impl LoginPage {
	/// Creates the page module.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait(?Send)]
impl BehaviorModule for LoginPage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("login");

		#[cfg(target_arch = "wasm32")]
		let handle = wire(handle)?;

		crate::debug_log!("login page attached (token {})", ctx.load_token);
		Ok(handle)
	}
}

#[cfg(target_arch = "wasm32")]
fn wire(mut handle: BehaviorHandle) -> Result<BehaviorHandle, BehaviorError> {
	use wasm_bindgen::JsCast;

	use crate::dom::{EventHandle, element_by_id};
	use crate::pages::show_message;

	fn set_display(id: &str, value: &str) {
		if let Some(element) = element_by_id(id) {
			if let Some(element) = element.dyn_ref::<web_sys::HtmlElement>() {
				let _ = element.style().set_property("display", value);
			}
		}
	}

	fn input_value(id: &str) -> String {
		element_by_id(id)
			.and_then(|e| e.dyn_ref::<web_sys::HtmlInputElement>().map(|i| i.value()))
			.unwrap_or_default()
	}

	let register = element_by_id("register")
		.ok_or_else(|| BehaviorError::failed("login", "#register button missing"))?;
	let login = element_by_id("login")
		.ok_or_else(|| BehaviorError::failed("login", "#login button missing"))?;

	let show_register = EventHandle::listen(&register, "click", move |_| {
		set_display("registerForm", "block");
		set_display("loginForm", "none");
	})
	.map_err(|_| BehaviorError::failed("login", "failed to attach register listener"))?;
	handle.hold(show_register);

	let show_login = EventHandle::listen(&login, "click", move |_| {
		set_display("registerForm", "none");
		set_display("loginForm", "block");
	})
	.map_err(|_| BehaviorError::failed("login", "failed to attach login listener"))?;
	handle.hold(show_login);

	if let Some(register_form) = element_by_id("registerForm") {
		let validate = EventHandle::listen(&register_form, "submit", move |event| {
			let password = input_value("pass");
			let confirmation = input_value("confirmPass");

			if !password_meets_policy(&password) {
				event.prevent_default();
				show_message(
					"Password must be at least 8 characters long and contain an \
					uppercase letter, a lowercase letter, a number, and a special \
					character (@$!%*?&_).",
				);
			} else if password != confirmation {
				event.prevent_default();
				show_message("Passwords do not match! Please make sure both password fields are identical.");
			}
		})
		.map_err(|_| BehaviorError::failed("login", "failed to attach validation listener"))?;
		handle.hold(validate);
	}

	Ok(handle)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	#[rstest]
	#[case("Abcdef1!", true)]
	#[case("Str0ng_pass", true)]
	#[case("short1A!", true)]
	#[case("Ab1!", false)] // too short
	#[case("abcdefg1!", false)] // no uppercase
	#[case("ABCDEFG1!", false)] // no lowercase
	#[case("Abcdefgh!", false)] // no digit
	#[case("Abcdefg12", false)] // no special
	#[case("Abcdef1! ", false)] // space outside alphabet
	fn test_password_policy(#[case] password: &str, #[case] expected: bool) {
		assert_eq!(password_meets_policy(password), expected);
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let ctx = PageContext {
			key: "/login".to_string(),
			path: "/login".to_string(),
			params: HashMap::new(),
			load_token: 1,
		};
		let handle = LoginPage::new().start(&ctx).await.unwrap();
		assert_eq!(handle.name(), "login");
	}
}
