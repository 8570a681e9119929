//! Browser-backed implementations of the navigation seams.
//!
//! Everything in this module talks to the real DOM through `web-sys` and is
//! only compiled for wasm32. The mount point is the `#app` element; the
//! navigation chrome is the set of `[data-route]` links plus the mobile
//! menu overlay.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event, EventTarget};

use crate::location::Location;
use crate::surface::{NavChrome, PageSurface};

/// Returns the document, if the script runs in a window context.
pub fn document() -> Option<Document> {
	web_sys::window()?.document()
}

/// Looks up an element by id.
pub fn element_by_id(id: &str) -> Option<Element> {
	document()?.get_element_by_id(id)
}

/// Runs the first match of a selector query against the document.
pub fn query(selector: &str) -> Option<Element> {
	document()?.query_selector(selector).ok().flatten()
}

/// A registered DOM event listener, removed again on drop.
///
/// Behavior modules register their listeners through this guard and park it
/// on their [`BehaviorHandle`](crate::behavior::BehaviorHandle), so
/// detaching the module removes the listener from the DOM entirely.
pub struct EventHandle {
	target: EventTarget,
	kind: String,
	closure: Closure<dyn FnMut(Event)>,
}

impl std::fmt::Debug for EventHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventHandle").field("kind", &self.kind).finish()
	}
}

impl EventHandle {
	/// Attaches a listener for `kind` events on `target`.
	pub fn listen(
		target: &EventTarget,
		kind: &str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, JsValue> {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
		target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			kind: kind.to_string(),
			closure,
		})
	}
}

impl Drop for EventHandle {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(&self.kind, self.closure.as_ref().unchecked_ref());
	}
}

/// The `#app` mount point.
#[derive(Debug, Clone)]
pub struct DomSurface {
	mount_id: String,
}

impl Default for DomSurface {
	fn default() -> Self {
		Self::new()
	}
}

impl DomSurface {
	/// Creates a surface over the default `#app` mount.
	pub fn new() -> Self {
		Self {
			mount_id: "app".to_string(),
		}
	}

	/// Creates a surface over a different mount element.
	pub fn with_mount(mount_id: impl Into<String>) -> Self {
		Self {
			mount_id: mount_id.into(),
		}
	}

	fn mount(&self) -> Option<Element> {
		let element = element_by_id(&self.mount_id);
		if element.is_none() {
			crate::warn_log!("mount point #{} not found", self.mount_id);
		}
		element
	}
}

impl PageSurface for DomSurface {
	fn show_loading(&self) {
		if let Some(mount) = self.mount() {
			mount.set_inner_html(r#"<div class="loading">Loading…</div>"#);
		}
	}

	fn show_content(&self, html: &str) {
		if let Some(mount) = self.mount() {
			mount.set_inner_html(html);
		}
	}

	fn show_error(&self, resource: &str, detail: &str) {
		if let Some(mount) = self.mount() {
			mount.set_inner_html(&format!(
				"<section class=\"container\"><h1>Error</h1>\
				<p>Could not load <code>{}</code>.</p>\
				<pre>{}</pre></section>",
				resource, detail
			));
		}
	}

	fn show_not_found(&self) {
		if let Some(mount) = self.mount() {
			mount.set_inner_html(
				r#"<section class="container"><h1>404</h1><p>Page not found.</p></section>"#,
			);
		}
	}

	fn focus_first(&self) {
		let Some(mount) = self.mount() else {
			return;
		};
		let focusable = mount
			.query_selector("h1, h2, [tabindex], a, button, input, textarea, select")
			.ok()
			.flatten();
		let target = focusable.unwrap_or(mount);
		if let Some(element) = target.dyn_ref::<web_sys::HtmlElement>() {
			let _ = element.focus();
		}
	}
}

/// Active-link marking and mobile-menu collapse against the real DOM.
#[derive(Debug, Clone)]
pub struct DomChrome {
	menu_id: String,
}

impl Default for DomChrome {
	fn default() -> Self {
		Self::new()
	}
}

impl DomChrome {
	/// Creates chrome sync over the default `#mobile-menu` overlay.
	pub fn new() -> Self {
		Self {
			menu_id: "mobile-menu".to_string(),
		}
	}
}

impl NavChrome for DomChrome {
	fn set_active(&self, path: &str) {
		let Some(document) = document() else {
			return;
		};
		let Ok(links) = document.query_selector_all("[data-route]") else {
			return;
		};

		for index in 0..links.length() {
			let Some(node) = links.item(index) else {
				continue;
			};
			let Ok(link) = node.dyn_into::<Element>() else {
				continue;
			};
			let href = link.get_attribute("href").unwrap_or_default();
			let is_current = Location::parse(&href).path == path;
			let _ = link.class_list().toggle_with_force("active", is_current);
		}
	}

	fn close_menu(&self) {
		if let Some(menu) = element_by_id(&self.menu_id) {
			let _ = menu.class_list().remove_1("open");
		}
		// Release the scroll lock the open overlay holds on the body.
		if let Some(body) = document().and_then(|d| d.body()) {
			let _ = body.style().set_property("overflow", "");
		}
	}
}
