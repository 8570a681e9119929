//! Guide-creation page behavior (protected route).
//!
//! Wires the markdown editor: live preview pane, mobile preview toggle, and
//! the save flow. Markdown/math rendering and guide persistence are
//! external collaborators, so the preview shows the raw text and saving
//! announces the derived title.

use async_trait::async_trait;

use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};

/// Extracts a guide title from its markdown content.
///
/// The first `# ` heading wins; `None` means the guide is untitled.
pub fn extract_title(content: &str) -> Option<&str> {
	content
		.lines()
		.map(str::trim)
		.find_map(|line| line.strip_prefix("# "))
		.map(str::trim)
		.filter(|title| !title.is_empty())
}

/// The guide-creation page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatePage;

impl CreatePage {
	/// Creates the page module.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait(?Send)]
impl BehaviorModule for CreatePage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("create");

		#[cfg(target_arch = "wasm32")]
		let handle = wire(handle)?;

		crate::debug_log!("create page attached (token {})", ctx.load_token);
		Ok(handle)
	}
}

#[cfg(target_arch = "wasm32")]
fn wire(mut handle: BehaviorHandle) -> Result<BehaviorHandle, BehaviorError> {
	use wasm_bindgen::JsCast;

	use crate::dom::{EventHandle, element_by_id, query};
	use crate::pages::show_message;

	fn editor_value() -> Option<String> {
		element_by_id("markdownEditor")?
			.dyn_ref::<web_sys::HtmlTextAreaElement>()
			.map(|area| area.value())
	}

	let editor = element_by_id("markdownEditor")
		.ok_or_else(|| BehaviorError::failed("create", "#markdownEditor missing"))?;
	let preview = element_by_id("previewContent")
		.ok_or_else(|| BehaviorError::failed("create", "#previewContent missing"))?;

	{
		let preview = preview.clone();
		let live_preview = EventHandle::listen(&editor, "input", move |_| {
			let text = editor_value().unwrap_or_default();
			preview.set_text_content(Some(&text));
		})
		.map_err(|_| BehaviorError::failed("create", "failed to attach preview listener"))?;
		handle.hold(live_preview);
	}

	if let Some(save_btn) = element_by_id("saveBtn") {
		let save = EventHandle::listen(&save_btn, "click", move |_| {
			let content = editor_value().unwrap_or_default();
			if content.trim().is_empty() {
				show_message("Please add some content before saving.");
				return;
			}
			let title = extract_title(&content).unwrap_or("Untitled Guide");
			show_message(&format!("Guide \"{}\" saved successfully!", title));
		})
		.map_err(|_| BehaviorError::failed("create", "failed to attach save listener"))?;
		handle.hold(save);
	}

	if let Some(toggle_btn) = element_by_id("previewToggle") {
		let toggle = EventHandle::listen(&toggle_btn, "click", move |_| {
			if let Some(editor_panel) = query(".editor-panel") {
				let _ = editor_panel.class_list().toggle("hide-mobile");
			}
			if let Some(preview_panel) = query(".preview-panel") {
				let _ = preview_panel.class_list().toggle("show-mobile");
			}
		})
		.map_err(|_| BehaviorError::failed("create", "failed to attach toggle listener"))?;
		handle.hold(toggle);
	}

	Ok(handle)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	#[rstest]
	#[case("# Linear Algebra\ncontent", Some("Linear Algebra"))]
	#[case("intro\n  # Indented Title\nmore", Some("Indented Title"))]
	#[case("## Subheading only", None)]
	#[case("no headings here", None)]
	#[case("#missing space", None)]
	#[case("# ", None)]
	#[case("", None)]
	fn test_extract_title(#[case] content: &str, #[case] expected: Option<&str>) {
		assert_eq!(extract_title(content), expected);
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let ctx = PageContext {
			key: "/create".to_string(),
			path: "/create".to_string(),
			params: HashMap::new(),
			load_token: 1,
		};
		let handle = CreatePage::new().start(&ctx).await.unwrap();
		assert_eq!(handle.name(), "create");
	}
}
