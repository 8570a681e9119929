//! Topic browser page behavior.
//!
//! Driven by the `path` route parameter (`#/topics/mathematics`): shows the
//! selected learning path's level grid first, then the chosen level's topic
//! grid. A missing or unknown path identifier renders an in-page error card
//! with a way back, not a page-level failure.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiClient, LearningPath, Level};
use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};
use crate::pages::html_escape;

/// Extracts the requested path identifier from the route parameters.
pub fn requested_path(ctx: &PageContext) -> Option<&str> {
	ctx.param("path")
}

/// Builds the level-grid markup for a learning path.
pub fn render_level_grid(path: &LearningPath) -> String {
	let mut html = String::from(r#"<div class="path-container">"#);
	for (index, level) in path.levels.iter().enumerate() {
		html.push_str(&format!(
			r#"<div class="path-box" data-level="{index}">
	<h3 class="path-title">{name}</h3>
	<p class="path-description">{topics} topics available</p>
	<p class="path-stats">Click to explore topics</p>
</div>"#,
			index = index,
			name = html_escape(&level.name),
			topics = level.topics.len(),
		));
	}
	html.push_str("</div>");
	html
}

/// Builds the topic-grid markup for a level.
pub fn render_topic_grid(level: &Level) -> String {
	let mut html =
		String::from(r#"<button class="back-to-levels" data-action="back">← Back to Levels</button>"#);
	html.push_str(r#"<div class="path-container">"#);
	for topic in &level.topics {
		let description = if topic.has_community_lessons {
			"Community lessons available"
		} else {
			"Standard lessons"
		};
		html.push_str(&format!(
			r##"<a class="path-box" href="#/lessons/{id}">
	<h3 class="path-title">{name}</h3>
	<p class="path-description">{description}</p>
	<p class="path-stats">Click to start learning</p>
</a>"##,
			id = html_escape(&topic.id),
			name = html_escape(&topic.name),
			description = description,
		));
	}
	html.push_str("</div>");
	html
}

/// Builds the in-page error card shown for a missing or unknown path.
pub fn render_error_card(message: &str) -> String {
	format!(
		r##"<div class="error-message">
	<h3>{}</h3>
	<p><a href="#/paths">← Back to Paths</a></p>
</div>"##,
		html_escape(message)
	)
}

/// The topic browser page.
#[derive(Debug, Clone)]
pub struct TopicsPage {
	// Only read by the wasm render path.
	#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
	api: Arc<ApiClient>,
}

impl TopicsPage {
	/// Creates the page module over a data client.
	pub fn new(api: Arc<ApiClient>) -> Self {
		Self { api }
	}
}

#[async_trait(?Send)]
impl BehaviorModule for TopicsPage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("topics");

		#[cfg(target_arch = "wasm32")]
		let handle = {
			let doc: crate::api::PathsDocument = self
				.api
				.get_json(crate::api::PATHS_DATA)
				.await
				.map_err(|e| BehaviorError::failed("topics", e.to_string()))?;
			wire(&doc, ctx, handle)?
		};

		crate::debug_log!("topics page attached for {:?}", requested_path(ctx));
		Ok(handle)
	}
}

#[cfg(target_arch = "wasm32")]
fn wire(
	doc: &crate::api::PathsDocument,
	ctx: &PageContext,
	mut handle: BehaviorHandle,
) -> Result<BehaviorHandle, BehaviorError> {
	use std::rc::Rc;

	use wasm_bindgen::JsCast;

	use crate::dom::{EventHandle, element_by_id, query};

	fn set_display(element: &web_sys::Element, value: &str) {
		if let Some(element) = element.dyn_ref::<web_sys::HtmlElement>() {
			let _ = element.style().set_property("display", value);
		}
	}

	fn set_header(title_html: &str, subtitle: &str) {
		if let Some(header) = element_by_id("header") {
			header.set_inner_html(title_html);
		}
		if let Some(node) = query(".subtitle") {
			node.set_text_content(Some(subtitle));
		}
	}

	let levels = element_by_id("level-container")
		.ok_or_else(|| BehaviorError::failed("topics", "#level-container missing"))?;
	let topics = element_by_id("topic-container")
		.ok_or_else(|| BehaviorError::failed("topics", "#topic-container missing"))?;

	let path = match requested_path(ctx) {
		Some(id) => match doc.find_path(id) {
			Some(path) => path.clone(),
			None => {
				levels.set_inner_html(&render_error_card("Path not found"));
				return Ok(handle);
			}
		},
		None => {
			levels.set_inner_html(&render_error_card("No path specified"));
			return Ok(handle);
		}
	};
	let path = Rc::new(path);

	let show_levels = {
		let levels = levels.clone();
		let topics = topics.clone();
		let path = path.clone();
		move || {
			set_header(
				&format!(
					r#"Choose your <span id="contrast">{}</span> level"#,
					html_escape(&path.name)
				),
				&format!("Select a {} level to explore topics", path.name.to_lowercase()),
			);
			set_display(&topics, "none");
			set_display(&levels, "grid");
			levels.set_inner_html(&render_level_grid(&path));
		}
	};
	show_levels();

	// One delegated listener per container instead of per-box handlers.
	let on_level_click = {
		let levels = levels.clone();
		let topics = topics.clone();
		let path = path.clone();
		move |event: web_sys::Event| {
			let Some(target) = event.target() else {
				return;
			};
			let Ok(element) = target.dyn_into::<web_sys::Element>() else {
				return;
			};
			let Ok(Some(box_el)) = element.closest("[data-level]") else {
				return;
			};
			let Some(index) = box_el
				.get_attribute("data-level")
				.and_then(|v| v.parse::<usize>().ok())
			else {
				return;
			};
			let Some(level) = path.levels.get(index) else {
				return;
			};

			set_header(
				&format!(
					r#"Choose your <span id="contrast">{}</span> topic"#,
					html_escape(&level.name)
				),
				&format!(
					"Select a {} topic in {}",
					level.name.to_lowercase(),
					path.name.to_lowercase()
				),
			);
			set_display(&levels, "none");
			set_display(&topics, "grid");
			topics.set_inner_html(&render_topic_grid(level));
		}
	};
	let level_clicks = EventHandle::listen(&levels, "click", on_level_click)
		.map_err(|_| BehaviorError::failed("topics", "failed to attach level listener"))?;
	handle.hold(level_clicks);

	let on_back_click = move |event: web_sys::Event| {
		let Some(target) = event.target() else {
			return;
		};
		let Ok(element) = target.dyn_into::<web_sys::Element>() else {
			return;
		};
		if element.closest(r#"[data-action="back"]"#).ok().flatten().is_none() {
			return;
		}
		show_levels();
	};
	let back_clicks = EventHandle::listen(&topics, "click", on_back_click)
		.map_err(|_| BehaviorError::failed("topics", "failed to attach back listener"))?;
	handle.hold(back_clicks);

	Ok(handle)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::Topic;
	use std::collections::HashMap;

	fn sample_path() -> LearningPath {
		LearningPath {
			id: "mathematics".to_string(),
			name: "Mathematics".to_string(),
			levels: vec![
				Level {
					name: "Beginner".to_string(),
					topics: vec![Topic {
						id: "arithmetic".to_string(),
						name: "Arithmetic".to_string(),
						has_community_lessons: true,
					}],
				},
				Level {
					name: "Advanced".to_string(),
					topics: vec![Topic {
						id: "calculus".to_string(),
						name: "Calculus".to_string(),
						has_community_lessons: false,
					}],
				},
			],
		}
	}

	fn context_with(params: &[(&str, &str)]) -> PageContext {
		PageContext {
			key: "/topics/{path}".to_string(),
			path: "/topics/mathematics".to_string(),
			params: params
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
			load_token: 1,
		}
	}

	#[test]
	fn test_requested_path() {
		let ctx = context_with(&[("path", "mathematics")]);
		assert_eq!(requested_path(&ctx), Some("mathematics"));

		let ctx = context_with(&[]);
		assert_eq!(requested_path(&ctx), None);
	}

	#[test]
	fn test_render_level_grid() {
		let html = render_level_grid(&sample_path());
		assert!(html.contains(r#"data-level="0""#));
		assert!(html.contains(r#"data-level="1""#));
		assert!(html.contains("Beginner"));
		assert!(html.contains("1 topics available"));
	}

	#[test]
	fn test_render_topic_grid_links_into_lessons() {
		let html = render_topic_grid(&sample_path().levels[0]);
		assert!(html.contains(r##"href="#/lessons/arithmetic""##));
		assert!(html.contains("Community lessons available"));
		assert!(html.contains(r#"data-action="back""#));
	}

	#[test]
	fn test_render_topic_grid_standard_lessons() {
		let html = render_topic_grid(&sample_path().levels[1]);
		assert!(html.contains("Standard lessons"));
	}

	#[test]
	fn test_render_error_card() {
		let html = render_error_card("Path not found");
		assert!(html.contains("Path not found"));
		assert!(html.contains(r##"href="#/paths""##));
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let page = TopicsPage::new(Arc::new(ApiClient::new()));
		let ctx = context_with(&[("path", "mathematics")]);
		let handle = page.start(&ctx).await.unwrap();
		assert_eq!(handle.name(), "topics");
	}
}
