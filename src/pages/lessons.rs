//! Lessons page behavior.
//!
//! Without a route parameter the page shows the lessons grid; with one
//! (`#/lessons/arithmetic`) it shows the lessons of that topic, with a
//! breadcrumb recovered from the path catalog. Lesson content rendering
//! (markdown, math) is an external collaborator; this module only selects
//! and wires the views.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiClient, PathsDocument, Topic};
use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};
use crate::pages::html_escape;

/// Which view the lessons page shows for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonsView {
	/// The all-lessons grid.
	Grid,
	/// Lessons of one topic, by topic identifier.
	Topic(String),
}

/// Selects the view from the route parameters.
pub fn view_for(ctx: &PageContext) -> LessonsView {
	match ctx.param("lesson") {
		Some(id) => LessonsView::Topic(id.to_string()),
		None => LessonsView::Grid,
	}
}

/// A topic located in the catalog, with its breadcrumb context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTopic {
	/// Name of the learning path containing the topic.
	pub path_name: String,
	/// Name of the level containing the topic.
	pub level_name: String,
	/// The topic itself.
	pub topic: Topic,
}

/// Finds a topic anywhere in the catalog.
pub fn locate_topic(doc: &PathsDocument, id: &str) -> Option<LocatedTopic> {
	for path in &doc.paths {
		for level in &path.levels {
			if let Some(topic) = level.topics.iter().find(|t| t.id == id) {
				return Some(LocatedTopic {
					path_name: path.name.clone(),
					level_name: level.name.clone(),
					topic: topic.clone(),
				});
			}
		}
	}
	None
}

/// Builds the grid of topics that have community lessons.
pub fn render_lessons_grid(doc: &PathsDocument) -> String {
	let mut html = String::from(r#"<div class="path-container">"#);
	for path in &doc.paths {
		for level in &path.levels {
			for topic in level.topics.iter().filter(|t| t.has_community_lessons) {
				html.push_str(&format!(
					r##"<a class="path-box" href="#/lessons/{id}">
	<h3 class="path-title">{name}</h3>
	<p class="path-description">{path} · {level}</p>
	<p class="path-stats">Community lessons</p>
</a>"##,
					id = html_escape(&topic.id),
					name = html_escape(&topic.name),
					path = html_escape(&path.name),
					level = html_escape(&level.name),
				));
			}
		}
	}
	html.push_str("</div>");
	html
}

/// Builds the per-topic view with its breadcrumb.
pub fn render_topic_view(located: &LocatedTopic) -> String {
	format!(
		r##"<div class="topic-lessons-view">
	<a class="back-btn" href="#/lessons">← Back to Lessons</a>
	<p class="topic-lessons-breadcrumb">{path} · {level} · {topic}</p>
	<h2>{topic} lessons</h2>
	<div id="lesson-list"></div>
</div>"##,
		path = html_escape(&located.path_name),
		level = html_escape(&located.level_name),
		topic = html_escape(&located.topic.name),
	)
}

/// Builds the view shown when the requested topic is unknown.
pub fn render_unknown_topic(id: &str) -> String {
	format!(
		r##"<div class="error-message">
	<h3>No lessons found for {}</h3>
	<p><a href="#/lessons">← Back to Lessons</a></p>
</div>"##,
		html_escape(id)
	)
}

/// The lessons page.
#[derive(Debug, Clone)]
pub struct LessonsPage {
	// Only read by the wasm render path.
	#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
	api: Arc<ApiClient>,
}

impl LessonsPage {
	/// Creates the page module over a data client.
	pub fn new(api: Arc<ApiClient>) -> Self {
		Self { api }
	}
}

#[async_trait(?Send)]
impl BehaviorModule for LessonsPage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("lessons");

		#[cfg(target_arch = "wasm32")]
		{
			let doc: PathsDocument = self
				.api
				.get_json(crate::api::PATHS_DATA)
				.await
				.map_err(|e| BehaviorError::failed("lessons", e.to_string()))?;

			let Some(container) = crate::dom::query(".lessons-container") else {
				return Err(BehaviorError::failed("lessons", ".lessons-container missing"));
			};

			let markup = match view_for(ctx) {
				LessonsView::Grid => render_lessons_grid(&doc),
				LessonsView::Topic(id) => match locate_topic(&doc, &id) {
					Some(located) => render_topic_view(&located),
					None => render_unknown_topic(&id),
				},
			};
			container.set_inner_html(&markup);
		}

		crate::debug_log!("lessons page attached as {:?}", view_for(ctx));
		Ok(handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{LearningPath, Level};
	use std::collections::HashMap;

	fn sample_doc() -> PathsDocument {
		PathsDocument {
			paths: vec![LearningPath {
				id: "mathematics".to_string(),
				name: "Mathematics".to_string(),
				levels: vec![Level {
					name: "Beginner".to_string(),
					topics: vec![
						Topic {
							id: "arithmetic".to_string(),
							name: "Arithmetic".to_string(),
							has_community_lessons: true,
						},
						Topic {
							id: "fractions".to_string(),
							name: "Fractions".to_string(),
							has_community_lessons: false,
						},
					],
				}],
			}],
		}
	}

	fn context_with(params: &[(&str, &str)]) -> PageContext {
		PageContext {
			key: "/lessons/{lesson}".to_string(),
			path: "/lessons/arithmetic".to_string(),
			params: params
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
			load_token: 1,
		}
	}

	#[test]
	fn test_view_for() {
		assert_eq!(view_for(&context_with(&[])), LessonsView::Grid);
		assert_eq!(
			view_for(&context_with(&[("lesson", "arithmetic")])),
			LessonsView::Topic("arithmetic".to_string())
		);
	}

	#[test]
	fn test_locate_topic() {
		let located = locate_topic(&sample_doc(), "arithmetic").unwrap();
		assert_eq!(located.path_name, "Mathematics");
		assert_eq!(located.level_name, "Beginner");
		assert_eq!(located.topic.id, "arithmetic");

		assert!(locate_topic(&sample_doc(), "philosophy").is_none());
	}

	#[test]
	fn test_render_lessons_grid_filters_community_topics() {
		let html = render_lessons_grid(&sample_doc());
		assert!(html.contains("Arithmetic"));
		assert!(!html.contains("Fractions"));
	}

	#[test]
	fn test_render_topic_view_breadcrumb() {
		let located = locate_topic(&sample_doc(), "arithmetic").unwrap();
		let html = render_topic_view(&located);
		assert!(html.contains("Mathematics · Beginner · Arithmetic"));
		assert!(html.contains(r##"href="#/lessons""##));
	}

	#[test]
	fn test_render_unknown_topic() {
		let html = render_unknown_topic("philosophy");
		assert!(html.contains("No lessons found for philosophy"));
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let page = LessonsPage::new(Arc::new(ApiClient::new()));
		let handle = page.start(&context_with(&[])).await.unwrap();
		assert_eq!(handle.name(), "lessons");
	}
}
