//! Learning-path browser page behavior.
//!
//! Fetches the path catalog and renders one card per learning path into the
//! `.selector` region. Cards are plain anchors into the topics route, so
//! selection rides the hash router instead of ad hoc click handling.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiClient, PathsDocument};
use crate::behavior::{BehaviorError, BehaviorHandle, BehaviorModule, PageContext};
use crate::pages::html_escape;

/// Builds the path-card grid markup.
pub fn render_path_cards(doc: &PathsDocument) -> String {
	let mut html = String::from(r#"<div class="path-container">"#);
	for path in &doc.paths {
		html.push_str(&format!(
			r##"<a class="path-box" href="#/topics/{id}">
	<h3 class="path-title">{name}</h3>
	<p class="path-description">{levels} levels available</p>
	<p class="path-stats">{topics} topics</p>
</a>"##,
			id = html_escape(&path.id),
			name = html_escape(&path.name),
			levels = path.levels.len(),
			topics = path.topic_count(),
		));
	}
	html.push_str("</div>");
	html
}

/// The learning-path browser page.
#[derive(Debug, Clone)]
pub struct PathsPage {
	// Only read by the wasm render path.
	#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
	api: Arc<ApiClient>,
}

impl PathsPage {
	/// Creates the page module over a data client.
	pub fn new(api: Arc<ApiClient>) -> Self {
		Self { api }
	}
}

#[async_trait(?Send)]
impl BehaviorModule for PathsPage {
	async fn start(&self, ctx: &PageContext) -> Result<BehaviorHandle, BehaviorError> {
		let handle = BehaviorHandle::new("paths");

		#[cfg(target_arch = "wasm32")]
		{
			let doc: PathsDocument = self
				.api
				.get_json(crate::api::PATHS_DATA)
				.await
				.map_err(|e| BehaviorError::failed("paths", e.to_string()))?;

			let Some(target) = crate::dom::query(".selector") else {
				return Err(BehaviorError::failed("paths", ".selector region missing"));
			};
			target.set_inner_html(&render_path_cards(&doc));
		}

		crate::debug_log!("paths page attached (token {})", ctx.load_token);
		Ok(handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::{LearningPath, Level, Topic};
	use std::collections::HashMap;

	fn sample_doc() -> PathsDocument {
		PathsDocument {
			paths: vec![LearningPath {
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
						topics: vec![
							Topic {
								id: "calculus".to_string(),
								name: "Calculus".to_string(),
								has_community_lessons: false,
							},
							Topic {
								id: "linear-algebra".to_string(),
								name: "Linear Algebra".to_string(),
								has_community_lessons: true,
							},
						],
					},
				],
			}],
		}
	}

	#[test]
	fn test_render_path_cards() {
		let html = render_path_cards(&sample_doc());

		assert!(html.contains(r##"href="#/topics/mathematics""##));
		assert!(html.contains("Mathematics"));
		assert!(html.contains("2 levels available"));
		assert!(html.contains("3 topics"));
	}

	#[test]
	fn test_render_path_cards_escapes_names() {
		let mut doc = sample_doc();
		doc.paths[0].name = "Math <script>".to_string();

		let html = render_path_cards(&doc);
		assert!(html.contains("Math &lt;script&gt;"));
		assert!(!html.contains("<script>"));
	}

	#[tokio::test]
	async fn test_start_returns_handle_natively() {
		let ctx = PageContext {
			key: "/paths".to_string(),
			path: "/paths".to_string(),
			params: HashMap::new(),
			load_token: 1,
		};
		let page = PathsPage::new(Arc::new(ApiClient::new()));
		let handle = page.start(&ctx).await.unwrap();
		assert_eq!(handle.name(), "paths");
	}
}
