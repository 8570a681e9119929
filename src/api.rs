//! Thin JSON data client used by the page behavior modules.
//!
//! The backend proper (auth, search, lesson storage) is an external
//! collaborator; the page modules only need typed GET access to the data
//! documents the site serves, principally the learning-path catalog at
//! [`PATHS_DATA`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Locator of the learning-path catalog document.
pub const PATHS_DATA: &str = "static/data/paths.json";

/// Error raised by a data fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
	/// The request never produced a response.
	Network(String),
	/// The server answered with a non-success status.
	Status {
		/// HTTP status code.
		status: u16,
		/// The requested path.
		path: String,
	},
	/// The response body was not valid JSON for the expected type.
	Decode(String),
}

impl ApiError {
	/// Creates a network error.
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Creates a non-success status error.
	pub fn status(status: u16, path: impl Into<String>) -> Self {
		Self::Status {
			status,
			path: path.into(),
		}
	}

	/// Creates a decode error.
	pub fn decode(msg: impl Into<String>) -> Self {
		Self::Decode(msg.into())
	}
}

impl std::fmt::Display for ApiError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Network(msg) => write!(f, "network error: {}", msg),
			Self::Status { status, path } => write!(f, "{} returned status {}", path, status),
			Self::Decode(msg) => write!(f, "failed to decode response: {}", msg),
		}
	}
}

impl std::error::Error for ApiError {}

/// JSON GET client.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
	client: reqwest::Client,
	base: String,
}

impl ApiClient {
	/// Creates a client resolving paths relative to the document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a client resolving paths against `base`.
	pub fn with_base(base: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base: base.into(),
		}
	}

	/// Fetches and decodes a JSON document.
	pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
		let url = format!("{}{}", self.base, path);

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| ApiError::network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(ApiError::status(status.as_u16(), path));
		}

		let body = response
			.text()
			.await
			.map_err(|e| ApiError::network(e.to_string()))?;
		serde_json::from_str(&body).map_err(|e| ApiError::decode(e.to_string()))
	}
}

/// The learning-path catalog document.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PathsDocument {
	/// All learning paths offered by the site.
	pub paths: Vec<LearningPath>,
}

impl PathsDocument {
	/// Finds a path by its identifier.
	pub fn find_path(&self, id: &str) -> Option<&LearningPath> {
		self.paths.iter().find(|p| p.id == id)
	}
}

/// One learning path (e.g. mathematics), split into levels.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LearningPath {
	/// Stable identifier used in route parameters.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Difficulty levels in ascending order.
	pub levels: Vec<Level>,
}

impl LearningPath {
	/// Counts topics across all levels.
	pub fn topic_count(&self) -> usize {
		self.levels.iter().map(|l| l.topics.len()).sum()
	}
}

/// One difficulty level within a path.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Level {
	/// Display name.
	pub name: String,
	/// Topics taught at this level.
	pub topics: Vec<Topic>,
}

/// One topic within a level.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Topic {
	/// Stable identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Whether community-contributed lessons exist for this topic.
	#[serde(default, rename = "hasCommunityLessons")]
	pub has_community_lessons: bool,
}
