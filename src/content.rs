//! Cache-bypassing content fetches.
//!
//! Every navigation fetches its markup fragment fresh: content resources
//! change between deployments, and a stale cached copy would silently
//! disagree with the behavior module shipped alongside it. Requests carry
//! both no-cache headers and a per-load `v` token in the query string.

use async_trait::async_trait;

/// Error raised by a content fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
	/// The request never produced a response.
	Network(String),
	/// The server answered with a non-success status.
	Status {
		/// HTTP status code.
		status: u16,
		/// The resource that was requested.
		resource: String,
	},
	/// The response body could not be read as text.
	Decode(String),
}

impl ContentError {
	/// Creates a network error.
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Creates a non-success status error.
	pub fn status(status: u16, resource: impl Into<String>) -> Self {
		Self::Status {
			status,
			resource: resource.into(),
		}
	}

	/// Creates a body decode error.
	pub fn decode(msg: impl Into<String>) -> Self {
		Self::Decode(msg.into())
	}
}

impl std::fmt::Display for ContentError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Network(msg) => write!(f, "network error: {}", msg),
			Self::Status { status, resource } => {
				write!(f, "{} returned status {}", resource, status)
			}
			Self::Decode(msg) => write!(f, "failed to read body: {}", msg),
		}
	}
}

impl std::error::Error for ContentError {}

/// Source of markup fragments.
#[async_trait(?Send)]
pub trait ContentSource {
	/// Fetches the markup for `resource`, bypassing caches.
	///
	/// `token` is the navigation's load token; implementations append it to
	/// the request so intermediaries cannot serve a previous navigation's
	/// copy.
	async fn fetch(&self, resource: &str, token: u64) -> Result<String, ContentError>;
}

/// HTTP-backed content source (browser fetch on wasm).
#[derive(Debug, Clone, Default)]
pub struct HttpContentSource {
	client: reqwest::Client,
	base: String,
}

impl HttpContentSource {
	/// Creates a source resolving resources relative to the document.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a source resolving resources against `base`.
	pub fn with_base(base: impl Into<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base: base.into(),
		}
	}
}

#[async_trait(?Send)]
impl ContentSource for HttpContentSource {
	async fn fetch(&self, resource: &str, token: u64) -> Result<String, ContentError> {
		let url = format!("{}{}?v={}", self.base, resource, token);

		let response = self
			.client
			.get(&url)
			.header("Cache-Control", "no-cache")
			.header("Pragma", "no-cache")
			.send()
			.await
			.map_err(|e| ContentError::network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			return Err(ContentError::status(status.as_u16(), resource));
		}

		response
			.text()
			.await
			.map_err(|e| ContentError::decode(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_content_error_display() {
		assert_eq!(
			ContentError::network("connection refused").to_string(),
			"network error: connection refused"
		);
		assert_eq!(
			ContentError::status(500, "static/pages/paths.html").to_string(),
			"static/pages/paths.html returned status 500"
		);
		assert_eq!(
			ContentError::decode("invalid utf-8").to_string(),
			"failed to read body: invalid utf-8"
		);
	}

	#[test]
	fn test_http_source_construction() {
		let source = HttpContentSource::with_base("https://eduflash.example/");
		assert_eq!(source.base, "https://eduflash.example/");

		let default = HttpContentSource::new();
		assert!(default.base.is_empty());
	}
}
