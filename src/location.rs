//! Location fragment normalization and query parsing.
//!
//! The sole input driving navigation is the browser's hash fragment
//! (`#/topics/math?level=2`). This module canonicalizes the raw fragment
//! into a path that the route table can match: leading `#` stripped, the
//! empty fragment folded to `/`, a single leading separator guaranteed.
//! The query component is parsed out so it never participates in matching.

/// A parsed navigable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	/// The normalized path, always starting with `/`.
	pub path: String,
	/// Query pairs in document order, already percent-decoded.
	pub query: Vec<(String, String)>,
}

impl Location {
	/// Parses a raw fragment (`""`, `"#/paths"`, `"/topics/math?x=1"`, ...).
	pub fn parse(fragment: &str) -> Self {
		let raw = fragment.strip_prefix('#').unwrap_or(fragment);

		let (path_part, query_part) = match raw.split_once('?') {
			Some((p, q)) => (p, Some(q)),
			None => (raw, None),
		};

		let path = if path_part.is_empty() || path_part == "/" {
			"/".to_string()
		} else if path_part.starts_with('/') {
			path_part.to_string()
		} else {
			format!("/{}", path_part)
		};

		let query = query_part.map(parse_query).unwrap_or_default();

		Self { path, query }
	}
}

/// Parses a query string into ordered pairs; malformed input yields no pairs.
fn parse_query(query: &str) -> Vec<(String, String)> {
	serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default()
}

/// Reads the current fragment from the browser location.
#[cfg(target_arch = "wasm32")]
pub fn current_fragment() -> String {
	web_sys::window()
		.and_then(|w| w.location().hash().ok())
		.unwrap_or_default()
}

/// Rewrites the current fragment without emitting a `hashchange` event.
///
/// Used for access redirects, where the pending navigation is replaced
/// rather than pushed.
#[cfg(target_arch = "wasm32")]
pub fn replace_fragment(path: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let Ok(history) = window.history() else {
		return;
	};
	let target = format!("#{}", path);
	if let Err(err) = history.replace_state_with_url(
		&wasm_bindgen::JsValue::NULL,
		"",
		Some(&target),
	) {
		crate::warn_log!("failed to replace fragment: {:?}", err);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "/")]
	#[case("#", "/")]
	#[case("#/", "/")]
	#[case("/", "/")]
	#[case("#/login", "/login")]
	#[case("login", "/login")]
	#[case("#login", "/login")]
	#[case("#/topics/math", "/topics/math")]
	fn test_parse_normalizes_path(#[case] fragment: &str, #[case] expected: &str) {
		assert_eq!(Location::parse(fragment).path, expected);
	}

	#[test]
	fn test_parse_strips_query_from_path() {
		let location = Location::parse("#/topics/math?level=advanced&sort=name");
		assert_eq!(location.path, "/topics/math");
		assert_eq!(
			location.query,
			vec![
				("level".to_string(), "advanced".to_string()),
				("sort".to_string(), "name".to_string()),
			]
		);
	}

	#[test]
	fn test_parse_decodes_query_values() {
		let location = Location::parse("#/lessons?title=linear%20algebra");
		assert_eq!(
			location.query,
			vec![("title".to_string(), "linear algebra".to_string())]
		);
	}

	#[test]
	fn test_parse_empty_query() {
		let location = Location::parse("#/paths?");
		assert_eq!(location.path, "/paths");
		assert!(location.query.is_empty());
	}

	#[test]
	fn test_parse_query_only_fragment() {
		let location = Location::parse("#?x=1");
		assert_eq!(location.path, "/");
		assert_eq!(location.query, vec![("x".to_string(), "1".to_string())]);
	}
}
