//! Integration tests for location → route resolution
//!
//! These tests verify the resolver against the site's real route table:
//! 1. Round-trip: every declared route resolves its own canonical location
//! 2. Fragment normalization feeding into resolution
//! 3. Query parameters staying out of matching

#![cfg(not(target_arch = "wasm32"))]

use eduflash_pages::app::default_table;
use eduflash_pages::location::Location;
use eduflash_pages::routes::{RouteEntry, RouteTable, TableError};

/// Success Criterion 1: every declared route round-trips through resolution
#[test]
fn test_declared_routes_round_trip() {
	let table = default_table();

	for entry in table.entries() {
		// Canonical location: the pattern itself, with placeholders filled.
		let path = entry
			.pattern()
			.replace("{path}", "sample")
			.replace("{lesson}", "sample");

		let (resolved_entry, resolved) = table
			.resolve(&path, &[])
			.unwrap_or_else(|| panic!("route failed to resolve itself: {}", entry.pattern()));

		assert_eq!(resolved.key, entry.pattern());
		assert_eq!(resolved_entry.content(), entry.content());
	}
}

/// Success Criterion 2: raw fragments normalize into resolvable paths
#[test]
fn test_fragment_normalization_resolves() {
	let table = default_table();

	for (fragment, expected_key) in [
		("", "/"),
		("#", "/"),
		("#/", "/"),
		("#/paths", "/paths"),
		("#paths", "/paths"),
		("#/topics/mathematics", "/topics/{path}"),
		("#/lessons/arithmetic?sort=new", "/lessons/{lesson}"),
	] {
		let location = Location::parse(fragment);
		let (_, resolved) = table
			.resolve(&location.path, &location.query)
			.unwrap_or_else(|| panic!("fragment failed to resolve: {:?}", fragment));
		assert_eq!(resolved.key, expected_key, "fragment {:?}", fragment);
	}
}

/// Success Criterion 2: locations outside the table stay unresolved
#[test]
fn test_unknown_locations_do_not_resolve() {
	let table = default_table();

	for path in ["/nonexistent", "/pathsx", "/topicss/math", "/profile/extra"] {
		assert!(table.resolve(path, &[]).is_none(), "unexpected match: {}", path);
	}
}

/// Success Criterion 3: query parameters never participate in matching but
/// surface in the resolved params
#[test]
fn test_query_params_do_not_affect_matching() {
	let table = default_table();
	let location = Location::parse("#/topics/physics?level=advanced");

	let (_, resolved) = table.resolve(&location.path, &location.query).unwrap();
	assert_eq!(resolved.key, "/topics/{path}");
	assert_eq!(resolved.params.get("path"), Some(&"physics".to_string()));
	assert_eq!(resolved.params.get("level"), Some(&"advanced".to_string()));
}

/// Success Criterion 4: misconfigured tables fail fast at startup
#[test]
fn test_overlapping_prefixes_fail_fast() {
	let err = RouteTable::new(vec![
		RouteEntry::new("/topics/{path}", "topic.html"),
		RouteEntry::new("/topics/featured/{id}", "featured.html"),
	])
	.unwrap_err();

	assert!(matches!(err, TableError::OverlappingPrefixes(_, _)));
}
