//! Declarative route table with pattern matching.
//!
//! A [`RouteTable`] maps location paths to content fragments, optional
//! behavior modules, and an access flag. Patterns are either exact
//! (`/paths`) or parameterized with `{name}` placeholders
//! (`/topics/{path}`); a placeholder in the final position captures the
//! whole remainder of the path, so `/topics/{path}` matches
//! `/topics/math/algebra` with `path = "math/algebra"`.
//!
//! The table is built once at startup and validated eagerly: duplicate
//! patterns and parameterized patterns with overlapping literal prefixes are
//! configuration errors, reported before the first navigation ever runs.

use std::collections::HashMap;

use regex::Regex;

/// Error raised while building or validating a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
	/// A pattern could not be parsed.
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// What was wrong with it.
		detail: String,
	},
	/// The same pattern was declared twice.
	DuplicatePattern(String),
	/// Two parameterized patterns share a literal prefix, so matching
	/// would depend on declaration order.
	OverlappingPrefixes(String, String),
}

impl std::fmt::Display for TableError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidPattern { pattern, detail } => {
				write!(f, "invalid route pattern {}: {}", pattern, detail)
			}
			Self::DuplicatePattern(pattern) => {
				write!(f, "route pattern declared twice: {}", pattern)
			}
			Self::OverlappingPrefixes(a, b) => {
				write!(f, "route prefixes overlap: {} and {}", a, b)
			}
		}
	}
}

impl std::error::Error for TableError {}

/// A compiled path pattern.
///
/// Literal segments must match verbatim; `{name}` placeholders capture one
/// path segment, except in the final position where they capture everything
/// up to the end of the path.
#[derive(Debug, Clone)]
pub struct PathPattern {
	raw: String,
	regex: Regex,
	param_names: Vec<String>,
	literal_prefix: String,
}

impl PathPattern {
	/// Parses and compiles a pattern.
	pub fn parse(pattern: &str) -> Result<Self, TableError> {
		let invalid = |detail: &str| TableError::InvalidPattern {
			pattern: pattern.to_string(),
			detail: detail.to_string(),
		};

		let mut regex_source = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		let mut literal_prefix = String::new();
		let mut rest = pattern;

		while let Some(open) = rest.find('{') {
			let (literal, tail) = rest.split_at(open);
			regex_source.push_str(&regex::escape(literal));
			if param_names.is_empty() {
				literal_prefix.push_str(literal);
			}

			let close = tail.find('}').ok_or_else(|| invalid("unclosed placeholder"))?;
			let name = &tail[1..close];
			if name.is_empty() {
				return Err(invalid("empty placeholder name"));
			}
			if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
				return Err(invalid("placeholder names must be alphanumeric"));
			}
			if param_names.iter().any(|existing| existing == name) {
				return Err(invalid("placeholder name used twice"));
			}

			rest = &tail[close + 1..];
			// A trailing placeholder swallows the remainder of the path, so
			// /topics/{path} accepts nested identifiers.
			if rest.is_empty() {
				regex_source.push_str(&format!("(?P<{}>.+)", name));
			} else {
				regex_source.push_str(&format!("(?P<{}>[^/]+)", name));
			}
			param_names.push(name.to_string());
		}

		regex_source.push_str(&regex::escape(rest));
		if param_names.is_empty() {
			literal_prefix.push_str(rest);
		}
		regex_source.push('$');

		let regex = Regex::new(&regex_source).map_err(|e| invalid(&e.to_string()))?;

		Ok(Self {
			raw: pattern.to_string(),
			regex,
			param_names,
			literal_prefix,
		})
	}

	/// Returns the pattern as written.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Returns whether the pattern has no placeholders.
	pub fn is_static(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Returns the literal text before the first placeholder (the whole
	/// pattern for static routes).
	pub fn literal_prefix(&self) -> &str {
		&self.literal_prefix
	}

	/// Returns the placeholder names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Matches a path, returning captured parameters on a hit.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;
		let mut params = HashMap::new();
		for name in &self.param_names {
			if let Some(value) = captures.name(name) {
				params.insert(name.clone(), value.as_str().to_string());
			}
		}
		Some(params)
	}
}

/// A single route declaration.
#[derive(Debug, Clone)]
pub struct RouteEntry {
	pattern: String,
	content: String,
	behavior: Option<String>,
	protected: bool,
}

impl RouteEntry {
	/// Creates a route mapping `pattern` to a content fragment.
	pub fn new(pattern: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			content: content.into(),
			behavior: None,
			protected: false,
		}
	}

	/// Declares the behavior module attached after content injection.
	pub fn with_behavior(mut self, behavior: impl Into<String>) -> Self {
		self.behavior = Some(behavior.into());
		self
	}

	/// Requires session evidence before this route may render.
	pub fn protected(mut self) -> Self {
		self.protected = true;
		self
	}

	/// Returns the pattern as declared.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the content fragment locator.
	pub fn content(&self) -> &str {
		&self.content
	}

	/// Returns the behavior module locator, if any.
	pub fn behavior(&self) -> Option<&str> {
		self.behavior.as_deref()
	}

	/// Returns whether the route requires session evidence.
	pub fn is_protected(&self) -> bool {
		self.protected
	}
}

/// A route resolved against the table for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
	/// The matched pattern, used as the route key.
	pub key: String,
	/// Captured path parameters merged with query parameters (path wins).
	pub params: HashMap<String, String>,
}

struct CompiledRoute {
	entry: RouteEntry,
	pattern: PathPattern,
}

/// The immutable route table.
///
/// Matching tries an exact pattern first, then parameterized patterns in
/// declaration order. Construction fails fast on misconfiguration, so a
/// table that exists is a table that routes deterministically.
pub struct RouteTable {
	routes: Vec<CompiledRoute>,
	exact: HashMap<String, usize>,
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field(
				"patterns",
				&self.routes.iter().map(|r| r.pattern.raw()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

impl RouteTable {
	/// Builds and validates a table from route declarations.
	pub fn new(entries: Vec<RouteEntry>) -> Result<Self, TableError> {
		let mut routes = Vec::with_capacity(entries.len());
		let mut exact = HashMap::new();

		for entry in entries {
			let pattern = PathPattern::parse(entry.pattern())?;
			if routes
				.iter()
				.any(|existing: &CompiledRoute| existing.pattern.raw() == pattern.raw())
			{
				return Err(TableError::DuplicatePattern(pattern.raw().to_string()));
			}
			if pattern.is_static() {
				exact.insert(pattern.raw().to_string(), routes.len());
			}
			routes.push(CompiledRoute { entry, pattern });
		}

		// Parameterized prefixes must be disjoint, otherwise which route a
		// path lands on would depend on declaration order.
		let dynamic: Vec<&CompiledRoute> =
			routes.iter().filter(|r| !r.pattern.is_static()).collect();
		for (i, a) in dynamic.iter().enumerate() {
			for b in &dynamic[i + 1..] {
				let (pa, pb) = (a.pattern.literal_prefix(), b.pattern.literal_prefix());
				if pa.starts_with(pb) || pb.starts_with(pa) {
					return Err(TableError::OverlappingPrefixes(
						a.pattern.raw().to_string(),
						b.pattern.raw().to_string(),
					));
				}
			}
		}

		Ok(Self { routes, exact })
	}

	/// Resolves a normalized path plus parsed query pairs.
	///
	/// Query parameters are folded into the resolved params; a path
	/// parameter with the same name takes precedence.
	pub fn resolve(
		&self,
		path: &str,
		query: &[(String, String)],
	) -> Option<(&RouteEntry, ResolvedRoute)> {
		if let Some(&index) = self.exact.get(path) {
			let route = &self.routes[index];
			return Some((
				&route.entry,
				ResolvedRoute {
					key: route.pattern.raw().to_string(),
					params: query.iter().cloned().collect(),
				},
			));
		}

		for route in &self.routes {
			if route.pattern.is_static() {
				continue;
			}
			if let Some(captured) = route.pattern.matches(path) {
				let mut params: HashMap<String, String> = query.iter().cloned().collect();
				params.extend(captured);
				return Some((
					&route.entry,
					ResolvedRoute {
						key: route.pattern.raw().to_string(),
						params,
					},
				));
			}
		}

		None
	}

	/// Returns the number of declared routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Iterates the declared routes.
	pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
		self.routes.iter().map(|r| &r.entry)
	}
}
