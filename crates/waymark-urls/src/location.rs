//! Path normalization and location parsing.

use crate::params::QueryMap;
use serde::Serialize;

/// Normalizes a path or pattern.
///
/// Surrounding whitespace and slashes are removed and runs of slashes are
/// collapsed into one, so `"//users///42/"` and `"users/42"` normalize to
/// the same value. Case is preserved.
///
/// # Examples
///
/// ```
/// use waymark_urls::normalize_path;
///
/// assert_eq!(normalize_path("  //users///42/ "), "users/42");
/// assert_eq!(normalize_path("/"), "");
/// ```
pub fn normalize_path(path: &str) -> String {
	let mut normalized = String::with_capacity(path.len());
	let mut previous_slash = false;

	for c in path.trim().chars() {
		if c == '/' {
			if !previous_slash {
				normalized.push(c);
			}
			previous_slash = true;
		} else {
			normalized.push(c);
			previous_slash = false;
		}
	}

	normalized.trim_matches('/').trim().to_string()
}

/// Splits a normalized path into its segments.
///
/// The empty path (the root) has a single empty segment.
pub fn path_segments(path: &str) -> Vec<&str> {
	path.split('/').collect()
}

/// Returns whether `url` consists of a fragment only, e.g. `#section`.
pub fn is_fragment_only(url: &str) -> bool {
	url.trim().starts_with('#')
}

/// A URL split into its path, query and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLocation {
	/// Normalized path, without query string or fragment.
	pub path: String,
	/// Fragment without the leading `#`, empty when absent.
	pub hash: String,
	/// Parsed query string.
	pub query: QueryMap,
}

impl ParsedLocation {
	/// Parses an origin-relative URL such as `/blog/post?ref=home#comments`.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_urls::ParsedLocation;
	///
	/// let location = ParsedLocation::parse("/blog/post/?ref=home#comments");
	/// assert_eq!(location.path, "blog/post");
	/// assert_eq!(location.hash, "comments");
	/// assert_eq!(location.query.get("ref").unwrap().first(), Some("home"));
	/// ```
	pub fn parse(url: &str) -> Self {
		let url = url.trim();
		let (before_hash, hash) = match url.split_once('#') {
			Some((before, hash)) => (before, hash),
			None => (url, ""),
		};
		let (path, query) = match before_hash.split_once('?') {
			Some((path, query)) => (path, query),
			None => (before_hash, ""),
		};

		Self {
			path: normalize_path(path),
			hash: hash.trim().to_string(),
			query: QueryMap::parse(query),
		}
	}

	/// Returns whether the location carries a fragment.
	pub fn has_hash(&self) -> bool {
		!self.hash.is_empty()
	}
}
