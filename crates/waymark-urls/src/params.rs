//! Token and query parameter containers.
//!
//! Both containers keep insertion order: tokens follow the order in which
//! they appear in the matched pattern, query keys follow the order in which
//! they first appear in the query string.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Values bound to the tokens of a matched route.
///
/// Each value is the raw text of the path segment the token matched, not a
/// capture group of the token's constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
	entries: Vec<(String, String)>,
}

impl Tokens {
	/// Creates an empty token set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds `name` to `value`, replacing an earlier binding of the same name.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Returns the value bound to `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Iterates over `(name, value)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Returns the bound values in declaration order.
	pub fn values(&self) -> Vec<&str> {
		self.entries.iter().map(|(_, value)| value.as_str()).collect()
	}

	/// Returns the number of bound tokens.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether no token is bound.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tokens {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut tokens = Tokens::new();
		for (name, value) in iter {
			tokens.insert(name, value);
		}
		tokens
	}
}

impl Serialize for Tokens {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

/// A query parameter value.
///
/// A key that appears once maps to [`QueryValue::Single`]; a key that appears
/// more than once maps to [`QueryValue::Multiple`] holding every value in
/// order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
	/// The key appeared exactly once.
	Single(String),
	/// The key appeared several times.
	Multiple(Vec<String>),
}

impl QueryValue {
	/// Returns the value when the key appeared exactly once.
	pub fn as_single(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::Multiple(_) => None,
		}
	}

	/// Returns the first value of the key.
	pub fn first(&self) -> Option<&str> {
		match self {
			Self::Single(value) => Some(value),
			Self::Multiple(values) => values.first().map(String::as_str),
		}
	}

	/// Returns every value of the key in order of appearance.
	pub fn all(&self) -> Vec<&str> {
		match self {
			Self::Single(value) => vec![value.as_str()],
			Self::Multiple(values) => values.iter().map(String::as_str).collect(),
		}
	}

	fn push(&mut self, value: String) {
		match self {
			Self::Single(existing) => {
				let first = std::mem::take(existing);
				*self = Self::Multiple(vec![first, value]);
			}
			Self::Multiple(values) => values.push(value),
		}
	}
}

impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<Vec<&str>> for QueryValue {
	fn from(values: Vec<&str>) -> Self {
		Self::Multiple(values.into_iter().map(str::to_string).collect())
	}
}

/// Parsed query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
	entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
	/// Creates an empty query map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a form-urlencoded query string.
	///
	/// A leading `?` is ignored. Keys and values are percent-decoded and `+`
	/// is read as a space.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_urls::{QueryMap, QueryValue};
	///
	/// let query = QueryMap::parse("?a=1&a=2&b=3");
	/// assert_eq!(query.get("a"), Some(&QueryValue::from(vec!["1", "2"])));
	/// assert_eq!(query.get("b"), Some(&QueryValue::from("3")));
	/// assert_eq!(query.keys().collect::<Vec<_>>(), vec!["a", "b"]);
	/// ```
	pub fn parse(query: &str) -> Self {
		let query = query.trim().trim_start_matches('?');
		if query.is_empty() {
			return Self::new();
		}

		let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
			Ok(pairs) => pairs,
			Err(e) => {
				tracing::warn!(query = %query, error = %e, "Discarding undecodable query string");
				return Self::new();
			}
		};

		let mut map = Self::new();
		for (key, value) in pairs {
			map.append(key, value);
		}
		map
	}

	/// Appends a value under `key`, promoting the key to a list on repetition.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, existing)) => existing.push(value),
			None => self.entries.push((key, QueryValue::Single(value))),
		}
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&QueryValue> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, value)| value)
	}

	/// Iterates over keys in first-occurrence order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_str())
	}

	/// Iterates over `(key, value)` pairs in first-occurrence order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Returns the number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether the query string carried no parameters.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Serialize for QueryMap {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}
