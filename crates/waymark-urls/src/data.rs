//! Shared data bag threaded through middleware, handlers and component factories.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Mutable key/value bag shared by every stage of one navigation attempt.
///
/// Cloning a `NavigationData` yields another handle to the same bag, so a
/// value inserted by one middleware is visible to the middleware that runs
/// after it and to the component factory. Each navigation attempt starts
/// with a fresh bag.
///
/// # Examples
///
/// ```
/// use waymark_urls::NavigationData;
///
/// let data = NavigationData::new();
/// let handle = data.clone();
/// handle.insert("user", "ada");
///
/// assert_eq!(data.get("user"), Some("ada".into()));
/// ```
#[derive(Clone, Default)]
pub struct NavigationData {
	inner: Arc<Mutex<Map<String, Value>>>,
}

impl NavigationData {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.inner.lock().insert(key.into(), value.into())
	}

	/// Returns a copy of the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<Value> {
		self.inner.lock().get(key).cloned()
	}

	/// Removes the value stored under `key`.
	pub fn remove(&self, key: &str) -> Option<Value> {
		self.inner.lock().remove(key)
	}

	/// Returns whether a value is stored under `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.lock().contains_key(key)
	}

	/// Returns the number of stored entries.
	pub fn len(&self) -> usize {
		self.inner.lock().len()
	}

	/// Returns whether the bag is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.lock().is_empty()
	}

	/// Copies the current content of the bag.
	pub fn snapshot(&self) -> Map<String, Value> {
		self.inner.lock().clone()
	}
}

impl std::fmt::Debug for NavigationData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.inner.lock().iter()).finish()
	}
}
