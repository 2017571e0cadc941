//! Component acquisition and the factory cache.

use crate::error::LoadError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use waymark_urls::{ComponentRef, NavigationData, QueryMap, Tokens};

/// Builds a fresh element for every navigation to a component route.
pub trait ComponentFactory<E>: Send + Sync {
	/// Constructs the element from the navigation context.
	fn construct(&self, tokens: &Tokens, query: &QueryMap, data: &NavigationData) -> E;
}

struct FnFactory<F>(F);

impl<E, F> ComponentFactory<E> for FnFactory<F>
where
	F: Fn(&Tokens, &QueryMap, &NavigationData) -> E + Send + Sync,
{
	fn construct(&self, tokens: &Tokens, query: &QueryMap, data: &NavigationData) -> E {
		(self.0)(tokens, query, data)
	}
}

/// Wraps a closure as a component factory.
///
/// # Example
///
/// ```
/// use waymark_pages::factory_fn;
///
/// let article = factory_fn(|tokens, _query, _data| {
///     format!("<blog-article slug={}>", tokens.get("slug").unwrap_or_default())
/// });
/// ```
pub fn factory_fn<E, F>(f: F) -> Arc<dyn ComponentFactory<E>>
where
	E: 'static,
	F: Fn(&Tokens, &QueryMap, &NavigationData) -> E + Send + Sync + 'static,
{
	Arc::new(FnFactory(f))
}

/// Resolves a component reference to its factory, e.g. by importing a module.
#[async_trait]
pub trait ComponentLoader<E>: Send + Sync {
	/// Loads the component.
	async fn load(&self, component: &ComponentRef) -> Result<Arc<dyn ComponentFactory<E>>, LoadError>;
}

/// Factories already loaded, keyed by tag name.
pub(crate) struct FactoryCache<E> {
	factories: RwLock<HashMap<String, Arc<dyn ComponentFactory<E>>>>,
}

impl<E> FactoryCache<E> {
	pub(crate) fn new() -> Self {
		Self {
			factories: RwLock::new(HashMap::new()),
		}
	}

	pub(crate) fn get(&self, tag_name: &str) -> Option<Arc<dyn ComponentFactory<E>>> {
		self.factories.read().get(tag_name).cloned()
	}

	pub(crate) fn insert(&self, tag_name: &str, factory: Arc<dyn ComponentFactory<E>>) {
		self.factories.write().insert(tag_name.to_string(), factory);
	}

	pub(crate) fn contains(&self, tag_name: &str) -> bool {
		self.factories.read().contains_key(tag_name)
	}
}
