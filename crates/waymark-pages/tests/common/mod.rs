//! Test doubles for navigator integration tests
//!
//! - [`RecordingPage`]: a [`MountAdapter`] recording every call
//! - [`CountingLoader`]: a [`ComponentLoader`] counting loads, with optional
//!   per-component delays and failures
//! - [`EventLog`]: lifecycle listener recording `(phase, incoming path)`

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use waymark_pages::{
	ComponentFactory, ComponentLoader, LoadError, MountAdapter, NavigationState, Navigator,
	NavigatorSettings, Phase, ScrollBehavior, factory_fn,
};
use waymark_urls::{ComponentRef, NavigationData, QueryMap, RouteRegistry, Tokens};

pub const ORIGIN: &str = "https://app.example";

/// A call received by [`RecordingPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCall {
	Mount(String),
	Push(String),
	Replace(String),
	ScrollTo(String),
	ScrollTop,
	External(String),
}

/// Page double recording calls in order.
pub struct RecordingPage {
	calls: Mutex<Vec<PageCall>>,
	states: Mutex<Vec<NavigationState>>,
	current: Mutex<String>,
	fragments: HashSet<String>,
}

impl RecordingPage {
	pub fn new() -> Arc<Self> {
		Self::with_fragments(&[])
	}

	/// A page where the given element ids exist.
	pub fn with_fragments(ids: &[&str]) -> Arc<Self> {
		Arc::new(Self {
			calls: Mutex::new(Vec::new()),
			states: Mutex::new(Vec::new()),
			current: Mutex::new("/".to_string()),
			fragments: ids.iter().map(|id| id.to_string()).collect(),
		})
	}

	pub fn calls(&self) -> Vec<PageCall> {
		self.calls.lock().clone()
	}

	pub fn mounts(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				PageCall::Mount(element) => Some(element.clone()),
				_ => None,
			})
			.collect()
	}

	/// History calls as `push:<url>` / `replace:<url>`.
	pub fn history(&self) -> Vec<String> {
		self.calls
			.lock()
			.iter()
			.filter_map(|call| match call {
				PageCall::Push(url) => Some(format!("push:{}", url)),
				PageCall::Replace(url) => Some(format!("replace:{}", url)),
				_ => None,
			})
			.collect()
	}

	pub fn states(&self) -> Vec<NavigationState> {
		self.states.lock().clone()
	}

	pub fn set_current(&self, url: &str) {
		*self.current.lock() = url.to_string();
	}

	fn record(&self, call: PageCall) {
		self.calls.lock().push(call);
	}
}

impl MountAdapter<String> for RecordingPage {
	fn mount(&self, element: String) {
		self.record(PageCall::Mount(element));
	}

	fn history_replace(&self, url: &str) {
		self.set_current(url);
		self.record(PageCall::Replace(url.to_string()));
	}

	fn history_push(&self, url: &str) {
		self.set_current(url);
		self.record(PageCall::Push(url.to_string()));
	}

	fn scroll_to_fragment(&self, id: &str, _behavior: ScrollBehavior) -> bool {
		self.record(PageCall::ScrollTo(id.to_string()));
		self.fragments.contains(id)
	}

	fn scroll_to_top(&self) {
		self.record(PageCall::ScrollTop);
	}

	fn current_path(&self) -> String {
		self.current.lock().clone()
	}

	fn origin(&self) -> String {
		ORIGIN.to_string()
	}

	fn navigate_external(&self, url: &str) {
		self.record(PageCall::External(url.to_string()));
	}

	fn state_changed(&self, state: NavigationState) {
		self.states.lock().push(state);
	}
}

/// Loader double producing elements of the form `tag(token,token)[key=value]`.
///
/// Tokens are listed by value in declaration order; the bracket lists the
/// data bag entries as JSON, omitted when the bag is empty.
#[derive(Default)]
pub struct CountingLoader {
	loads: Mutex<HashMap<String, usize>>,
	delays: HashMap<String, Duration>,
	failing: HashSet<String>,
}

impl CountingLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Delays loading of `tag`.
	pub fn with_delay(mut self, tag: &str, delay: Duration) -> Self {
		self.delays.insert(tag.to_string(), delay);
		self
	}

	/// Makes loading of `tag` fail.
	pub fn with_failure(mut self, tag: &str) -> Self {
		self.failing.insert(tag.to_string());
		self
	}

	pub fn shared(self) -> Arc<Self> {
		Arc::new(self)
	}

	pub fn loads(&self, tag: &str) -> usize {
		self.loads.lock().get(tag).copied().unwrap_or(0)
	}

	pub fn total_loads(&self) -> usize {
		self.loads.lock().values().sum()
	}
}

#[async_trait]
impl ComponentLoader<String> for CountingLoader {
	async fn load(
		&self,
		component: &ComponentRef,
	) -> Result<Arc<dyn ComponentFactory<String>>, LoadError> {
		*self
			.loads
			.lock()
			.entry(component.tag_name.clone())
			.or_insert(0) += 1;

		if let Some(delay) = self.delays.get(&component.tag_name) {
			tokio::time::sleep(*delay).await;
		}
		if self.failing.contains(&component.tag_name) {
			return Err(LoadError::NotFound {
				file: component.file.clone(),
			});
		}

		let tag = component.tag_name.clone();
		Ok(factory_fn(
			move |tokens: &Tokens, _query: &QueryMap, data: &NavigationData| {
				let mut element = format!("{}({})", tag, tokens.values().join(","));
				let entries = data.snapshot();
				if !entries.is_empty() {
					element.push_str(&serde_json::Value::Object(entries).to_string());
				}
				element
			},
		))
	}
}

/// Lifecycle listener recording `(phase, incoming path)` pairs.
#[derive(Clone, Default)]
pub struct EventLog {
	entries: Arc<Mutex<Vec<(Phase, String)>>>,
}

impl EventLog {
	/// Subscribes to every phase of `navigator`.
	pub fn attach(navigator: &Navigator<String>) -> Self {
		let log = Self::default();
		for phase in [
			Phase::Ready,
			Phase::Preloading,
			Phase::Loading,
			Phase::Redirecting,
			Phase::Loaded,
		] {
			let entries = Arc::clone(&log.entries);
			navigator.on(phase, move |event| {
				let path = event
					.incoming
					.as_ref()
					.map(|incoming| incoming.path().to_string())
					.unwrap_or_default();
				entries.lock().push((event.phase, path));
			});
		}
		log
	}

	pub fn entries(&self) -> Vec<(Phase, String)> {
		self.entries.lock().clone()
	}

	pub fn phases(&self) -> Vec<Phase> {
		self.entries.lock().iter().map(|(phase, _)| *phase).collect()
	}

	pub fn count(&self, phase: Phase) -> usize {
		self.entries.lock().iter().filter(|(p, _)| *p == phase).count()
	}
}

/// Builds a navigator over the given doubles.
pub fn navigator(
	routes: RouteRegistry,
	settings: NavigatorSettings,
	loader: &Arc<CountingLoader>,
	page: &Arc<RecordingPage>,
) -> Navigator<String> {
	let loader: Arc<dyn ComponentLoader<String>> = loader.clone();
	let page: Arc<dyn MountAdapter<String>> = page.clone();
	Navigator::builder(routes).settings(settings).build(loader, page)
}
