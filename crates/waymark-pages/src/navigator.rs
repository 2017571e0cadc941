//! Navigation state machine.
//!
//! A [`Navigator`] owns a frozen [`RouteRegistry`] and drives each
//! navigation through its phases:
//!
//! ```text
//! Idle -> Preloading -> Loading -> Loaded -> Idle
//!                          |
//!                          +-> Redirecting -> Preloading ...
//! ```
//!
//! Redirect routes, middleware reroutes and the fallback path all continue
//! the same navigation toward a new URL, bounded by
//! [`NavigatorSettings::max_redirects`]. Every failure inside an attempt is
//! logged and turned into a [`NavigationOutcome`]; nothing is propagated to
//! the caller of [`Navigator::navigate_to`].

use crate::adapter::{HistoryMode, MountAdapter, NavigationState, ScrollBehavior};
use crate::error::NavigationError;
use crate::events::{
	EventBus, Incoming, LifecycleEvent, Phase, RouteDetails, RouteSnapshot, SubscriptionId,
};
use crate::gate::GateKeeper;
use crate::loader::{ComponentFactory, ComponentLoader, FactoryCache};
use crate::settings::{NavigatorSettings, SettingsError, TransitionTimer};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use waymark_urls::{
	ParsedLocation, RouteContext, RouteRegistry, RouteTarget, is_fragment_only, normalize_path,
};

/// Final result of one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// A route was reached; `path` is the normalized path it matched.
	Loaded {
		/// Path of the route that completed the navigation.
		path: String,
	},
	/// A fragment-only URL scrolled the current page.
	HashJump {
		/// Fragment without `#`.
		hash: String,
		/// Whether an element with that id was found.
		found: bool,
	},
	/// The URL belongs to another origin and was handed to the page.
	External {
		/// The URL as given.
		url: String,
	},
	/// A newer navigation started before this one could mount.
	Superseded,
	/// The navigation stopped without mounting anything.
	Failed(NavigationError),
}

impl NavigationOutcome {
	/// Returns whether a route was reached.
	pub fn is_loaded(&self) -> bool {
		matches!(self, Self::Loaded { .. })
	}
}

/// Handle to a navigation running on the tokio runtime.
#[derive(Debug)]
pub struct NavigationTask {
	handle: JoinHandle<NavigationOutcome>,
}

impl NavigationTask {
	/// Waits for the navigation to finish.
	pub async fn wait(self) -> NavigationOutcome {
		match self.handle.await {
			Ok(outcome) => outcome,
			Err(e) => {
				error!(error = %e, "Navigation task did not complete");
				NavigationOutcome::Failed(NavigationError::Interrupted(e.to_string()))
			}
		}
	}

	/// Returns whether the navigation has finished.
	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

/// Where a URL leads before any route is consulted.
enum Destination {
	/// `#id` on the current page.
	Fragment(String),
	/// Another origin.
	External(String),
	/// Origin-relative URL with surrounding slashes removed.
	Internal(String),
}

/// What a single hop of a navigation resolved to.
enum Hop {
	/// Continue the navigation toward another URL.
	Continue(String),
	/// The navigation is over.
	Done(NavigationOutcome),
}

struct Inner<E> {
	routes: Arc<RouteRegistry>,
	loader: Arc<dyn ComponentLoader<E>>,
	adapter: Arc<dyn MountAdapter<E>>,
	settings: RwLock<NavigatorSettings>,
	events: EventBus,
	gates: GateKeeper,
	factories: FactoryCache<E>,
	last_route: RwLock<Option<RouteSnapshot>>,
	state: Mutex<NavigationState>,
	sequence: AtomicU64,
}

/// Builder for [`Navigator`].
pub struct NavigatorBuilder {
	routes: RouteRegistry,
	settings: NavigatorSettings,
}

impl NavigatorBuilder {
	/// Replaces the default settings.
	pub fn settings(mut self, settings: NavigatorSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Builds the navigator around its collaborators.
	pub fn build<E: Send + 'static>(
		self,
		loader: Arc<dyn ComponentLoader<E>>,
		adapter: Arc<dyn MountAdapter<E>>,
	) -> Navigator<E> {
		let mut settings = self.settings;
		settings.fallback_path = normalize_path(&settings.fallback_path);
		settings.max_redirects = settings.max_redirects.max(1);

		info!(
			routes = self.routes.len(),
			fallback = %settings.fallback_path,
			transitions = settings.transitions,
			"Navigator created"
		);

		Navigator {
			inner: Arc::new(Inner {
				routes: Arc::new(self.routes),
				loader,
				adapter,
				settings: RwLock::new(settings),
				events: EventBus::new(),
				gates: GateKeeper::new(),
				factories: FactoryCache::new(),
				last_route: RwLock::new(None),
				state: Mutex::new(NavigationState::Idle),
				sequence: AtomicU64::new(0),
			}),
		}
	}
}

/// Client-side navigator.
///
/// Cloning a `Navigator` yields another handle to the same instance;
/// separately built navigators share nothing.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use std::sync::Arc;
/// use waymark_pages::{
///     ComponentFactory, ComponentLoader, HistoryMode, LoadError, MountAdapter, Navigator,
///     ScrollBehavior, factory_fn,
/// };
/// use waymark_urls::{ComponentRef, RouteRegistry};
///
/// struct Loader;
///
/// #[async_trait]
/// impl ComponentLoader<String> for Loader {
///     async fn load(&self, component: &ComponentRef) -> Result<Arc<dyn ComponentFactory<String>>, LoadError> {
///         let tag = component.tag_name.clone();
///         Ok(factory_fn(move |_tokens, _query, _data| tag.clone()))
///     }
/// }
///
/// struct Page;
///
/// impl MountAdapter<String> for Page {
///     fn mount(&self, element: String) { println!("mounted {}", element); }
///     fn history_replace(&self, _url: &str) {}
///     fn history_push(&self, _url: &str) {}
///     fn scroll_to_fragment(&self, _id: &str, _behavior: ScrollBehavior) -> bool { false }
///     fn scroll_to_top(&self) {}
///     fn current_path(&self) -> String { "/".to_string() }
///     fn origin(&self) -> String { "https://example.com".to_string() }
///     fn navigate_external(&self, _url: &str) {}
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), waymark_urls::CompileError> {
/// let mut routes = RouteRegistry::new();
/// routes.add("/", "home-page")?.add("/blog/{slug}", "blog-article")?;
///
/// let loader: Arc<dyn ComponentLoader<String>> = Arc::new(Loader);
/// let page: Arc<dyn MountAdapter<String>> = Arc::new(Page);
/// let navigator = Navigator::builder(routes).build(loader, page);
/// let outcome = navigator.navigate("/blog/hello", HistoryMode::Push).await;
///
/// assert!(outcome.is_loaded());
/// assert_eq!(navigator.last_route().unwrap().tokens.get("slug"), Some("hello"));
/// # Ok(())
/// # }
/// ```
pub struct Navigator<E> {
	inner: Arc<Inner<E>>,
}

impl<E> Clone for Navigator<E> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<E> std::fmt::Debug for Navigator<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("routes", &self.inner.routes.len())
			.field("state", &*self.inner.state.lock())
			.field("settings", &*self.inner.settings.read())
			.finish()
	}
}

impl Navigator<()> {
	/// Starts building a navigator. The registry is frozen from here on.
	pub fn builder(routes: RouteRegistry) -> NavigatorBuilder {
		NavigatorBuilder {
			routes,
			settings: NavigatorSettings::default(),
		}
	}
}

impl<E: Send + 'static> Navigator<E> {
	/// Starts a navigation on the tokio runtime and returns immediately.
	///
	/// Fragment-only and off-origin URLs are handled before this returns.
	/// Must be called from within a tokio runtime.
	pub fn navigate_to(&self, url: &str, mode: HistoryMode) -> NavigationTask {
		let handle = match self.inner.classify(url) {
			Destination::Internal(relative) => {
				let attempt = self.inner.begin();
				let inner = Arc::clone(&self.inner);
				tokio::spawn(async move { inner.run(relative, mode, attempt).await })
			}
			other => {
				let outcome = self.inner.finish_direct(other);
				tokio::spawn(async move { outcome })
			}
		};
		NavigationTask { handle }
	}

	/// Navigates and waits for the outcome on the current task.
	pub async fn navigate(&self, url: &str, mode: HistoryMode) -> NavigationOutcome {
		match self.inner.classify(url) {
			Destination::Internal(relative) => {
				let attempt = self.inner.begin();
				Arc::clone(&self.inner).run(relative, mode, attempt).await
			}
			other => self.inner.finish_direct(other),
		}
	}

	/// Performs the initial navigation in replace mode, then emits `ready`.
	pub async fn start(&self, initial_url: &str) -> NavigationOutcome {
		let outcome = self.navigate(initial_url, HistoryMode::Replace).await;
		self.inner.emit(Phase::Ready, None);
		outcome
	}
}

impl<E> Navigator<E> {
	/// Scrolls to the element `hash` names and records it in the history.
	///
	/// Returns whether the element was found; the history entry is replaced
	/// either way.
	pub fn page_jump(&self, hash: &str, behavior: ScrollBehavior) -> bool {
		self.inner.page_jump(hash, behavior)
	}

	/// Opens the pending transition gate. Returns `false` when none is pending.
	pub fn transition(&self) -> bool {
		self.inner.gates.release()
	}

	/// Changes the gate timer; `None` and `-1` disable it.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::ValidationError`] for negative values other
	/// than `-1`; the current timer is kept.
	pub fn set_transition_timer(&self, millis: Option<i64>) -> Result<(), SettingsError> {
		let timer = TransitionTimer::from_millis(millis)?;
		self.inner.settings.write().transition_timer = timer;
		Ok(())
	}

	/// Enables or disables transition gates for later navigations.
	pub fn set_transitions_enabled(&self, enabled: bool) {
		self.inner.settings.write().transitions = enabled;
	}

	/// Returns a copy of the current settings.
	pub fn settings(&self) -> NavigatorSettings {
		self.inner.settings.read().clone()
	}

	/// Returns the current state.
	pub fn state(&self) -> NavigationState {
		*self.inner.state.lock()
	}

	/// Returns the most recently completed navigation.
	pub fn last_route(&self) -> Option<RouteSnapshot> {
		self.inner.last_route.read().clone()
	}

	/// Returns the route table.
	pub fn routes(&self) -> &RouteRegistry {
		&self.inner.routes
	}

	/// Returns whether the factory for `tag_name` is cached.
	pub fn is_component_cached(&self, tag_name: &str) -> bool {
		self.inner.factories.contains(tag_name)
	}

	/// Subscribes to a lifecycle phase.
	pub fn on<F>(&self, phase: Phase, listener: F) -> SubscriptionId
	where
		F: Fn(&LifecycleEvent) + Send + Sync + 'static,
	{
		self.inner.events.on(phase, listener)
	}

	/// Removes a subscription.
	pub fn off(&self, id: SubscriptionId) -> bool {
		self.inner.events.off(id)
	}
}

impl<E> Inner<E> {
	/// Takes the next attempt number; any earlier attempt becomes stale.
	fn begin(&self) -> u64 {
		self.sequence.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn is_stale(&self, attempt: u64, discard: bool) -> bool {
		discard && self.sequence.load(Ordering::SeqCst) != attempt
	}

	fn set_state(&self, state: NavigationState) {
		let changed = {
			let mut current = self.state.lock();
			let changed = *current != state;
			*current = state;
			changed
		};
		if changed {
			debug!(state = ?state, "Navigation state changed");
			self.adapter.state_changed(state);
		}
	}

	fn emit(&self, phase: Phase, incoming: Option<Incoming>) {
		let event = LifecycleEvent {
			phase,
			outgoing: self.last_route.read().clone(),
			incoming,
		};
		self.events.emit(&event);
	}

	/// Classifies a URL, stripping this page's origin from absolute URLs.
	fn classify(&self, url: &str) -> Destination {
		let url = url.trim();
		let relative = match url::Url::parse(url) {
			Ok(absolute) => {
				if !self.is_same_origin(&absolute) {
					return Destination::External(url.to_string());
				}
				let mut relative = absolute.path().to_string();
				if let Some(query) = absolute.query() {
					relative.push('?');
					relative.push_str(query);
				}
				if let Some(fragment) = absolute.fragment() {
					relative.push('#');
					relative.push_str(fragment);
				}
				relative
			}
			// Not an absolute URL: already origin-relative.
			Err(_) => url.to_string(),
		};

		let relative = relative.trim().trim_matches('/').trim();
		if is_fragment_only(relative) {
			Destination::Fragment(relative.trim_start_matches('#').to_string())
		} else {
			Destination::Internal(relative.to_string())
		}
	}

	fn is_same_origin(&self, absolute: &url::Url) -> bool {
		let origin = self.adapter.origin();
		match url::Url::parse(origin.trim()) {
			Ok(page) => page.origin() == absolute.origin(),
			Err(_) => absolute.as_str().starts_with(origin.trim()),
		}
	}

	fn finish_direct(&self, destination: Destination) -> NavigationOutcome {
		match destination {
			Destination::Fragment(hash) => {
				let found = self.page_jump(&hash, ScrollBehavior::Smooth);
				NavigationOutcome::HashJump { hash, found }
			}
			Destination::External(url) => {
				info!(url = %url, "Leaving for another origin");
				self.adapter.navigate_external(&url);
				NavigationOutcome::External { url }
			}
			Destination::Internal(url) => {
				// Internal URLs are always run through `run`.
				NavigationOutcome::Failed(NavigationError::Interrupted(format!(
					"'{}' was not routed",
					url
				)))
			}
		}
	}

	fn page_jump(&self, hash: &str, behavior: ScrollBehavior) -> bool {
		let id = hash.trim().trim_start_matches('#');
		let found = self.adapter.scroll_to_fragment(id, behavior);
		if !found {
			debug!(id = %id, "No element to scroll to");
		}

		let current = self.adapter.current_path();
		let base = current
			.split('#')
			.next()
			.unwrap_or_default()
			.trim()
			.trim_start_matches('/');
		self.adapter.history_replace(&format!("/{}#{}", base, id));
		found
	}
}

impl<E: Send + 'static> Inner<E> {
	async fn run(self: Arc<Self>, url: String, mode: HistoryMode, attempt: u64) -> NavigationOutcome {
		let mut url = url;
		let mut hops = 0usize;

		loop {
			match self.hop(&url, mode, attempt).await {
				Hop::Done(outcome) => return outcome,
				Hop::Continue(next) => {
					hops += 1;
					let limit = self.settings.read().max_redirects;
					if hops > limit {
						error!(path = %next, limit, "Redirect limit exceeded");
						self.set_state(NavigationState::Idle);
						return NavigationOutcome::Failed(NavigationError::TooManyRedirects {
							path: normalize_path(&next),
							limit,
						});
					}
					url = next;
				}
			}
		}
	}

	/// Runs one hop: match, middleware, then the route target.
	async fn hop(&self, url: &str, mode: HistoryMode, attempt: u64) -> Hop {
		let relative = match self.classify(url) {
			Destination::Internal(relative) => relative,
			other => {
				if self.is_stale(attempt, self.settings.read().discard_stale_navigations) {
					return Hop::Done(NavigationOutcome::Superseded);
				}
				self.set_state(NavigationState::Idle);
				return Hop::Done(self.finish_direct(other));
			}
		};
		let settings = self.settings.read().clone();

		let location = ParsedLocation::parse(&relative);
		self.set_state(NavigationState::Preloading);
		self.emit(Phase::Preloading, Some(Incoming::Location(location.clone())));

		let found = self.routes.match_path(&location.path);
		let tokens = found
			.as_ref()
			.map(|found| found.tokens.clone())
			.unwrap_or_default();
		let context = RouteContext::new(tokens, location.query.clone(), Default::default());

		self.set_state(NavigationState::Loading);
		self.emit(Phase::Loading, Some(self.details(&location, &context)));

		let Some(found) = found else {
			let fallback = settings.fallback_path;
			if location.path == fallback || self.routes.match_path(&fallback).is_none() {
				let err = NavigationError::FallbackMissing {
					path: location.path.clone(),
					fallback,
				};
				error!(error = %err, "Navigation aborted");
				self.set_state(NavigationState::Idle);
				return Hop::Done(NavigationOutcome::Failed(err));
			}
			debug!(path = %location.path, fallback = %fallback, "No route matched, using fallback");
			return self.redirect(&fallback);
		};
		let descriptor = found.descriptor;

		if let RouteTarget::Redirect { destination } = descriptor.target() {
			return self.redirect(destination);
		}

		for middleware in descriptor.middleware() {
			if let Err(abort) = middleware.process(context.clone()).await {
				warn!(
					pattern = descriptor.raw_pattern(),
					target = abort.target(),
					"Middleware aborted navigation"
				);
				return self.redirect(abort.target());
			}
		}

		let factory = match descriptor.target() {
			RouteTarget::Redirect { destination } => return self.redirect(destination),
			RouteTarget::Handler(handler) => {
				if let Err(abort) = handler.handle(context.clone()).await {
					warn!(
						pattern = descriptor.raw_pattern(),
						target = abort.target(),
						"Handler aborted navigation"
					);
					return self.redirect(abort.target());
				}
				None
			}
			RouteTarget::Component(component) => {
				let cached = self.factories.get(&component.tag_name);
				let factory: Arc<dyn ComponentFactory<E>> = match cached {
					Some(factory) => factory,
					None => match self.loader.load(component).await {
						Ok(factory) => {
							self.factories.insert(&component.tag_name, Arc::clone(&factory));
							factory
						}
						Err(e) => {
							error!(
								tag = %component.tag_name,
								file = %component.file,
								error = %e,
								"Component failed to load"
							);
							self.set_state(NavigationState::Idle);
							return Hop::Done(NavigationOutcome::Failed(e.into()));
						}
					},
				};
				Some(factory)
			}
		};

		let discard = settings.discard_stale_navigations;
		if self.is_stale(attempt, discard) {
			debug!(path = %location.path, attempt, "Discarding superseded navigation");
			return Hop::Done(NavigationOutcome::Superseded);
		}

		if factory.is_some() && settings.transitions && self.last_route.read().is_some() {
			let timer = self.settings.read().transition_timer.duration();
			let release = self.gates.open(timer).wait().await;
			debug!(path = %location.path, release = ?release, "Transition gate passed");
			if self.is_stale(attempt, self.settings.read().discard_stale_navigations) {
				debug!(path = %location.path, attempt, "Discarding superseded navigation");
				return Hop::Done(NavigationOutcome::Superseded);
			}
		}

		if let Some(factory) = factory {
			let element = factory.construct(&context.tokens, &context.query, &context.data);
			self.adapter.mount(element);
		}

		let history_url = format!("/{}", relative);
		match mode {
			HistoryMode::Push => self.adapter.history_push(&history_url),
			HistoryMode::Replace => self.adapter.history_replace(&history_url),
		}
		if location.has_hash() {
			self.adapter.scroll_to_fragment(&location.hash, ScrollBehavior::Auto);
		} else {
			self.adapter.scroll_to_top();
		}

		let incoming = self.details(&location, &context);
		let outgoing = self.last_route.write().replace(RouteSnapshot {
			path: location.path.clone(),
			hash: location.hash.clone(),
			tokens: context.tokens.clone(),
			query: context.query.clone(),
		});

		self.set_state(NavigationState::Loaded);
		self.events.emit(&LifecycleEvent {
			phase: Phase::Loaded,
			outgoing,
			incoming: Some(incoming),
		});
		self.set_state(NavigationState::Idle);

		info!(path = %location.path, pattern = descriptor.raw_pattern(), "Navigation loaded");
		Hop::Done(NavigationOutcome::Loaded {
			path: location.path,
		})
	}

	fn redirect(&self, destination: &str) -> Hop {
		// Report the destination the way the next hop will match it.
		let location = match self.classify(destination) {
			Destination::Internal(relative) => ParsedLocation::parse(&relative),
			_ => ParsedLocation::parse(destination),
		};
		self.set_state(NavigationState::Redirecting);
		self.emit(Phase::Redirecting, Some(Incoming::Location(location)));
		Hop::Continue(destination.to_string())
	}

	fn details(&self, location: &ParsedLocation, context: &RouteContext) -> Incoming {
		Incoming::Route(RouteDetails {
			path: location.path.clone(),
			hash: location.hash.clone(),
			tokens: context.tokens.clone(),
			query: context.query.clone(),
			data: context.data.snapshot(),
		})
	}
}
