//! Lifecycle events.
//!
//! The navigator publishes one [`LifecycleEvent`] per phase of a navigation
//! on an [`EventBus`]. Listeners subscribe to a single [`Phase`] and are
//! called synchronously, in subscription order, on the task running the
//! navigation.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use waymark_urls::{ParsedLocation, QueryMap, Tokens};

/// Phase of the navigation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
	/// The navigator finished its initial navigation.
	Ready,
	/// A URL is about to be matched.
	Preloading,
	/// A route matched; middleware and loading follow.
	Loading,
	/// The navigation continues toward another URL.
	Redirecting,
	/// The route is mounted and the history updated.
	Loaded,
}

impl Phase {
	/// Returns the lowercase phase name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Ready => "ready",
			Self::Preloading => "preloading",
			Self::Loading => "loading",
			Self::Redirecting => "redirecting",
			Self::Loaded => "loaded",
		}
	}
}

impl std::fmt::Display for Phase {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The most recently completed navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteSnapshot {
	/// Normalized path.
	pub path: String,
	/// Fragment without `#`.
	pub hash: String,
	/// Tokens bound by the matched route.
	pub tokens: Tokens,
	/// Parsed query string.
	pub query: QueryMap,
}

/// A matched route as seen by `loading` and `loaded` listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDetails {
	/// Normalized path.
	pub path: String,
	/// Fragment without `#`.
	pub hash: String,
	/// Tokens bound by the matched route.
	pub tokens: Tokens,
	/// Parsed query string.
	pub query: QueryMap,
	/// Content of the data bag when the event was emitted.
	pub data: Map<String, Value>,
}

/// Where a navigation is heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Incoming {
	/// A URL not yet matched (`preloading`, `redirecting`).
	Location(ParsedLocation),
	/// A matched route (`loading`, `loaded`).
	Route(RouteDetails),
}

impl Incoming {
	/// Returns the normalized path of the destination.
	pub fn path(&self) -> &str {
		match self {
			Self::Location(location) => &location.path,
			Self::Route(route) => &route.path,
		}
	}
}

/// Payload of every lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifecycleEvent {
	/// Phase that produced the event.
	pub phase: Phase,
	/// Route the navigator is leaving, if any navigation completed before.
	pub outgoing: Option<RouteSnapshot>,
	/// Destination of the navigation; absent for `ready`.
	pub incoming: Option<Incoming>,
}

/// Identifier returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener callback.
pub type Listener = Arc<dyn Fn(&LifecycleEvent) + Send + Sync>;

struct Subscription {
	id: SubscriptionId,
	phase: Phase,
	listener: Listener,
}

/// Publish-subscribe bus for lifecycle events.
pub struct EventBus {
	subscriptions: RwLock<Vec<Subscription>>,
	next_id: AtomicU64,
}

impl EventBus {
	/// Creates a bus without listeners.
	pub fn new() -> Self {
		Self {
			subscriptions: RwLock::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Subscribes `listener` to `phase`.
	pub fn on<F>(&self, phase: Phase, listener: F) -> SubscriptionId
	where
		F: Fn(&LifecycleEvent) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.subscriptions.write().push(Subscription {
			id,
			phase,
			listener: Arc::new(listener),
		});
		id
	}

	/// Removes a subscription. Returns `false` when it was already gone.
	pub fn off(&self, id: SubscriptionId) -> bool {
		let mut subscriptions = self.subscriptions.write();
		let before = subscriptions.len();
		subscriptions.retain(|subscription| subscription.id != id);
		subscriptions.len() != before
	}

	/// Delivers `event` to the listeners of its phase.
	///
	/// Listeners are collected before any is called, so a listener may
	/// subscribe or unsubscribe without deadlocking the bus.
	pub fn emit(&self, event: &LifecycleEvent) -> usize {
		let listeners: Vec<Listener> = self
			.subscriptions
			.read()
			.iter()
			.filter(|subscription| subscription.phase == event.phase)
			.map(|subscription| Arc::clone(&subscription.listener))
			.collect();

		tracing::debug!(
			phase = %event.phase,
			listeners = listeners.len(),
			incoming = event.incoming.as_ref().map(Incoming::path),
			"Lifecycle event"
		);

		for listener in &listeners {
			listener(event);
		}
		listeners.len()
	}

	/// Returns the number of active subscriptions.
	pub fn len(&self) -> usize {
		self.subscriptions.read().len()
	}

	/// Returns whether no listener is subscribed.
	pub fn is_empty(&self) -> bool {
		self.subscriptions.read().is_empty()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("subscriptions", &self.len())
			.finish()
	}
}
