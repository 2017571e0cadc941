//! Page-side collaborator: mounting, history and scrolling.

use serde::{Deserialize, Serialize};

/// How a navigation records itself in the session history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	/// Add a new history entry.
	#[default]
	Push,
	/// Replace the current history entry.
	Replace,
}

impl HistoryMode {
	/// Reads a `push` / `replace` hint, as carried by a link attribute.
	pub fn from_hint(hint: &str) -> Option<Self> {
		match hint.trim() {
			"push" => Some(Self::Push),
			"replace" => Some(Self::Replace),
			_ => None,
		}
	}
}

/// Scroll animation requested from the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
	/// Jump immediately.
	Auto,
	/// Animate the scroll.
	#[default]
	Smooth,
}

/// What the navigator is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationState {
	/// No navigation in progress.
	#[default]
	Idle,
	/// Matching a URL.
	Preloading,
	/// Running middleware, loading the component or waiting on the gate.
	Loading,
	/// Following a redirect or reroute.
	Redirecting,
	/// Mounted; listeners are being notified.
	Loaded,
}

/// Bridge between the navigator and the page it drives.
///
/// URLs handed to the history methods are origin-relative and start with
/// `/`, e.g. `/blog/hello?ref=home#comments`.
pub trait MountAdapter<E>: Send + Sync {
	/// Replaces the mounted element with `element`.
	fn mount(&self, element: E);

	/// Replaces the current history entry.
	fn history_replace(&self, url: &str);

	/// Pushes a new history entry.
	fn history_push(&self, url: &str);

	/// Scrolls the element with the given id into view.
	///
	/// Returns `false` when no such element exists.
	fn scroll_to_fragment(&self, id: &str, behavior: ScrollBehavior) -> bool;

	/// Scrolls the mounted element to its top.
	fn scroll_to_top(&self);

	/// Returns the current origin-relative URL.
	fn current_path(&self) -> String;

	/// Returns the page origin, e.g. `https://example.com`.
	fn origin(&self) -> String;

	/// Leaves the application for a URL on another origin.
	fn navigate_external(&self, url: &str);

	/// Called whenever the navigator changes state.
	fn state_changed(&self, _state: NavigationState) {}
}
