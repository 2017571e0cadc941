//! Turns link activations and history pops into navigations.

use crate::adapter::HistoryMode;
use crate::navigator::{NavigationTask, Navigator};
use serde::{Deserialize, Serialize};

/// An activated link, as reported by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkActivation {
	/// The link's `href` attribute as written.
	pub href: String,
	/// The link's `target` attribute.
	pub target: Option<String>,
	/// The link's `history` attribute: `push` or `replace`.
	pub history_hint: Option<String>,
	/// Whether the resolved link points at this page's origin.
	pub same_origin: bool,
}

impl LinkActivation {
	/// Creates a same-origin activation of `href`.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			target: None,
			history_hint: None,
			same_origin: true,
		}
	}

	/// Sets the `target` attribute.
	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Sets the `history` attribute.
	pub fn with_history_hint(mut self, hint: impl Into<String>) -> Self {
		self.history_hint = Some(hint.into());
		self
	}

	/// Marks the link as pointing at another origin.
	pub fn cross_origin(mut self) -> Self {
		self.same_origin = false;
		self
	}

	/// Returns whether the navigator should take over this link.
	pub fn is_routable(&self) -> bool {
		let blank = self
			.target
			.as_deref()
			.is_some_and(|target| target.trim() == "_blank");
		self.same_origin && !blank && !self.href.trim().is_empty()
	}

	/// History mode requested by the link, defaulting to push.
	pub fn history_mode(&self) -> HistoryMode {
		self.history_hint
			.as_deref()
			.and_then(HistoryMode::from_hint)
			.unwrap_or_default()
	}
}

/// Feeds page events into a [`Navigator`].
pub struct NavigationTrigger<E> {
	navigator: Navigator<E>,
}

impl<E> std::fmt::Debug for NavigationTrigger<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationTrigger").finish_non_exhaustive()
	}
}

impl<E: Send + 'static> NavigationTrigger<E> {
	/// Creates a trigger driving `navigator`.
	pub fn new(navigator: Navigator<E>) -> Self {
		Self { navigator }
	}

	/// Handles a link activation.
	///
	/// Returns `None` when the link is left to the page: it opens a new
	/// window, points at another origin or has no `href`. Otherwise the
	/// default action should be prevented.
	pub fn link_activated(&self, link: &LinkActivation) -> Option<NavigationTask> {
		if !link.is_routable() {
			tracing::trace!(href = %link.href, "Link left to the page");
			return None;
		}
		Some(self.navigator.navigate_to(&link.href, link.history_mode()))
	}

	/// Handles a history pop to `url`; the history entry is replaced, not pushed.
	pub fn pop_state(&self, url: &str) -> NavigationTask {
		self.navigator.navigate_to(url, HistoryMode::Replace)
	}
}
