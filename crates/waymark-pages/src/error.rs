//! Error types for navigation.

use thiserror::Error;

/// Failure reported by a [`ComponentLoader`](crate::loader::ComponentLoader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
	/// The module could not be found at the given location.
	#[error("Component module not found: {file}")]
	NotFound {
		/// Module location that was requested.
		file: String,
	},

	/// The module was found but failed to load or evaluate.
	#[error("Failed to load component '{tag_name}' from {file}: {reason}")]
	Failed {
		/// Tag name of the component.
		tag_name: String,
		/// Module location that was requested.
		file: String,
		/// Loader message.
		reason: String,
	},
}

/// Reason a navigation attempt stopped without mounting anything.
///
/// These never escape [`Navigator::navigate`](crate::navigator::Navigator::navigate);
/// they are logged and reported inside
/// [`NavigationOutcome::Failed`](crate::navigator::NavigationOutcome::Failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// No route matched and the fallback path is not registered either.
	#[error("No route matches '{path}' and fallback '{fallback}' is not registered")]
	FallbackMissing {
		/// Path that failed to match.
		path: String,
		/// Configured fallback path.
		fallback: String,
	},

	/// Redirects or reroutes exceeded the configured limit.
	#[error("Navigation to '{path}' exceeded the limit of {limit} redirects")]
	TooManyRedirects {
		/// Path reached when the limit was hit.
		path: String,
		/// Configured limit.
		limit: usize,
	},

	/// The component loader failed.
	#[error(transparent)]
	Load(#[from] LoadError),

	/// The attempt's task panicked or was cancelled.
	#[error("Navigation task did not complete: {0}")]
	Interrupted(String),
}
