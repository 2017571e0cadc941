//! Ordered route matching.

use crate::descriptor::RouteDescriptor;
use crate::location::{normalize_path, path_segments};
use crate::params::Tokens;
use std::sync::Arc;

/// A matched route together with the tokens bound from the path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The first descriptor, in registration order, accepting the path.
	pub descriptor: Arc<RouteDescriptor>,
	/// Token values taken from the path.
	pub tokens: Tokens,
}

/// Finds the first route accepting `path`.
///
/// Routes are tried in the order given; the scan stops at the first
/// descriptor that accepts the path, so earlier registrations shadow later
/// ones. The path is normalized before matching and must not carry a query
/// string or fragment.
pub fn match_path(routes: &[Arc<RouteDescriptor>], path: &str) -> Option<RouteMatch> {
	let normalized = normalize_path(path);
	let segments = path_segments(&normalized);

	let descriptor = routes.iter().find(|route| route.matches(&segments))?;
	tracing::trace!(
		path = %normalized,
		pattern = descriptor.raw_pattern(),
		"Route matched"
	);

	Some(RouteMatch {
		descriptor: Arc::clone(descriptor),
		tokens: descriptor.extract_tokens(&segments),
	})
}
