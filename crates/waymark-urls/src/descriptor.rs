//! Compiled route descriptors.

use crate::error::Result;
use crate::location::path_segments;
use crate::middleware::SharedMiddleware;
use crate::params::Tokens;
use crate::pattern::{CompiledPattern, Segment};
use crate::target::RouteTarget;

/// One registered route: its compiled template, target and middleware.
///
/// Descriptors are immutable once built and shared between the registry and
/// in-flight navigations.
#[derive(Clone)]
pub struct RouteDescriptor {
	pattern: CompiledPattern,
	target: RouteTarget,
	middleware: Vec<SharedMiddleware>,
}

impl RouteDescriptor {
	/// Compiles `pattern` and builds a descriptor.
	pub fn new(
		pattern: &str,
		target: RouteTarget,
		middleware: Vec<SharedMiddleware>,
	) -> Result<Self> {
		Ok(Self {
			pattern: CompiledPattern::compile(pattern)?,
			target,
			middleware,
		})
	}

	/// Returns the compiled template.
	pub fn pattern(&self) -> &CompiledPattern {
		&self.pattern
	}

	/// Returns the template as registered.
	pub fn raw_pattern(&self) -> &str {
		self.pattern.raw()
	}

	/// Returns the route target.
	pub fn target(&self) -> &RouteTarget {
		&self.target
	}

	/// Returns middleware in execution order.
	pub fn middleware(&self) -> &[SharedMiddleware] {
		&self.middleware
	}

	/// Returns whether the descriptor accepts the given path segments.
	///
	/// Segment counts must be equal unless the template has a wildcard, in
	/// which case every segment before the wildcard must still match and the
	/// wildcard accepts whatever follows, including nothing.
	pub fn matches(&self, path: &[&str]) -> bool {
		let segments = self.pattern.segments();
		if segments.len() != path.len() && !self.pattern.has_wildcard() {
			return false;
		}

		for (index, segment) in segments.iter().enumerate() {
			match segment {
				Segment::Wildcard => return true,
				_ if index >= path.len() => return false,
				Segment::Literal(text) => {
					if path[index].to_lowercase() != *text {
						return false;
					}
				}
				Segment::Token(token) => {
					let accepted = self
						.pattern
						.token_constraints()
						.get(*token)
						.is_some_and(|constraint| constraint.accepts(path[index]));
					if !accepted {
						return false;
					}
				}
			}
		}

		true
	}

	/// Binds every token of the template to the raw text of its path segment.
	///
	/// Only meaningful for paths accepted by [`Self::matches`].
	pub fn extract_tokens(&self, path: &[&str]) -> Tokens {
		let names = self.pattern.token_names();
		self.pattern
			.segments()
			.iter()
			.zip(path.iter())
			.filter_map(|(segment, value)| match segment {
				Segment::Token(index) => names.get(*index).map(|name| (name.as_str(), *value)),
				_ => None,
			})
			.collect()
	}

	/// Convenience wrapper splitting a normalized path before matching.
	pub fn matches_path(&self, normalized: &str) -> bool {
		self.matches(&path_segments(normalized))
	}
}

impl std::fmt::Debug for RouteDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDescriptor")
			.field("pattern", &self.pattern.raw())
			.field("target", &self.target)
			.field("middleware", &self.middleware.len())
			.finish()
	}
}
