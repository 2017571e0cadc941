//! Error types for route compilation.

use thiserror::Error;

/// Error raised while compiling a route template.
///
/// Compilation happens at registration time, so every variant is fatal for
/// the route being registered: the registry never stores a half-compiled
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
	/// A `{` was opened but never closed.
	#[error("Unterminated token in route pattern '{pattern}'")]
	UnterminatedToken {
		/// The offending pattern.
		pattern: String,
	},

	/// A `}` appeared without a matching `{`.
	#[error("Unmatched '}}' in route pattern '{pattern}'")]
	UnmatchedBrace {
		/// The offending pattern.
		pattern: String,
	},

	/// A token was declared without a name, e.g. `{}` or `{:[0-9]+}`.
	#[error("Empty token name in route pattern '{pattern}'")]
	EmptyTokenName {
		/// The offending pattern.
		pattern: String,
	},

	/// A token shares its segment with literal text, e.g. `post-{id}`.
	#[error("Segment '{segment}' of route pattern '{pattern}' mixes a token with literal text")]
	MixedSegment {
		/// The offending pattern.
		pattern: String,
		/// The segment that could not be classified.
		segment: String,
	},

	/// The same token name was declared twice.
	#[error("Token '{name}' is declared more than once in route pattern '{pattern}'")]
	DuplicateToken {
		/// The offending pattern.
		pattern: String,
		/// The repeated token name.
		name: String,
	},

	/// The constraint source of a token is not a valid regular expression.
	#[error("Invalid constraint for token '{name}' in route pattern '{pattern}': {reason}")]
	InvalidConstraint {
		/// The offending pattern.
		pattern: String,
		/// The token carrying the constraint.
		name: String,
		/// Compiler message.
		reason: String,
	},

	/// The pattern exceeds the maximum accepted length.
	#[error("Route pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum length in bytes.
		max: usize,
	},

	/// The pattern has more segments than the matcher accepts.
	#[error("Route pattern '{pattern}' has {count} segments, exceeding maximum of {max}")]
	TooManySegments {
		/// The offending pattern.
		pattern: String,
		/// Actual number of segments.
		count: usize,
		/// Maximum number of segments.
		max: usize,
	},
}

/// Result type for route compilation and registration.
pub type Result<T> = std::result::Result<T, CompileError>;
