//! Route template compilation.
//!
//! A template such as `/blog/{slug}/{id:[0-9]+}` is compiled once, at
//! registration time, into a [`CompiledPattern`]: one [`Segment`] per
//! `/`-delimited element plus the declared token names and their
//! constraints.
//!
//! # Template Syntax
//!
//! - `about` - literal segment, matched case-insensitively
//! - `{name}` - token matching any single segment
//! - `{name:regex}` - token whose segment must fully match `regex`
//! - `*` - wildcard accepting the rest of the path
//!
//! A token always occupies a whole segment. Constraints may contain braces
//! (`{year:[0-9]{4}}`) because token boundaries are found by brace depth.

use crate::error::{CompileError, Result};
use crate::location::normalize_path;
use regex::{Regex, RegexBuilder};

/// Maximum allowed length for a route template in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of segments in a route template.
const MAX_PATTERN_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled token constraint (in bytes).
const MAX_CONSTRAINT_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// One `/`-delimited element of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Lower-cased literal text.
	Literal(String),
	/// Token, referencing its index in the declaration order.
	Token(usize),
	/// `*`: accepts the remainder of the path.
	Wildcard,
}

/// Predicate deciding whether a path segment can bind to a token.
#[derive(Clone)]
pub struct TokenConstraint {
	source: Option<String>,
	regex: Option<Regex>,
}

impl TokenConstraint {
	/// A constraint accepting every segment.
	pub fn any() -> Self {
		Self {
			source: None,
			regex: None,
		}
	}

	/// Compiles a constraint; the expression must match the whole segment.
	fn compile(source: &str) -> std::result::Result<Self, regex::Error> {
		let regex = RegexBuilder::new(&format!("^(?:{})$", source))
			.size_limit(MAX_CONSTRAINT_REGEX_SIZE)
			.build()?;

		Ok(Self {
			source: Some(source.to_string()),
			regex: Some(regex),
		})
	}

	/// Returns the constraint source as written in the template.
	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	/// Returns whether `segment` satisfies the constraint.
	pub fn accepts(&self, segment: &str) -> bool {
		self.regex
			.as_ref()
			.map(|regex| regex.is_match(segment))
			.unwrap_or(true)
	}
}

impl std::fmt::Debug for TokenConstraint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.source {
			Some(source) => write!(f, "TokenConstraint({:?})", source),
			None => f.write_str("TokenConstraint(any)"),
		}
	}
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
	raw: String,
	segments: Vec<Segment>,
	token_names: Vec<String>,
	token_constraints: Vec<TokenConstraint>,
}

impl CompiledPattern {
	/// Compiles a route template.
	///
	/// # Errors
	///
	/// Returns a [`CompileError`] when braces are unbalanced, a token has no
	/// name, is declared twice or shares its segment with literal text, a
	/// constraint is not a valid regular expression, or the template exceeds
	/// the length or segment limits.
	///
	/// # Examples
	///
	/// ```
	/// use waymark_urls::{CompiledPattern, Segment};
	///
	/// let pattern = CompiledPattern::compile("/Blog/{slug}/{id:[0-9]+}").unwrap();
	/// assert_eq!(
	///     pattern.segments(),
	///     &[Segment::Literal("blog".into()), Segment::Token(0), Segment::Token(1)]
	/// );
	/// assert_eq!(pattern.token_names(), &["slug", "id"]);
	/// assert!(pattern.token_constraints()[1].accepts("42"));
	/// assert!(!pattern.token_constraints()[1].accepts("abc"));
	/// ```
	pub fn compile(raw: &str) -> Result<Self> {
		if raw.len() > MAX_PATTERN_LENGTH {
			return Err(CompileError::TooLong {
				length: raw.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let normalized = normalize_path(raw);
		let pieces = split_segments(raw, &normalized)?;
		if pieces.len() > MAX_PATTERN_SEGMENTS {
			return Err(CompileError::TooManySegments {
				pattern: raw.to_string(),
				count: pieces.len(),
				max: MAX_PATTERN_SEGMENTS,
			});
		}

		let mut segments = Vec::with_capacity(pieces.len());
		let mut token_names: Vec<String> = Vec::new();
		let mut token_constraints = Vec::new();

		for piece in pieces {
			if piece == "*" {
				segments.push(Segment::Wildcard);
				continue;
			}

			let Some(body) = token_body(piece) else {
				if piece.contains(['{', '}']) {
					return Err(CompileError::MixedSegment {
						pattern: raw.to_string(),
						segment: piece.to_string(),
					});
				}
				segments.push(Segment::Literal(piece.to_lowercase()));
				continue;
			};

			let (name, constraint) = match body.split_once(':') {
				Some((name, source)) => (name.trim(), Some(source.trim())),
				None => (body.trim(), None),
			};

			if name.is_empty() {
				return Err(CompileError::EmptyTokenName {
					pattern: raw.to_string(),
				});
			}
			if token_names.iter().any(|existing| existing == name) {
				return Err(CompileError::DuplicateToken {
					pattern: raw.to_string(),
					name: name.to_string(),
				});
			}

			let constraint = match constraint.filter(|source| !source.is_empty()) {
				Some(source) => TokenConstraint::compile(source).map_err(|e| {
					CompileError::InvalidConstraint {
						pattern: raw.to_string(),
						name: name.to_string(),
						reason: e.to_string(),
					}
				})?,
				None => TokenConstraint::any(),
			};

			// Indices follow occurrence order: the n-th token declared is Token(n).
			segments.push(Segment::Token(token_names.len()));
			token_names.push(name.to_string());
			token_constraints.push(constraint);
		}

		Ok(Self {
			raw: raw.to_string(),
			segments,
			token_names,
			token_constraints,
		})
	}

	/// Returns the template as registered.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Returns the compiled segments.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Returns token names in declaration order.
	pub fn token_names(&self) -> &[String] {
		&self.token_names
	}

	/// Returns token constraints, index-aligned with [`Self::token_names`].
	pub fn token_constraints(&self) -> &[TokenConstraint] {
		&self.token_constraints
	}

	/// Returns whether the template contains a wildcard segment.
	pub fn has_wildcard(&self) -> bool {
		self.segments.contains(&Segment::Wildcard)
	}
}

impl std::fmt::Display for CompiledPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.raw)
	}
}

/// Splits a normalized template on `/` outside of braces.
fn split_segments<'a>(raw: &str, normalized: &'a str) -> Result<Vec<&'a str>> {
	let mut pieces = Vec::new();
	let mut depth = 0usize;
	let mut start = 0;

	for (index, c) in normalized.char_indices() {
		match c {
			'{' => depth += 1,
			'}' => {
				depth = depth.checked_sub(1).ok_or_else(|| CompileError::UnmatchedBrace {
					pattern: raw.to_string(),
				})?;
			}
			'/' if depth == 0 => {
				pieces.push(&normalized[start..index]);
				start = index + 1;
			}
			_ => {}
		}
	}

	if depth > 0 {
		return Err(CompileError::UnterminatedToken {
			pattern: raw.to_string(),
		});
	}

	pieces.push(&normalized[start..]);
	Ok(pieces)
}

/// Returns the inside of `piece` when the whole piece is a single `{...}` token.
fn token_body(piece: &str) -> Option<&str> {
	if !piece.starts_with('{') || !piece.ends_with('}') {
		return None;
	}

	// The opening brace must close exactly at the last character.
	let mut depth = 0usize;
	for (index, c) in piece.char_indices() {
		match c {
			'{' => depth += 1,
			'}' => {
				depth -= 1;
				if depth == 0 {
					return (index == piece.len() - 1).then(|| &piece[1..index]);
				}
			}
			_ => {}
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_literal_segments_are_lowercased() {
		let pattern = CompiledPattern::compile("/About/Team/").unwrap();

		assert_eq!(
			pattern.segments(),
			&[
				Segment::Literal("about".to_string()),
				Segment::Literal("team".to_string())
			]
		);
		assert!(pattern.token_names().is_empty());
		assert_eq!(pattern.raw(), "/About/Team/");
	}

	#[rstest]
	fn test_root_pattern() {
		let pattern = CompiledPattern::compile("/").unwrap();
		assert_eq!(pattern.segments(), &[Segment::Literal(String::new())]);
	}

	#[rstest]
	fn test_token_indices_follow_occurrence_order() {
		let pattern =
			CompiledPattern::compile("/{a:[0-9]+}/x/{b}/{c:[a-z]+}").unwrap();

		assert_eq!(
			pattern.segments(),
			&[
				Segment::Token(0),
				Segment::Literal("x".to_string()),
				Segment::Token(1),
				Segment::Token(2),
			]
		);
		assert_eq!(pattern.token_names(), &["a", "b", "c"]);

		// Each token carries its own constraint, not the first token's.
		let constraints = pattern.token_constraints();
		assert_eq!(constraints[0].source(), Some("[0-9]+"));
		assert_eq!(constraints[1].source(), None);
		assert_eq!(constraints[2].source(), Some("[a-z]+"));
		assert!(constraints[2].accepts("abc"));
		assert!(!constraints[2].accepts("123"));
	}

	#[rstest]
	fn test_token_names_keep_case() {
		let pattern = CompiledPattern::compile("/blog/{SLUG}").unwrap();
		assert_eq!(pattern.token_names(), &["SLUG"]);
	}

	#[rstest]
	fn test_constraint_with_quantifier_braces() {
		let pattern = CompiledPattern::compile("/archive/{year:[0-9]{4}}").unwrap();
		let year = &pattern.token_constraints()[0];

		assert!(year.accepts("2024"));
		assert!(!year.accepts("24"));
	}

	#[rstest]
	fn test_constraint_is_anchored() {
		let pattern = CompiledPattern::compile("/items/{id:[0-9]+}").unwrap();
		let id = &pattern.token_constraints()[0];

		assert!(id.accepts("42"));
		assert!(!id.accepts("a42"));
		assert!(!id.accepts("42a"));
	}

	#[rstest]
	fn test_empty_constraint_matches_any() {
		let pattern = CompiledPattern::compile("/items/{id:}").unwrap();
		assert!(pattern.token_constraints()[0].accepts("anything"));
	}

	#[rstest]
	fn test_wildcard() {
		let pattern = CompiledPattern::compile("/docs/*").unwrap();

		assert!(pattern.has_wildcard());
		assert_eq!(pattern.segments()[1], Segment::Wildcard);
	}

	#[rstest]
	fn test_repeated_slashes_collapse() {
		let pattern = CompiledPattern::compile("//users///{id}//").unwrap();
		assert_eq!(pattern.segments().len(), 2);
	}

	#[rstest]
	#[case("/blog/{slug", "Unterminated")]
	#[case("/blog/slug}", "Unmatched")]
	#[case("/blog/{}", "Empty token name")]
	#[case("/blog/{:[0-9]+}", "Empty token name")]
	#[case("/blog/post-{id}", "mixes a token")]
	#[case("/blog/{id}/{id}", "more than once")]
	#[case("/items/{id:[0-9}", "Invalid constraint")]
	fn test_compile_errors(#[case] template: &str, #[case] expected: &str) {
		let err = CompiledPattern::compile(template).unwrap_err();
		assert!(
			err.to_string().contains(expected),
			"unexpected error for {}: {}",
			template,
			err
		);
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		// Arrange: a pattern exceeding 1024 bytes
		let long_pattern = "/".to_string() + &"a".repeat(1025);

		// Act
		let result = CompiledPattern::compile(&long_pattern);

		// Assert
		assert!(matches!(result, Err(CompileError::TooLong { .. })));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		// Arrange: a pattern with more than 32 segments
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}/", segments.join("/"));

		// Act
		let result = CompiledPattern::compile(&pattern);

		// Assert
		assert!(matches!(
			result,
			Err(CompileError::TooManySegments { count: 35, .. })
		));
	}
}
