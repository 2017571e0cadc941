//! Navigator settings.
//!
//! Settings can be built in code, parsed from TOML text or read from a TOML
//! file. Every field has a default, so a file only names what it changes:
//!
//! ```toml
//! fallback_path = "not-found"
//! transitions = true
//! transition_timer = "infinite"   # or -1, or a number of milliseconds
//! max_redirects = 8
//! discard_stale_navigations = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use waymark_urls::normalize_path;

/// Default wait before a pending transition gate opens on its own.
pub const DEFAULT_TRANSITION_TIMER: Duration = Duration::from_millis(5000);

/// Default bound on redirects and reroutes within one navigation.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// Errors raised while loading or changing settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),
}

/// How long a transition gate waits for an explicit release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimer", into = "RawTimer")]
pub enum TransitionTimer {
	/// Open the gate after the given delay.
	After(Duration),
	/// Wait for [`Navigator::transition`](crate::navigator::Navigator::transition) only.
	Infinite,
}

impl TransitionTimer {
	/// Interprets a millisecond count, where `None` and `-1` disable the timer.
	///
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use waymark_pages::TransitionTimer;
	///
	/// assert_eq!(TransitionTimer::from_millis(Some(250)).unwrap(), TransitionTimer::After(Duration::from_millis(250)));
	/// assert_eq!(TransitionTimer::from_millis(Some(-1)).unwrap(), TransitionTimer::Infinite);
	/// assert_eq!(TransitionTimer::from_millis(None).unwrap(), TransitionTimer::Infinite);
	/// assert!(TransitionTimer::from_millis(Some(-5)).is_err());
	/// ```
	pub fn from_millis(millis: Option<i64>) -> Result<Self, SettingsError> {
		match millis {
			None | Some(-1) => Ok(Self::Infinite),
			Some(ms) if ms >= 0 => Ok(Self::After(Duration::from_millis(ms.unsigned_abs()))),
			Some(ms) => Err(SettingsError::ValidationError(format!(
				"transition_timer must be -1, \"infinite\" or a non-negative number of milliseconds, got {}",
				ms
			))),
		}
	}

	/// Returns the delay, or `None` when the timer is disabled.
	pub fn duration(&self) -> Option<Duration> {
		match self {
			Self::After(delay) => Some(*delay),
			Self::Infinite => None,
		}
	}
}

impl Default for TransitionTimer {
	fn default() -> Self {
		Self::After(DEFAULT_TRANSITION_TIMER)
	}
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTimer {
	Millis(i64),
	Word(String),
}

impl TryFrom<RawTimer> for TransitionTimer {
	type Error = SettingsError;

	fn try_from(raw: RawTimer) -> Result<Self, Self::Error> {
		match raw {
			RawTimer::Millis(ms) => Self::from_millis(Some(ms)),
			RawTimer::Word(word) if word.trim().eq_ignore_ascii_case("infinite") => {
				Ok(Self::Infinite)
			}
			RawTimer::Word(word) => Err(SettingsError::ValidationError(format!(
				"unknown transition_timer value '{}'",
				word
			))),
		}
	}
}

impl From<TransitionTimer> for RawTimer {
	fn from(timer: TransitionTimer) -> Self {
		match timer {
			TransitionTimer::After(delay) => {
				RawTimer::Millis(i64::try_from(delay.as_millis()).unwrap_or(i64::MAX))
			}
			TransitionTimer::Infinite => RawTimer::Word("infinite".to_string()),
		}
	}
}

/// Configuration of a [`Navigator`](crate::navigator::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSettings {
	/// Path navigated to when nothing matches. Stored normalized.
	pub fallback_path: String,
	/// Whether mounting waits on a transition gate.
	pub transitions: bool,
	/// How long a gate waits before opening on its own.
	pub transition_timer: TransitionTimer,
	/// Redirects and reroutes allowed within one navigation.
	pub max_redirects: usize,
	/// Whether a superseded navigation stops before touching the page.
	pub discard_stale_navigations: bool,
}

impl Default for NavigatorSettings {
	fn default() -> Self {
		Self {
			fallback_path: "404".to_string(),
			transitions: false,
			transition_timer: TransitionTimer::default(),
			max_redirects: DEFAULT_MAX_REDIRECTS,
			discard_stale_navigations: true,
		}
	}
}

impl NavigatorSettings {
	/// Parses settings from TOML text.
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		let settings: NavigatorSettings = toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;
		settings.validated()
	}

	/// Reads settings from a TOML file.
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&contents)
	}

	/// Checks the settings and normalizes the fallback path.
	pub fn validated(mut self) -> Result<Self, SettingsError> {
		if self.max_redirects == 0 {
			return Err(SettingsError::ValidationError(
				"max_redirects must be at least 1".to_string(),
			));
		}
		self.fallback_path = normalize_path(&self.fallback_path);
		Ok(self)
	}

	/// Sets the fallback path.
	pub fn with_fallback_path(mut self, path: &str) -> Self {
		self.fallback_path = normalize_path(path);
		self
	}

	/// Enables or disables transition gates.
	pub fn with_transitions(mut self, enabled: bool) -> Self {
		self.transitions = enabled;
		self
	}

	/// Sets the gate timer.
	pub fn with_transition_timer(mut self, timer: TransitionTimer) -> Self {
		self.transition_timer = timer;
		self
	}

	/// Sets the redirect limit.
	pub fn with_max_redirects(mut self, limit: usize) -> Self {
		self.max_redirects = limit;
		self
	}

	/// Enables or disables discarding of superseded navigations.
	pub fn with_discard_stale_navigations(mut self, discard: bool) -> Self {
		self.discard_stale_navigations = discard;
		self
	}
}
