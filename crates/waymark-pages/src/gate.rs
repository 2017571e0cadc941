//! Transition gate.
//!
//! A gate holds back the mount of the next page until the application calls
//! [`GateKeeper::release`] (typically once an exit animation finished) or the
//! gate's timer runs out, whichever comes first. At most one gate is pending:
//! opening a new gate releases the previous one.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// How a gate was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRelease {
	/// Released explicitly.
	Released,
	/// The timer elapsed first.
	TimedOut,
	/// A newer gate replaced this one.
	Superseded,
}

struct Pending {
	id: u64,
	signal: oneshot::Sender<GateRelease>,
}

/// Owner of the pending gate.
#[derive(Default)]
pub struct GateKeeper {
	pending: Arc<Mutex<Option<Pending>>>,
	next_id: AtomicU64,
}

impl GateKeeper {
	/// Creates a keeper with no pending gate.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a gate, superseding any gate still pending.
	///
	/// `timer` of `None` waits for an explicit release only.
	pub fn open(&self, timer: Option<Duration>) -> TransitionGate {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let (signal, receiver) = oneshot::channel();

		let previous = self.pending.lock().replace(Pending { id, signal });
		if let Some(previous) = previous {
			tracing::debug!(gate = previous.id, "Transition gate superseded");
			let _ = previous.signal.send(GateRelease::Superseded);
		}

		TransitionGate {
			id,
			receiver,
			timer,
			pending: Arc::clone(&self.pending),
		}
	}

	/// Releases the pending gate. Returns `false` when no gate was pending.
	pub fn release(&self) -> bool {
		let Some(pending) = self.pending.lock().take() else {
			return false;
		};
		tracing::debug!(gate = pending.id, "Transition gate released");
		pending.signal.send(GateRelease::Released).is_ok()
	}

	/// Returns whether a gate is waiting.
	pub fn is_pending(&self) -> bool {
		self.pending.lock().is_some()
	}
}

impl std::fmt::Debug for GateKeeper {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GateKeeper")
			.field("pending", &self.is_pending())
			.finish()
	}
}

/// A one-shot barrier created by [`GateKeeper::open`].
pub struct TransitionGate {
	id: u64,
	receiver: oneshot::Receiver<GateRelease>,
	timer: Option<Duration>,
	pending: Arc<Mutex<Option<Pending>>>,
}

impl TransitionGate {
	/// Waits until the gate opens.
	pub async fn wait(self) -> GateRelease {
		let Self {
			id,
			receiver,
			timer,
			pending,
		} = self;

		let release = match timer {
			Some(delay) => {
				tokio::select! {
					signal = receiver => signal.unwrap_or(GateRelease::Superseded),
					_ = tokio::time::sleep(delay) => GateRelease::TimedOut,
				}
			}
			None => receiver.await.unwrap_or(GateRelease::Superseded),
		};

		if release == GateRelease::TimedOut {
			// Drop our own sender so a late release() reports nothing pending.
			let mut slot = pending.lock();
			if slot.as_ref().is_some_and(|p| p.id == id) {
				slot.take();
			}
		}

		tracing::debug!(gate = id, release = ?release, "Transition gate opened");
		release
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[tokio::test]
	async fn test_release_opens_gate() {
		let keeper = GateKeeper::new();
		let gate = keeper.open(None);

		assert!(keeper.is_pending());
		assert!(keeper.release());

		assert_eq!(gate.wait().await, GateRelease::Released);
		assert!(!keeper.is_pending());
	}

	#[tokio::test]
	async fn test_zero_timer_opens_without_release() {
		let keeper = GateKeeper::new();

		let release = keeper.open(Some(Duration::ZERO)).wait().await;

		assert_eq!(release, GateRelease::TimedOut);
		assert!(!keeper.is_pending());
		assert!(!keeper.release());
	}

	#[tokio::test]
	async fn test_infinite_gate_stays_closed() {
		let keeper = GateKeeper::new();
		let gate = keeper.open(None);

		let waited = tokio::time::timeout(Duration::from_millis(50), gate.wait()).await;

		assert!(waited.is_err());
	}

	#[tokio::test]
	async fn test_newer_gate_supersedes() {
		let keeper = GateKeeper::new();
		let first = keeper.open(None);
		let second = keeper.open(None);

		assert_eq!(first.wait().await, GateRelease::Superseded);
		assert!(keeper.release());
		assert_eq!(second.wait().await, GateRelease::Released);
	}

	#[rstest]
	fn test_release_without_gate() {
		let keeper = GateKeeper::new();
		assert!(!keeper.release());
	}
}
