//! Readiness gate for the text-extraction capability.
//!
//! The PDF engine is an external dependency that may still be initialising
//! when a check is requested (first-run library download, lazy binding).
//! Rather than failing immediately or blocking forever, the pipeline polls
//! an explicit gate on a fixed interval and gives up after a bounded wait.
//!
//! The gate is injected through [`crate::config::CheckConfig`] instead of
//! living in ambient global state, so tests can simulate never-ready and
//! already-ready conditions deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// A cloneable readiness flag with a bounded polling wait.
///
/// Cloning shares the underlying flag: marking one clone ready makes every
/// clone ready.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    ready: Arc<AtomicBool>,
}

impl ReadinessGate {
    /// A gate that starts not-ready.
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A gate that is ready from the start. This is the default in
    /// [`crate::config::CheckConfig`], where the PDF engine is linked into
    /// the process rather than loaded on demand.
    pub fn ready() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the capability ready. Idempotent.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Current readiness, without waiting.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Wait for readiness, polling every `poll` up to `timeout`.
    ///
    /// Returns `true` as soon as the gate is ready, `false` once the
    /// timeout elapses. Never waits longer than `timeout`.
    pub async fn await_ready(&self, timeout: Duration, poll: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_ready() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(poll).await;
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn already_ready_returns_without_waiting() {
        let gate = ReadinessGate::ready();
        assert!(gate.is_ready());
        assert!(
            gate.await_ready(Duration::from_millis(10), Duration::from_millis(1))
                .await
        );
    }

    #[tokio::test(start_paused = true)]
    async fn never_ready_times_out() {
        let gate = ReadinessGate::new();
        let ready = gate
            .await_ready(Duration::from_secs(5), Duration::from_millis(100))
            .await;
        assert!(!ready);
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_mid_wait() {
        let gate = ReadinessGate::new();
        let waiter = gate.clone();

        let handle = tokio::spawn(async move {
            waiter
                .await_ready(Duration::from_secs(5), Duration::from_millis(100))
                .await
        });

        sleep(Duration::from_millis(250)).await;
        gate.mark_ready();

        assert!(handle.await.unwrap());
    }

    #[test]
    fn clones_share_the_flag() {
        let gate = ReadinessGate::new();
        let clone = gate.clone();
        clone.mark_ready();
        assert!(gate.is_ready());
    }
}
