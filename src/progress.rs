//! Progress-callback trait for per-rule check events.
//!
//! Inject an [`Arc<dyn CheckProgressCallback>`] via
//! [`crate::config::CheckConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the rule list.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a UI, or a terminal progress bar without
//! the library knowing anything about how the host application communicates.
//! Rules are evaluated strictly sequentially, so callbacks arrive in rule
//! order; the trait is still `Send + Sync` so hosts may hand the same
//! callback to multiple runs.

use crate::output::Verdict;
use std::sync::Arc;

/// Called by the pipeline as it processes each rule.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait CheckProgressCallback: Send + Sync {
    /// Called once after extraction, before any rule is evaluated.
    fn on_check_start(&self, total_rules: usize) {
        let _ = total_rules;
    }

    /// Called just before a rule's judgment request is sent.
    ///
    /// `index` is 0-based position in the filtered rule list.
    fn on_rule_start(&self, index: usize, total_rules: usize, rule: &str) {
        let _ = (index, total_rules, rule);
    }

    /// Called when a rule's verdict is available (genuine or degraded).
    fn on_rule_complete(&self, index: usize, total_rules: usize, verdict: &Verdict) {
        let _ = (index, total_rules, verdict);
    }

    /// Called once after every rule has a verdict.
    fn on_check_complete(&self, total_rules: usize, passed: usize) {
        let _ = (total_rules, passed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CheckProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CheckConfig`].
pub type ProgressCallback = Arc<dyn CheckProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RuleStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        final_passed: AtomicUsize,
    }

    impl CheckProgressCallback for TrackingCallback {
        fn on_rule_start(&self, _index: usize, _total: usize, _rule: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_rule_complete(&self, _index: usize, _total: usize, _verdict: &Verdict) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_check_complete(&self, _total: usize, passed: usize) {
            self.final_passed.store(passed, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let verdict = Verdict {
            rule: "r".into(),
            status: RuleStatus::Pass,
            evidence: "e".into(),
            reasoning: "why".into(),
            confidence: 80,
        };
        cb.on_check_start(2);
        cb.on_rule_start(0, 2, "r");
        cb.on_rule_complete(0, 2, &verdict);
        cb.on_check_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            final_passed: AtomicUsize::new(0),
        };
        let verdict = Verdict::degraded("r", "detail");

        tracker.on_check_start(2);
        tracker.on_rule_start(0, 2, "a");
        tracker.on_rule_complete(0, 2, &verdict);
        tracker.on_rule_start(1, 2, "b");
        tracker.on_rule_complete(1, 2, &verdict);
        tracker.on_check_complete(2, 0);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.final_passed.load(Ordering::SeqCst), 0);
    }
}
