//! Result types produced by a rule-check run.
//!
//! A run yields one [`Verdict`] per non-empty rule, in the same order as the
//! input rules. Verdicts come in two flavours:
//!
//! * **Genuine** — parsed from a well-formed judgment response.
//! * **Degraded** — the failure fallback: always fail-status with confidence
//!   0 and diagnostic evidence/reasoning, produced when a rule's evaluation
//!   could not be completed (network error, unparseable response). Degraded
//!   verdicts isolate per-rule failures so the run always finishes.

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of one rule against one document.
///
/// Serialises as lowercase (`"pass"` / `"fail"`); incoming status strings
/// are case-normalised by the verdict parser before reaching this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleStatus::Pass => write!(f, "pass"),
            RuleStatus::Fail => write!(f, "fail"),
        }
    }
}

/// The structured judgment produced for one rule.
///
/// Immutable once produced; one per rule per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The rule this verdict answers, verbatim as filtered from the input.
    pub rule: String,
    /// Pass or fail.
    pub status: RuleStatus,
    /// A supporting sentence from the document (pass) or what is missing (fail).
    pub evidence: String,
    /// Short explanation of why the rule passed or failed.
    pub reasoning: String,
    /// Model-reported confidence, 0–100. Always 0 for degraded verdicts.
    pub confidence: u8,
}

impl Verdict {
    /// Construct the failure-fallback verdict for a rule whose evaluation
    /// could not be completed.
    pub fn degraded(rule: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            status: RuleStatus::Fail,
            evidence: "The rule could not be evaluated against the document".to_string(),
            reasoning: detail.into(),
            confidence: 0,
        }
    }
}

/// Outcome of evaluating one rule, with per-rule accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResult {
    /// The verdict itself.
    pub verdict: Verdict,
    /// True when the verdict is the failure fallback rather than a parsed
    /// judgment.
    pub degraded: bool,
    /// Prompt tokens reported by the judgment service (0 when degraded
    /// before a response arrived).
    pub input_tokens: usize,
    /// Completion tokens reported by the judgment service.
    pub output_tokens: usize,
    /// Wall-clock duration of this rule's evaluation.
    pub duration_ms: u64,
}

/// Aggregate statistics for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStats {
    /// Rules evaluated (after filtering empties).
    pub rules_total: usize,
    /// Verdicts with pass status.
    pub rules_passed: usize,
    /// Verdicts with fail status (includes degraded).
    pub rules_failed: usize,
    /// Fail verdicts that are failure fallbacks, not model judgments.
    pub rules_degraded: usize,
    /// Pages in the source document.
    pub pages: usize,
    /// Character count of the trimmed extracted text blob.
    pub text_chars: usize,
    /// Total prompt tokens across all rules.
    pub total_input_tokens: u64,
    /// Total completion tokens across all rules.
    pub total_output_tokens: u64,
    /// Time spent extracting text.
    pub extract_duration_ms: u64,
    /// Time spent in judgment calls.
    pub judge_duration_ms: u64,
    /// End-to-end run time.
    pub total_duration_ms: u64,
}

/// Everything a completed run produces: one result per filtered rule, in
/// input order, plus run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    /// Per-rule results in the same order as the filtered input rules.
    pub results: Vec<RuleResult>,
    /// Aggregate run statistics.
    pub stats: CheckStats,
}

impl CheckOutput {
    /// The verdicts alone, in rule order.
    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.results.iter().map(|r| &r.verdict)
    }

    /// True when every rule passed.
    pub fn all_passed(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.verdict.status == RuleStatus::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&RuleStatus::Pass).unwrap(), "\"pass\"");
        assert_eq!(serde_json::to_string(&RuleStatus::Fail).unwrap(), "\"fail\"");
    }

    #[test]
    fn status_display_matches_serde() {
        assert_eq!(RuleStatus::Pass.to_string(), "pass");
        assert_eq!(RuleStatus::Fail.to_string(), "fail");
    }

    #[test]
    fn degraded_verdict_shape() {
        let v = Verdict::degraded("dated within 2024", "judgment service error: connection reset");
        assert_eq!(v.rule, "dated within 2024");
        assert_eq!(v.status, RuleStatus::Fail);
        assert_eq!(v.confidence, 0);
        assert!(v.reasoning.contains("connection reset"));
    }

    #[test]
    fn all_passed_reflects_statuses() {
        let pass = RuleResult {
            verdict: Verdict {
                rule: "r1".into(),
                status: RuleStatus::Pass,
                evidence: "e".into(),
                reasoning: "r".into(),
                confidence: 90,
            },
            degraded: false,
            input_tokens: 10,
            output_tokens: 5,
            duration_ms: 1,
        };
        let mut fail = pass.clone();
        fail.verdict.status = RuleStatus::Fail;

        let output = CheckOutput {
            results: vec![pass.clone()],
            stats: empty_stats(1),
        };
        assert!(output.all_passed());

        let output = CheckOutput {
            results: vec![pass, fail],
            stats: empty_stats(2),
        };
        assert!(!output.all_passed());
    }

    fn empty_stats(total: usize) -> CheckStats {
        CheckStats {
            rules_total: total,
            rules_passed: 0,
            rules_failed: 0,
            rules_degraded: 0,
            pages: 0,
            text_chars: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            extract_duration_ms: 0,
            judge_duration_ms: 0,
            total_duration_ms: 0,
        }
    }
}
