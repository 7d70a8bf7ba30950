//! Verdict parsing: turn a raw judgment response into a validated [`Verdict`].
//!
//! ## Why is tolerant recovery necessary?
//!
//! The prompt mandates pure JSON, but LLM providers are not guaranteed to
//! comply — responses routinely arrive wrapped in explanatory prose or
//! markdown code fences. Parsing is therefore a two-stage
//! **unwrap-then-validate** pair:
//!
//! 1. [`unwrap_fenced`] — extract the machine-parseable substring, with a
//!    fixed fallback precedence: labeled ```` ```json ```` fence → first
//!    fence of any kind → the trimmed raw text.
//! 2. [`try_parse`] — deserialise the four-field record and validate it:
//!    status is case-normalised to lowercase, confidence must be an integer
//!    in 0–100. Out-of-range or non-integer confidence is rejected rather
//!    than trusted.
//!
//! [`parse_verdict`] composes both stages and **never fails**: any
//! structural problem degrades to a fail-status verdict with confidence 0
//! instead of propagating.

use crate::output::{RuleStatus, Verdict};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Why a judgment response could not be turned into a genuine verdict.
#[derive(Debug, Error)]
pub enum VerdictParseError {
    /// The unwrapped text is not valid JSON or lacks a required field.
    #[error("response is not a valid judgment record: {0}")]
    Json(#[from] serde_json::Error),

    /// `status` was present but neither "pass" nor "fail" (any case).
    #[error("unrecognised status '{0}' (expected \"pass\" or \"fail\")")]
    BadStatus(String),

    /// `confidence` was not an integer in 0–100.
    #[error("confidence {0} is not an integer in 0-100")]
    BadConfidence(serde_json::Number),
}

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());
static RE_ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]*\n)?\s*(.*?)\s*```").unwrap());

/// Extract the structured payload from a possibly fence-wrapped response.
///
/// Precedence: a ```` ```json ````-labeled fence wins; otherwise the first
/// fence of any kind; otherwise the trimmed text as-is.
pub fn unwrap_fenced(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(caps) = RE_JSON_FENCE.captures(trimmed) {
        return caps[1].to_string();
    }
    if let Some(caps) = RE_ANY_FENCE.captures(trimmed) {
        return caps[1].to_string();
    }
    trimmed.to_string()
}

/// The judgment record as it appears on the wire, before validation.
#[derive(serde::Deserialize)]
struct RawVerdict {
    status: String,
    evidence: String,
    reasoning: String,
    confidence: serde_json::Number,
}

/// Validate an unwrapped judgment payload into a [`Verdict`].
///
/// Fails (rather than degrading) so the caller can attach its own
/// diagnostic context; use [`parse_verdict`] for the never-fails contract.
pub fn try_parse(raw_response: &str, rule: &str) -> Result<Verdict, VerdictParseError> {
    let payload = unwrap_fenced(raw_response);
    let record: RawVerdict = serde_json::from_str(&payload)?;

    let status = match record.status.to_lowercase().as_str() {
        "pass" => RuleStatus::Pass,
        "fail" => RuleStatus::Fail,
        other => return Err(VerdictParseError::BadStatus(other.to_string())),
    };

    let confidence = match record.confidence.as_u64() {
        Some(n) if n <= 100 => n as u8,
        _ => return Err(VerdictParseError::BadConfidence(record.confidence)),
    };

    Ok(Verdict {
        rule: rule.to_string(),
        status,
        evidence: record.evidence,
        reasoning: record.reasoning,
        confidence,
    })
}

/// Parse a raw judgment response, degrading on any structural failure.
///
/// Never fails: unparseable input yields the fail/confidence-0 fallback
/// verdict with the parse failure described in its reasoning.
pub fn parse_verdict(raw_response: &str, rule: &str) -> Verdict {
    try_parse(raw_response, rule).unwrap_or_else(|e| {
        Verdict::degraded(rule, format!("malformed judgment response: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str =
        r#"{"status":"PASS","evidence":"e","reasoning":"r","confidence":90}"#;

    #[test]
    fn labeled_fence_is_unwrapped() {
        let raw = format!("```json\n{RECORD}\n```");
        assert_eq!(unwrap_fenced(&raw), RECORD);
    }

    #[test]
    fn unlabeled_fence_is_unwrapped() {
        let raw = format!("```\n{RECORD}\n```");
        assert_eq!(unwrap_fenced(&raw), RECORD);
    }

    #[test]
    fn labeled_fence_beats_earlier_plain_fence() {
        let raw = format!("```\nnot the payload\n```\nSee below:\n```json\n{RECORD}\n```");
        assert_eq!(unwrap_fenced(&raw), RECORD);
    }

    #[test]
    fn unfenced_text_passes_through_trimmed() {
        assert_eq!(unwrap_fenced(&format!("  {RECORD}\n")), RECORD);
    }

    #[test]
    fn fence_with_surrounding_prose() {
        let raw = format!("Here is my analysis:\n```json\n{RECORD}\n```\nHope that helps!");
        assert_eq!(unwrap_fenced(&raw), RECORD);
    }

    #[test]
    fn status_is_case_normalised() {
        let v = try_parse(RECORD, "my rule").unwrap();
        assert_eq!(v.status, RuleStatus::Pass);
        assert_eq!(v.rule, "my rule");
        assert_eq!(v.evidence, "e");
        assert_eq!(v.reasoning, "r");
        assert_eq!(v.confidence, 90);
    }

    #[test]
    fn fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{RECORD}\n```");
        assert_eq!(try_parse(&fenced, "r").unwrap(), try_parse(RECORD, "r").unwrap());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = r#"{"status":"maybe","evidence":"e","reasoning":"r","confidence":50}"#;
        assert!(matches!(
            try_parse(raw, "r"),
            Err(VerdictParseError::BadStatus(_))
        ));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let raw = r#"{"status":"pass","evidence":"e","reasoning":"r","confidence":101}"#;
        assert!(matches!(
            try_parse(raw, "r"),
            Err(VerdictParseError::BadConfidence(_))
        ));
    }

    #[test]
    fn fractional_confidence_is_rejected() {
        let raw = r#"{"status":"pass","evidence":"e","reasoning":"r","confidence":90.5}"#;
        assert!(matches!(
            try_parse(raw, "r"),
            Err(VerdictParseError::BadConfidence(_))
        ));
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = r#"{"status":"pass","confidence":90}"#;
        assert!(matches!(try_parse(raw, "r"), Err(VerdictParseError::Json(_))));
    }

    #[test]
    fn prose_degrades_instead_of_failing() {
        let v = parse_verdict("The document looks fine to me overall.", "dated within 2024");
        assert_eq!(v.status, RuleStatus::Fail);
        assert_eq!(v.confidence, 0);
        assert_eq!(v.rule, "dated within 2024");
        assert!(v.reasoning.contains("malformed judgment response"));
    }

    #[test]
    fn parse_verdict_round_trips_well_formed_input() {
        let fenced = format!("```json\n{RECORD}\n```");
        let v = parse_verdict(&fenced, "r");
        assert_eq!(v.status, RuleStatus::Pass);
        assert_eq!(v.confidence, 90);
    }
}
