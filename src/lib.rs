//! # pdf-rulecheck
//!
//! Check whether a PDF document satisfies a set of natural-language rules,
//! using an LLM as the judge.
//!
//! ## Why this crate?
//!
//! Compliance questions about documents ("is it signed?", "is it dated
//! within 2024?") rarely reduce to regexes. This crate extracts the
//! document's text with pdfium and asks an LLM to judge each rule, parsing
//! the structured verdict it returns — tolerantly, because models wrap JSON
//! in prose and fences despite being told not to.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Extract  per-page text via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Judge    one LLM call per rule, strictly in input order
//!  ├─ 4. Parse    unwrap fences, validate the four-field verdict record
//!  └─ 5. Output   ordered verdicts + run stats
//! ```
//!
//! One rule's failure never aborts the run: network errors and malformed
//! responses degrade to a fail-status verdict with confidence 0, so the
//! result set always has exactly one verdict per non-empty rule.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_rulecheck::{check_file, CheckConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = CheckConfig::default();
//!     let rules = vec![
//!         "contains a signature".to_string(),
//!         "dated within 2024".to_string(),
//!     ];
//!     let output = check_file("contract.pdf", &rules, &config).await?;
//!     for verdict in output.verdicts() {
//!         println!("[{}] {} ({}%)", verdict.status, verdict.rule, verdict.confidence);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfcheck` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf-rulecheck = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod check;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod readiness;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use check::{check, check_bytes, check_file, check_sync};
pub use config::{CheckConfig, CheckConfigBuilder};
pub use document::{Document, ExtractedText, PageText, PDF_MEDIA_TYPE};
pub use error::RuleCheckError;
pub use output::{CheckOutput, CheckStats, RuleResult, RuleStatus, Verdict};
pub use pipeline::extract::{PdfiumExtractor, TextExtractor};
pub use pipeline::judge::{JudgmentError, JudgmentResponse, JudgmentService, LlmJudge};
pub use pipeline::parse::{parse_verdict, unwrap_fenced};
pub use progress::{CheckProgressCallback, NoopProgressCallback, ProgressCallback};
pub use readiness::ReadinessGate;
