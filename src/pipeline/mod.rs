//! Pipeline stages for document rule-checking.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ judge ──▶ parse
//! (path/URL) (pdfium)   (LLM)    (fence unwrap + JSON)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a `Document`
//! 2. [`extract`] — per-page text extraction; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`judge`]   — drive the LLM judgment call per rule; the only stage with
//!    network I/O, and the isolation boundary for per-rule failures
//! 4. [`parse`]   — tolerant unwrap-then-validate parsing of the judgment
//!    response into a verdict

pub mod extract;
pub mod input;
pub mod judge;
pub mod parse;
