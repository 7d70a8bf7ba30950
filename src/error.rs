//! Error types for the pdf-rulecheck library.
//!
//! Two distinct failure modes deserve two distinct representations:
//!
//! * [`RuleCheckError`] — **Fatal to the run**: the check cannot proceed at
//!   all (no document, unreadable PDF, text extraction unavailable, provider
//!   not configured). Returned as `Err(RuleCheckError)` from the top-level
//!   `check*` functions before any verdict is produced.
//!
//! * **Degraded verdicts** — a single rule's evaluation could not be
//!   completed faithfully (network error, malformed judgment response).
//!   These never surface as `Err`: the evaluator converts them into a
//!   fail-status [`crate::output::Verdict`] with confidence 0 so one bad
//!   rule never aborts the remaining rules.
//!
//! The separation guarantees the result set is all-or-nothing: either every
//! filtered rule has a verdict (possibly degraded), or the run failed before
//! any rule was evaluated.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-rulecheck library.
///
/// Per-rule failures are represented as degraded verdicts inside
/// [`crate::output::CheckOutput`] rather than propagated here.
#[derive(Debug, Error)]
pub enum RuleCheckError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No document was supplied to the check.
    #[error("No document supplied.\nProvide a PDF before running the check.")]
    NoDocument,

    /// The document declares a media type other than `application/pdf`.
    #[error("Unsupported media type '{media_type}': only application/pdf documents are accepted")]
    UnsupportedMediaType { media_type: String },

    /// Every supplied rule was empty or whitespace-only.
    #[error("No rules to check.\nEnter at least one non-empty rule.")]
    NoRules,

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Capability errors ─────────────────────────────────────────────────
    /// The text-extraction capability did not become ready within the
    /// bounded wait. Recoverable: retry the run once the dependency loads.
    #[error("Text extraction is not ready (waited {waited_ms}ms).\nRetry once the PDF engine has finished loading.")]
    CapabilityUnavailable { waited_ms: u64 },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document could not be parsed as a PDF.
    #[error("Failed to parse PDF: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    ExtractionFailed { detail: String },

    /// Text decoding failed for a specific page.
    #[error("Text extraction failed for page {page}: {detail}")]
    PageTextFailed { page: usize, detail: String },

    /// Extraction succeeded but produced too little text to judge.
    #[error("Could not extract enough text from the PDF ({chars} chars, minimum {min}).\nScanned/image-only documents are not supported — try a different file.")]
    InsufficientText { chars: usize, min: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured judgment provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
