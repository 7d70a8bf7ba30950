//! Configuration types for document rule-checking.
//!
//! All check behaviour is controlled through [`CheckConfig`], built via its
//! [`CheckConfigBuilder`]. Callers set only the knobs they care about and
//! rely on documented defaults for the rest.

use crate::error::RuleCheckError;
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::judge::JudgmentService;
use crate::progress::ProgressCallback;
use crate::readiness::ReadinessGate;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for a document rule-check run.
///
/// Built via [`CheckConfig::builder()`] or using [`CheckConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_rulecheck::CheckConfig;
///
/// let config = CheckConfig::builder()
///     .model("gpt-4.1-nano")
///     .max_document_chars(8000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CheckConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "claude-sonnet-4-20250514".
    /// If None, uses provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, auto-detects from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed judgment service. Takes precedence over any provider
    /// setting. The hook tests use to substitute a deterministic stub.
    pub judge: Option<Arc<dyn JudgmentService>>,

    /// Text-extraction backend. Defaults to the pdfium-based extractor.
    pub extractor: Option<Arc<dyn TextExtractor>>,

    /// Readiness gate for the extraction capability. Defaults to
    /// already-ready, matching an in-process pdfium binding; hosts that load
    /// the engine lazily inject a gate they mark ready on load.
    pub readiness: ReadinessGate,

    /// Sampling temperature for judgment calls. Default: 0.0.
    ///
    /// Rule judgment wants the most deterministic answer available, so the
    /// default sits at the bottom of the range.
    pub temperature: f32,

    /// Response-size ceiling per judgment call, in tokens. Default: 1000.
    ///
    /// A verdict record is four short fields; 1000 tokens leaves generous
    /// headroom while keeping a runaway response from inflating cost.
    pub max_response_tokens: usize,

    /// Character prefix of the extracted text embedded in each request.
    /// Default: 8000.
    ///
    /// Bounding the request is a hard requirement, not an optimisation:
    /// upstream services enforce input limits, and an unbounded document
    /// would be rejected outright. Tunable because the right ceiling depends
    /// on the provider's context window.
    pub max_document_chars: usize,

    /// Minimum trimmed character count for extraction to be considered
    /// successful. Default: 50.
    ///
    /// Below this the document is effectively text-free (scanned images,
    /// empty forms) and every judgment would be noise, so the run aborts
    /// before any rule is evaluated.
    pub min_text_chars: usize,

    /// Readiness polling interval in milliseconds. Default: 100.
    pub readiness_poll_ms: u64,

    /// Readiness wait ceiling in milliseconds. Default: 5000.
    pub readiness_timeout_ms: u64,

    /// Per-judgment-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-rule progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            judge: None,
            extractor: None,
            readiness: ReadinessGate::ready(),
            temperature: 0.0,
            max_response_tokens: 1000,
            max_document_chars: 8000,
            min_text_chars: 50,
            readiness_poll_ms: 100,
            readiness_timeout_ms: 5000,
            api_timeout_secs: 60,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CheckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("judge", &self.judge.as_ref().map(|_| "<dyn JudgmentService>"))
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn TextExtractor>"))
            .field("temperature", &self.temperature)
            .field("max_response_tokens", &self.max_response_tokens)
            .field("max_document_chars", &self.max_document_chars)
            .field("min_text_chars", &self.min_text_chars)
            .field("readiness_poll_ms", &self.readiness_poll_ms)
            .field("readiness_timeout_ms", &self.readiness_timeout_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl CheckConfig {
    /// Create a new builder for `CheckConfig`.
    pub fn builder() -> CheckConfigBuilder {
        CheckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CheckConfig`].
#[derive(Debug)]
pub struct CheckConfigBuilder {
    config: CheckConfig,
}

impl CheckConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn judge(mut self, judge: Arc<dyn JudgmentService>) -> Self {
        self.config.judge = Some(judge);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn readiness(mut self, gate: ReadinessGate) -> Self {
        self.config.readiness = gate;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_response_tokens(mut self, n: usize) -> Self {
        self.config.max_response_tokens = n;
        self
    }

    pub fn max_document_chars(mut self, n: usize) -> Self {
        self.config.max_document_chars = n;
        self
    }

    pub fn min_text_chars(mut self, n: usize) -> Self {
        self.config.min_text_chars = n;
        self
    }

    pub fn readiness_poll_ms(mut self, ms: u64) -> Self {
        self.config.readiness_poll_ms = ms;
        self
    }

    pub fn readiness_timeout_ms(mut self, ms: u64) -> Self {
        self.config.readiness_timeout_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CheckConfig, RuleCheckError> {
        let c = &self.config;
        if c.max_document_chars == 0 {
            return Err(RuleCheckError::InvalidConfig(
                "max_document_chars must be ≥ 1".into(),
            ));
        }
        if c.max_response_tokens == 0 {
            return Err(RuleCheckError::InvalidConfig(
                "max_response_tokens must be ≥ 1".into(),
            ));
        }
        if c.readiness_poll_ms == 0 {
            return Err(RuleCheckError::InvalidConfig(
                "readiness_poll_ms must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(RuleCheckError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
