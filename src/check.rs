//! Top-level check entry points: the pipeline orchestrator.
//!
//! ## Run shape
//!
//! A run is all-or-nothing at the extraction boundary and per-rule tolerant
//! after it: input validation and extraction failures abort the whole run
//! before any rule is evaluated, while a failure inside one rule's
//! evaluation degrades that rule's verdict and the run continues. The
//! returned result set is therefore always either fully populated (one
//! verdict per filtered rule, in input order) or entirely absent.
//!
//! ## No concurrency, no cancellation
//!
//! Rules are evaluated strictly sequentially in input order. Result order
//! must match rule order, and sequential execution keeps failure
//! attribution unambiguous; throughput is explicitly not a goal. Once a run
//! begins it proceeds to completion or to a terminal error — there is no
//! mechanism to abort an in-flight evaluation. Concurrent runs share no
//! state but are not synchronised here; serialise them in the caller.

use crate::config::CheckConfig;
use crate::document::Document;
use crate::error::RuleCheckError;
use crate::output::{CheckOutput, CheckStats, RuleResult};
use crate::pipeline::extract::{PdfiumExtractor, TextExtractor};
use crate::pipeline::input;
use crate::pipeline::judge::{self, JudgmentService, LlmJudge};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Check a document against a set of natural-language rules.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `document` — the PDF to check, or `None` (which fails immediately)
/// * `rules`    — natural-language rules; empty/whitespace entries are
///   filtered out, order is preserved
/// * `config`   — check configuration
///
/// # Returns
/// `Ok(CheckOutput)` with one verdict per filtered rule, even if some rules
/// degraded (check `output.stats.rules_degraded`).
///
/// # Errors
/// Returns `Err(RuleCheckError)` only for run-level failures:
/// - no document / wrong media type / no non-empty rules
/// - extraction capability not ready within the bounded wait
/// - PDF parse failure or less than `min_text_chars` of extracted text
/// - no judgment provider configured
pub async fn check(
    document: Option<&Document>,
    rules: &[String],
    config: &CheckConfig,
) -> Result<CheckOutput, RuleCheckError> {
    let total_start = Instant::now();

    // ── Step 1: Validate input (no I/O) ──────────────────────────────────
    let document = document.ok_or(RuleCheckError::NoDocument)?;
    if !document.is_pdf() {
        return Err(RuleCheckError::UnsupportedMediaType {
            media_type: document.media_type.clone(),
        });
    }

    let filtered: Vec<&str> = rules
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    if filtered.is_empty() {
        return Err(RuleCheckError::NoRules);
    }
    info!(
        "Checking {} rules against document ({} bytes)",
        filtered.len(),
        document.bytes.len()
    );

    // ── Step 2: Wait for the extraction capability ───────────────────────
    let ready = config
        .readiness
        .await_ready(
            Duration::from_millis(config.readiness_timeout_ms),
            Duration::from_millis(config.readiness_poll_ms),
        )
        .await;
    if !ready {
        return Err(RuleCheckError::CapabilityUnavailable {
            waited_ms: config.readiness_timeout_ms,
        });
    }

    // ── Step 3: Extract text once ────────────────────────────────────────
    let extract_start = Instant::now();
    let extractor = resolve_extractor(config);
    let extracted = extractor.extract(document).await?;
    let blob = extracted.to_delimited();
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let text_chars = blob.trim().chars().count();
    if text_chars < config.min_text_chars {
        return Err(RuleCheckError::InsufficientText {
            chars: text_chars,
            min: config.min_text_chars,
        });
    }
    info!(
        "Extracted {} chars from {} pages in {}ms",
        text_chars,
        extracted.page_count(),
        extract_duration_ms
    );

    // ── Step 4: Resolve the judgment service ─────────────────────────────
    let judge_service = resolve_judge(config)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_check_start(filtered.len());
    }

    // ── Step 5: Evaluate rules sequentially, in input order ──────────────
    let judge_start = Instant::now();
    let total_rules = filtered.len();
    let mut results: Vec<RuleResult> = Vec::with_capacity(total_rules);

    for (index, rule) in filtered.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_rule_start(index, total_rules, rule);
        }

        debug!("Evaluating rule {}/{}: {}", index + 1, total_rules, rule);
        let result = judge::evaluate(&judge_service, rule, &blob, config).await;

        if let Some(ref cb) = config.progress_callback {
            cb.on_rule_complete(index, total_rules, &result.verdict);
        }
        results.push(result);
    }
    let judge_duration_ms = judge_start.elapsed().as_millis() as u64;

    // ── Step 6: Compute stats ────────────────────────────────────────────
    let passed = results
        .iter()
        .filter(|r| r.verdict.status == crate::output::RuleStatus::Pass)
        .count();
    let degraded = results.iter().filter(|r| r.degraded).count();

    let stats = CheckStats {
        rules_total: total_rules,
        rules_passed: passed,
        rules_failed: total_rules - passed,
        rules_degraded: degraded,
        pages: extracted.page_count(),
        text_chars,
        total_input_tokens: results.iter().map(|r| r.input_tokens as u64).sum(),
        total_output_tokens: results.iter().map(|r| r.output_tokens as u64).sum(),
        extract_duration_ms,
        judge_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Check complete: {}/{} rules passed ({} degraded), {}ms total",
        passed, total_rules, degraded, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_check_complete(total_rules, passed);
    }

    Ok(CheckOutput { results, stats })
}

/// Check a local PDF file or URL against rules.
///
/// Resolves the input (reading or downloading the bytes, validating the
/// `%PDF` magic) and delegates to [`check`].
pub async fn check_file(
    input_str: impl AsRef<str>,
    rules: &[String],
    config: &CheckConfig,
) -> Result<CheckOutput, RuleCheckError> {
    let document = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    check(Some(&document), rules, config).await
}

/// Check raw PDF bytes against rules.
pub async fn check_bytes(
    bytes: &[u8],
    rules: &[String],
    config: &CheckConfig,
) -> Result<CheckOutput, RuleCheckError> {
    let document = Document::pdf(bytes.to_vec());
    check(Some(&document), rules, config).await
}

/// Synchronous wrapper around [`check`].
///
/// Creates a temporary tokio runtime internally.
pub fn check_sync(
    document: Option<&Document>,
    rules: &[String],
    config: &CheckConfig,
) -> Result<CheckOutput, RuleCheckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RuleCheckError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(check(document, rules, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn resolve_extractor(config: &CheckConfig) -> Arc<dyn TextExtractor> {
    match config.extractor {
        Some(ref e) => Arc::clone(e),
        None => Arc::new(PdfiumExtractor),
    }
}

/// Instantiate a named provider with the given model.
fn create_judge_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, RuleCheckError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        RuleCheckError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the judgment service, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much or as little as they need:
///
/// 1. **Pre-built judge** (`config.judge`) — the caller constructed the
///    whole service; used as-is. This is also the hook tests use for
///    deterministic stubs.
///
/// 2. **Pre-built provider** (`config.provider`) — wrapped in [`LlmJudge`]
///    with the configured temperature.
///
/// 3. **Named provider + model** (`config.provider_name`) — the factory
///    reads the corresponding API key (`OPENAI_API_KEY`, etc.) from the
///    environment.
///
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    checked before full auto-detection so an explicit model choice is
///    honoured even when multiple API keys are present.
///
/// 5. **Full auto-detection** (`ProviderFactory::from_env`) — scans known
///    API key variables and picks the first available provider, preferring
///    OpenAI when its key is present.
fn resolve_judge(config: &CheckConfig) -> Result<Arc<dyn JudgmentService>, RuleCheckError> {
    // 1) User-provided judge takes priority
    if let Some(ref judge) = config.judge {
        return Ok(Arc::clone(judge));
    }

    // 2) User-provided provider
    if let Some(ref provider) = config.provider {
        return Ok(Arc::new(LlmJudge::new(
            Arc::clone(provider),
            config.temperature,
        )));
    }

    // 3) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        let provider = create_judge_provider(name, model)?;
        return Ok(Arc::new(LlmJudge::new(provider, config.temperature)));
    }

    // 4) Environment pair
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            let provider = create_judge_provider(&prov, &model)?;
            return Ok(Arc::new(LlmJudge::new(provider, config.temperature)));
        }
    }

    // Prefer OpenAI explicitly when an OpenAI API key is present, so users
    // with multiple provider keys get a predictable default.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            let provider = create_judge_provider("openai", model)?;
            return Ok(Arc::new(LlmJudge::new(provider, config.temperature)));
        }
    }

    // 5) Full auto-detection
    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| RuleCheckError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(Arc::new(LlmJudge::new(provider, config.temperature)))
}
