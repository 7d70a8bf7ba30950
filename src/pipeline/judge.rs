//! Rule evaluation: build the judgment request, call the LLM, parse the verdict.
//!
//! This module is the designated **isolation boundary** of the pipeline:
//! [`evaluate`] never fails. Network errors, timeouts, and malformed
//! responses are all converted into a degraded fail-verdict so that one
//! rule's trouble never aborts the remaining rules.
//!
//! Request size is bounded before the call, not as an optimisation but
//! because upstream services enforce input limits: the document text is
//! truncated to a configurable character prefix
//! ([`crate::config::CheckConfig::max_document_chars`]), and the response
//! is capped at [`crate::config::CheckConfig::max_response_tokens`].

use crate::config::CheckConfig;
use crate::output::{RuleResult, Verdict};
use crate::pipeline::parse;
use crate::prompts;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Failure inside one judgment call.
#[derive(Debug, Error)]
pub enum JudgmentError {
    /// The provider returned an error (network, auth, rate limit, ...).
    #[error("judgment service error: {0}")]
    Api(String),

    /// The call did not complete within the configured ceiling.
    #[error("judgment call timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// A raw judgment response plus token accounting.
#[derive(Debug, Clone)]
pub struct JudgmentResponse {
    /// Free-form response text, expected (but not guaranteed) to contain
    /// the four-field JSON record.
    pub content: String,
    /// Prompt tokens consumed.
    pub input_tokens: usize,
    /// Completion tokens produced.
    pub output_tokens: usize,
}

/// The request/response seam to the external judgment service.
///
/// Production code uses [`LlmJudge`]; tests substitute a deterministic stub.
#[async_trait]
pub trait JudgmentService: Send + Sync {
    /// Send one instruction message and return the raw response text.
    ///
    /// No streaming: a single synchronous request/response round-trip with
    /// a fixed response-size ceiling.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: usize,
    ) -> Result<JudgmentResponse, JudgmentError>;
}

/// [`JudgmentService`] backed by an `edgequake_llm` provider.
pub struct LlmJudge {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
}

impl LlmJudge {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }
}

#[async_trait]
impl JudgmentService for LlmJudge {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: usize,
    ) -> Result<JudgmentResponse, JudgmentError> {
        let messages = vec![ChatMessage::user(prompt)];
        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(max_tokens),
            ..Default::default()
        };

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| JudgmentError::Api(e.to_string()))?;

        Ok(JudgmentResponse {
            content: response.content,
            input_tokens: response.prompt_tokens as usize,
            output_tokens: response.completion_tokens as usize,
        })
    }
}

/// Evaluate one rule against the extracted text.
///
/// Always returns a [`RuleResult`] — never propagates an error upward.
/// Failure at any step (request construction, network, parsing) produces
/// the degraded fail/confidence-0 verdict with the cause in its reasoning.
pub async fn evaluate(
    judge: &Arc<dyn JudgmentService>,
    rule: &str,
    text: &str,
    config: &CheckConfig,
) -> RuleResult {
    let start = Instant::now();
    let excerpt = truncate_chars(text, config.max_document_chars);
    let prompt = prompts::rule_check_prompt(rule, excerpt);

    let ceiling = Duration::from_secs(config.api_timeout_secs);
    let outcome = match timeout(ceiling, judge.complete(&prompt, config.max_response_tokens)).await
    {
        Ok(result) => result,
        Err(_) => Err(JudgmentError::Timeout {
            secs: config.api_timeout_secs,
        }),
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(response) => {
            debug!(
                "Rule '{}': {} input tokens, {} output tokens, {}ms",
                rule, response.input_tokens, response.output_tokens, duration_ms
            );
            match parse::try_parse(&response.content, rule) {
                Ok(verdict) => RuleResult {
                    verdict,
                    degraded: false,
                    input_tokens: response.input_tokens,
                    output_tokens: response.output_tokens,
                    duration_ms,
                },
                Err(e) => {
                    warn!("Rule '{}': unparseable judgment response — {}", rule, e);
                    RuleResult {
                        verdict: Verdict::degraded(
                            rule,
                            format!("malformed judgment response: {e}"),
                        ),
                        degraded: true,
                        input_tokens: response.input_tokens,
                        output_tokens: response.output_tokens,
                        duration_ms,
                    }
                }
            }
        }
        Err(e) => {
            warn!("Rule '{}': judgment call failed — {}", rule, e);
            RuleResult {
                verdict: Verdict::degraded(rule, e.to_string()),
                degraded: true,
                input_tokens: 0,
                output_tokens: 0,
                duration_ms,
            }
        }
    }
}

/// Bounded character prefix of `s`, respecting char boundaries.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RuleStatus;

    struct CannedJudge {
        response: String,
    }

    #[async_trait]
    impl JudgmentService for CannedJudge {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: usize,
        ) -> Result<JudgmentResponse, JudgmentError> {
            Ok(JudgmentResponse {
                content: self.response.clone(),
                input_tokens: 100,
                output_tokens: 30,
            })
        }
    }

    struct FailingJudge;

    #[async_trait]
    impl JudgmentService for FailingJudge {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: usize,
        ) -> Result<JudgmentResponse, JudgmentError> {
            Err(JudgmentError::Api("connection reset".into()))
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[tokio::test]
    async fn well_formed_response_yields_genuine_verdict() {
        let judge: Arc<dyn JudgmentService> = Arc::new(CannedJudge {
            response: "```json\n{\"status\":\"PASS\",\"evidence\":\"e\",\"reasoning\":\"r\",\"confidence\":90}\n```".into(),
        });
        let config = CheckConfig::default();

        let result = evaluate(&judge, "contains a signature", "document text", &config).await;
        assert!(!result.degraded);
        assert_eq!(result.verdict.status, RuleStatus::Pass);
        assert_eq!(result.verdict.confidence, 90);
        assert_eq!(result.input_tokens, 100);
    }

    #[tokio::test]
    async fn service_error_degrades() {
        let judge: Arc<dyn JudgmentService> = Arc::new(FailingJudge);
        let config = CheckConfig::default();

        let result = evaluate(&judge, "my rule", "text", &config).await;
        assert!(result.degraded);
        assert_eq!(result.verdict.status, RuleStatus::Fail);
        assert_eq!(result.verdict.confidence, 0);
        assert!(result.verdict.reasoning.contains("connection reset"));
    }

    #[tokio::test]
    async fn prose_response_degrades() {
        let judge: Arc<dyn JudgmentService> = Arc::new(CannedJudge {
            response: "I think the document is fine.".into(),
        });
        let config = CheckConfig::default();

        let result = evaluate(&judge, "my rule", "text", &config).await;
        assert!(result.degraded);
        assert_eq!(result.verdict.confidence, 0);
    }

    #[tokio::test]
    async fn evaluation_is_deterministic_for_a_deterministic_judge() {
        let judge: Arc<dyn JudgmentService> = Arc::new(CannedJudge {
            response: "{\"status\":\"fail\",\"evidence\":\"no date found\",\"reasoning\":\"r\",\"confidence\":70}".into(),
        });
        let config = CheckConfig::default();

        let first = evaluate(&judge, "dated within 2024", "same text", &config).await;
        let second = evaluate(&judge, "dated within 2024", "same text", &config).await;
        assert_eq!(first.verdict, second.verdict);
    }
}
