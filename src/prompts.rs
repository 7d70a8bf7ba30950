//! Prompt construction for LLM-based rule judgment.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the judgment instructions (e.g.
//!    tightening the evidence requirement) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the built prompt directly
//!    without spinning up a real LLM, making prompt regressions easy to catch.
//!
//! The prompt mandates a pure-JSON response, but providers routinely wrap
//! JSON in prose or markdown fences anyway; tolerant unwrapping lives in
//! [`crate::pipeline::parse`], not here.

/// Build the judgment prompt for one rule against the (already truncated)
/// document text.
///
/// The prompt states the rule verbatim, embeds the text, and mandates a
/// structured response with exactly four fields and no extraneous output.
pub fn rule_check_prompt(rule: &str, document_text: &str) -> String {
    format!(
        r#"You are a document analyzer. Analyze the following document and check if it satisfies this rule: "{rule}"

Document content:
{document_text}

Your task:
1. Determine if the document PASSES or FAILS this rule
2. Provide ONE specific sentence from the document as evidence (if pass) or explain what's missing (if fail)
3. Provide brief reasoning
4. Provide a confidence score (0-100)

Respond ONLY with valid JSON in this exact format:
{{
  "status": "pass" or "fail",
  "evidence": "specific sentence from document or explanation of what's missing",
  "reasoning": "brief explanation of why it passes or fails",
  "confidence": number between 0-100
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_states_rule_verbatim() {
        let prompt = rule_check_prompt("must contain a signature", "some text");
        assert!(prompt.contains("\"must contain a signature\""));
    }

    #[test]
    fn prompt_embeds_document_text() {
        let prompt = rule_check_prompt("r", "--- Page 1 ---\nhello world");
        assert!(prompt.contains("--- Page 1 ---\nhello world"));
    }

    #[test]
    fn prompt_mandates_the_four_fields() {
        let prompt = rule_check_prompt("r", "t");
        for field in ["\"status\"", "\"evidence\"", "\"reasoning\"", "\"confidence\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
        assert!(prompt.contains("ONLY with valid JSON"));
    }
}
