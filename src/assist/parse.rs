use chrono::NaiveDate;

use crate::assist::prompts;
use crate::error::{AppError, Result};
use crate::models::assist::ParsedTaskFields;
use crate::provider::Provider;

/// Strip surrounding code-fence markup from model output.
///
/// Accepts an optional language tag after the opening fence and tolerates
/// a missing closing fence (truncated responses). Unfenced text passes
/// through trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

/// Parse free-text task input into structured fields.
///
/// `today` anchors relative dates ("tomorrow", "next friday") in the
/// prompt. The response must be a single JSON object; field-level oddities
/// (unknown priority, malformed tags, bad date) coerce leniently via
/// [`ParsedTaskFields`], but a response that is not a JSON object at all is
/// a malformed-response error.
pub async fn parse_task_input(
    provider: &dyn Provider,
    temperature: f32,
    input: &str,
    today: NaiveDate,
) -> Result<ParsedTaskFields> {
    let request = prompts::parse_request(input, today, temperature);
    let response = provider.generate_content(&request).await?;

    let text = response.text();
    let stripped = strip_code_fence(&text);

    let value: serde_json::Value = serde_json::from_str(stripped)
        .map_err(|e| AppError::MalformedResponse(format!("parse result is not JSON: {}", e)))?;
    if !value.is_object() {
        return Err(AppError::MalformedResponse(
            "parse result is not a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::MalformedResponse(format!("parse result fields: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fenced_json() {
        let fenced = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(strip_code_fence(fenced), "{\"title\": \"x\"}");
    }

    #[test]
    fn test_strip_fence_without_language() {
        let fenced = "```\n[1, 2]\n```";
        assert_eq!(strip_code_fence(fenced), "[1, 2]");
    }

    #[test]
    fn test_strip_unterminated_fence() {
        let fenced = "```json\n{\"title\": \"cut off\"}";
        assert_eq!(strip_code_fence(fenced), "{\"title\": \"cut off\"}");
    }
}
