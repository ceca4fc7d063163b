use crate::assist::parse::strip_code_fence;
use crate::assist::prompts;
use crate::cache::SuggestionCache;
use crate::error::{AppError, Result};
use crate::provider::Provider;

/// Normalize a suggested tag: lowercase, internal whitespace runs replaced
/// by a single hyphen.
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Suggest tags for a task, memoized per request text.
///
/// The response must be a JSON array of strings; anything else is a
/// malformed-response error. Tags that normalize to the empty string are
/// dropped.
pub async fn suggest_tags(
    provider: &dyn Provider,
    cache: &SuggestionCache,
    temperature: f32,
    title: &str,
    description: &str,
) -> Result<Vec<String>> {
    let key = format!("{}\n{}", title, description);
    if let Some(tags) = cache.get(&key) {
        return Ok(tags);
    }

    let request = prompts::tags_request(title, description, temperature);
    let response = provider.generate_content(&request).await?;

    let text = response.text();
    let stripped = strip_code_fence(&text);

    let raw: Vec<String> = serde_json::from_str(stripped).map_err(|e| {
        AppError::MalformedResponse(format!("tag suggestions are not a string array: {}", e))
    })?;

    let tags: Vec<String> = raw
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .collect();

    cache.insert(key, tags.clone());
    Ok(tags)
}
