use chrono::NaiveDate;

use crate::models::gemini::{
    GeminiRequest, GeminiSystemInstruction, GeminiTool, GenerationConfig,
};

const PARSE_SYSTEM: &str = "You convert free-text task notes into structured data. \
Respond with a single JSON object and nothing else. Optional fields: \
\"title\" (string), \"description\" (string), \"dueDate\" (string, YYYY-MM-DD), \
\"priority\" (one of \"low\", \"medium\", \"high\", or null), \
\"tags\" (array of short strings). Resolve relative dates against today's date. \
Omit fields you cannot infer.";

const ENHANCE_SYSTEM: &str = "You improve task titles and descriptions. \
Respond with the improved title on the first line, then the improved \
description on the following lines. No markdown, no preamble.";

const TAGS_SYSTEM: &str = "You suggest tags for tasks. Respond with a JSON \
array of at most five short tag strings and nothing else.";

const SUBTASKS_SYSTEM: &str = "You break a task into concrete sub-tasks. \
Respond with three to seven sub-tasks, one per line, each a short actionable \
step. No numbering, no preamble.";

const CONTEXT_SYSTEM: &str = "You provide current background information that \
helps someone complete a task. Use web search to ground your answer and keep \
it brief.";

fn base_request(system: &str, user: String, temperature: f32) -> GeminiRequest {
    let mut request = GeminiRequest::user_text(user);
    request.system_instruction = Some(GeminiSystemInstruction::text(system));
    request.generation_config = Some(GenerationConfig {
        temperature: Some(temperature),
        ..Default::default()
    });
    request
}

pub fn parse_request(input: &str, today: NaiveDate, temperature: f32) -> GeminiRequest {
    let user = format!("Today is {}.\n\nTask note:\n{}", today.format("%Y-%m-%d"), input);
    base_request(PARSE_SYSTEM, user, temperature)
}

pub fn enhance_request(input: &str, temperature: f32) -> GeminiRequest {
    base_request(ENHANCE_SYSTEM, input.to_string(), temperature)
}

pub fn tags_request(title: &str, description: &str, temperature: f32) -> GeminiRequest {
    let user = format!("Title: {}\nDescription: {}", title, description);
    base_request(TAGS_SYSTEM, user, temperature)
}

pub fn subtasks_request(title: &str, description: &str, temperature: f32) -> GeminiRequest {
    let user = format!("Title: {}\nDescription: {}", title, description);
    base_request(SUBTASKS_SYSTEM, user, temperature)
}

/// Contextual info is the only grounded request
pub fn context_request(title: &str, description: &str, temperature: f32) -> GeminiRequest {
    let user = format!("Title: {}\nDescription: {}", title, description);
    let mut request = base_request(CONTEXT_SYSTEM, user, temperature);
    request.tools = Some(vec![GeminiTool::google_search()]);
    request
}
