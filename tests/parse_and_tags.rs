mod common;

use std::sync::atomic::Ordering;

use chrono::NaiveDate;
use common::{MockProvider, oneshot_response};
use taskpilot::assist;
use taskpilot::cache::SuggestionCache;
use taskpilot::error::AppError;
use taskpilot::models::task::Priority;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

#[tokio::test]
async fn parse_accepts_fenced_json() {
    let provider = MockProvider::oneshot(oneshot_response(
        "```json\n{\"title\": \"Buy milk\", \"dueDate\": \"2026-08-08\", \"priority\": \"high\", \"tags\": [\"errand\"]}\n```",
    ));

    let fields = assist::parse_task_input(&provider, 0.2, "buy milk tomorrow", today())
        .await
        .unwrap();

    assert_eq!(fields.title.as_deref(), Some("Buy milk"));
    assert_eq!(fields.due_date, NaiveDate::from_ymd_opt(2026, 8, 8));
    assert_eq!(fields.priority, Some(Priority::High));
    assert_eq!(fields.tags, vec!["errand"]);
}

#[tokio::test]
async fn parse_coerces_bad_fields() {
    let provider = MockProvider::oneshot(oneshot_response(
        "{\"title\": \"x\", \"priority\": \"urgent\", \"tags\": \"oops\", \"dueDate\": \"soon\"}",
    ));

    let fields = assist::parse_task_input(&provider, 0.2, "x", today())
        .await
        .unwrap();

    assert_eq!(fields.priority, None);
    assert!(fields.tags.is_empty());
    assert_eq!(fields.due_date, None);
}

#[tokio::test]
async fn parse_rejects_non_json() {
    let provider = MockProvider::oneshot(oneshot_response("Sure! Here is your task."));

    let err = assist::parse_task_input(&provider, 0.2, "x", today())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn parse_rejects_non_object() {
    let provider = MockProvider::oneshot(oneshot_response("[1, 2, 3]"));

    let err = assist::parse_task_input(&provider, 0.2, "x", today())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn tags_are_normalized() {
    let provider = MockProvider::oneshot(oneshot_response(
        "```json\n[\"Home   Office\", \"URGENT errand\", \"  \"]\n```",
    ));
    let cache = SuggestionCache::new();

    let tags = assist::suggest_tags(&provider, &cache, 0.7, "Set up desk", "")
        .await
        .unwrap();

    assert_eq!(tags, vec!["home-office", "urgent-errand"]);
}

#[tokio::test]
async fn tags_are_memoized_per_request_text() {
    let provider = MockProvider::oneshot(oneshot_response("[\"errand\"]"));
    let cache = SuggestionCache::new();

    let first = assist::suggest_tags(&provider, &cache, 0.7, "Buy milk", "")
        .await
        .unwrap();
    let second = assist::suggest_tags(&provider, &cache, 0.7, "Buy milk", "")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);

    // Different text misses the cache
    assist::suggest_tags(&provider, &cache, 0.7, "Buy bread", "")
        .await
        .unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn tags_reject_non_array() {
    let provider = MockProvider::oneshot(oneshot_response("{\"tags\": [\"a\"]}"));
    let cache = SuggestionCache::new();

    let err = assist::suggest_tags(&provider, &cache, 0.7, "t", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}
