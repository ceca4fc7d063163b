use chrono::NaiveDate;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::models::task::Priority;

/// Structured fields parsed out of free-text task input by the model.
///
/// The model's JSON is not trusted field-by-field: a priority outside the
/// accepted literals, a malformed tags value, or an unparseable date all
/// coerce to the absent form instead of failing the whole parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTaskFields {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,

    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(Priority::from_literal))
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let tags = match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

/// A web citation extracted from grounding metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualSource {
    pub uri: String,
    pub title: String,
}
