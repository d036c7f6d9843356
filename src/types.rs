//! Core types for the task board.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// A persisted task, as returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for create and update.
///
/// Every field is optional at the wire level; [`TaskPayload::validate`]
/// decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub completed: bool,
}

impl TaskPayload {
    /// Check the payload and normalize it into storable input.
    pub fn validate(self) -> ApiResult<TaskInput> {
        TaskInput::new(
            self.title.as_deref().unwrap_or_default(),
            self.description,
            self.completed,
        )
    }
}

/// Validated task fields ready to be written.
///
/// The title is trimmed and guaranteed non-empty; a missing description
/// is stored as the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    title: String,
    description: String,
    completed: bool,
}

impl TaskInput {
    pub fn new(title: &str, description: Option<String>, completed: bool) -> ApiResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::missing_field("title"));
        }
        Ok(Self {
            title: title.to_string(),
            description: description.unwrap_or_default(),
            completed,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

/// Coerce any JSON value into a flag using loose truthiness.
///
/// `false`, `0`, `""` and `null` are false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}
