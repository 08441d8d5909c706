//! JSON payloads of the HTTP boundary, shared by the server and [`HttpTaskStore`](crate::storage::HttpTaskStore).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::task::TaskId;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTasksRequest {
    #[serde(default)]
    pub tasks_raw: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_id: TaskId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkingModeRequest {
    #[serde(default)]
    pub enabled: Value,
}

impl WorkingModeRequest {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Value::Bool(enabled),
        }
    }

    /// Any truthy value turns working mode on, the way a JavaScript caller means it.
    pub fn is_enabled(&self) -> bool {
        match &self.enabled {
            Value::Null => false,
            Value::Bool(enabled) => *enabled,
            Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingModeResponse {
    pub working_mode_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
