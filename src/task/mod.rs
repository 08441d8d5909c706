mod parser;

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

pub use parser::parse_tasks;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `HH:MM` string a timed task is due at.
///
/// The hour is always zero-padded, the minute is kept exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTime(String);

impl TaskTime {
    pub(crate) fn from_parts(hours: &str, minutes: &str) -> Self {
        Self(format!("{hours:0>2}:{minutes}"))
    }

    /// Zero-padded `HH:MM` of a wall-clock reading.
    pub fn from_wall_clock(time: NaiveTime) -> Self {
        Self(format!("{:02}:{:02}", time.hour(), time.minute()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task {
    Timed {
        id: TaskId,
        time: TaskTime,
        description: String,
    },
    General {
        id: TaskId,
        description: String,
    },
}

impl Task {
    pub fn id(&self) -> &TaskId {
        match self {
            Task::Timed { id, .. } | Task::General { id, .. } => id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Task::Timed { description, .. } | Task::General { description, .. } => description,
        }
    }
}
