mod fallback;
mod file;
mod http;
mod in_memory;
mod state;

pub use fallback::FallbackTaskStore;
pub use file::FileTaskStore;
pub use http::HttpTaskStore;
pub use in_memory::InMemoryTaskStore;
pub use state::{TaskOverview, TaskState};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{reminder::ReminderDecision, task::TaskId};

/// Everything the reminder UI and the poller can ask of the task state.
///
/// Implementations guarantee that the daily reset happens before any read or
/// write of the completed tasks, atomically with that read or write.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn overview(&self) -> anyhow::Result<TaskOverview>;
    async fn set_tasks(&self, tasks_raw: String) -> anyhow::Result<()>;
    async fn complete_task(&self, id: TaskId) -> anyhow::Result<()>;
    async fn set_working_mode(&self, enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>>;
    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision>;
}
