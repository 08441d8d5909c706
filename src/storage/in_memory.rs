use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{clock::Clock, reminder::ReminderDecision, task::TaskId};

use super::{TaskOverview, TaskState, TaskStore};

/// Process-lifetime task state, as kept by the server.
pub struct InMemoryTaskStore {
    state: Mutex<TaskState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTaskStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let today = clock.now().date_naive();
        Self {
            state: Mutex::new(TaskState::new(today)),
            clock,
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn overview(&self) -> anyhow::Result<TaskOverview> {
        let mut state = self.state.lock().await;
        Ok(state.overview(self.clock.now()))
    }

    async fn set_tasks(&self, tasks_raw: String) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.set_tasks(tasks_raw);
        Ok(())
    }

    async fn complete_task(&self, id: TaskId) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.complete_task(id, self.clock.now());
        Ok(())
    }

    async fn set_working_mode(&self, enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
        let mut state = self.state.lock().await;
        Ok(state.set_working_mode(enabled, self.clock.now()))
    }

    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision> {
        let mut state = self.state.lock().await;
        Ok(state.check_reminder(self.clock.now()))
    }
}
