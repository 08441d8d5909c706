use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{reminder::ReminderDecision, task::TaskId};

use super::{TaskOverview, TaskStore};

/// Serves every call from `primary`, and from `secondary` when `primary` fails.
///
/// Saved task text is also copied into `secondary` so the fallback has
/// something to show the next time `primary` is down.
pub struct FallbackTaskStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: TaskStore, S: TaskStore> FallbackTaskStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

fn log_fallback(operation: &str, error: &anyhow::Error) {
    log::warn!("Primary task store failed, using fallback. [operation = {operation}, error = {error:#}]");
}

#[async_trait]
impl<P: TaskStore, S: TaskStore> TaskStore for FallbackTaskStore<P, S> {
    async fn overview(&self) -> anyhow::Result<TaskOverview> {
        match self.primary.overview().await {
            Ok(overview) => Ok(overview),
            Err(error) => {
                log_fallback("overview", &error);
                self.secondary.overview().await
            }
        }
    }

    async fn set_tasks(&self, tasks_raw: String) -> anyhow::Result<()> {
        match self.primary.set_tasks(tasks_raw.clone()).await {
            Ok(()) => {
                if let Err(error) = self.secondary.set_tasks(tasks_raw).await {
                    log::warn!("Could not keep a backup of the task list. [error = {error:#}]");
                }
                Ok(())
            }
            Err(error) => {
                log_fallback("set_tasks", &error);
                self.secondary.set_tasks(tasks_raw).await
            }
        }
    }

    async fn complete_task(&self, id: TaskId) -> anyhow::Result<()> {
        match self.primary.complete_task(id.clone()).await {
            Ok(()) => Ok(()),
            Err(error) => {
                log_fallback("complete_task", &error);
                self.secondary.complete_task(id).await
            }
        }
    }

    async fn set_working_mode(&self, enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
        match self.primary.set_working_mode(enabled).await {
            Ok(until) => Ok(until),
            Err(error) => {
                log_fallback("set_working_mode", &error);
                self.secondary.set_working_mode(enabled).await
            }
        }
    }

    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision> {
        match self.primary.check_reminder().await {
            Ok(decision) => Ok(decision),
            Err(error) => {
                log_fallback("check_reminder", &error);
                self.secondary.check_reminder().await
            }
        }
    }
}
