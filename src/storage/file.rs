use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::Mutex;

use crate::{clock::Clock, reminder::ReminderDecision, task::TaskId};

use super::{TaskOverview, TaskState, TaskStore};

/// Task state kept in a JSON file on the client, used when the server can't be reached.
pub struct FileTaskStore {
    path: PathBuf,
    state: Mutex<TaskState>,
    clock: Arc<dyn Clock>,
}

impl FileTaskStore {
    /// Loads the state from `path`. A missing, unreadable or corrupt file is
    /// an empty state for today.
    pub async fn open(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        let path = path.into();
        let state = match Self::load(&path).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                log::info!(
                    "No task state file yet, starting empty. [path = {}]",
                    path.display()
                );
                TaskState::new(clock.now().date_naive())
            }
            Err(error) => {
                log::warn!(
                    "Could not load task state, starting empty. [path = {}, error = {error:#}]",
                    path.display()
                );
                TaskState::new(clock.now().date_naive())
            }
        };

        Self {
            path,
            state: Mutex::new(state),
            clock,
        }
    }

    async fn load(path: &Path) -> anyhow::Result<Option<TaskState>> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Could not read task state from {}", path.display()));
            }
        };

        let state = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse task state in {}", path.display()))?;
        Ok(Some(state))
    }

    /// Applies `operation` to a copy of the state. The copy replaces the
    /// current state only once it is on disk.
    async fn update<T>(
        &self,
        operation: impl FnOnce(&mut TaskState, DateTime<FixedOffset>) -> T,
    ) -> anyhow::Result<T> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let result = operation(&mut next, self.clock.now());

        if next != *state {
            self.persist(&next).await?;
            *state = next;
        }

        Ok(result)
    }

    async fn persist(&self, state: &TaskState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Could not write task state to {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Could not replace task state in {}", self.path.display()))
    }
}

#[async_trait]
impl TaskStore for FileTaskStore {
    async fn overview(&self) -> anyhow::Result<TaskOverview> {
        self.update(|state, now| state.overview(now)).await
    }

    async fn set_tasks(&self, tasks_raw: String) -> anyhow::Result<()> {
        self.update(|state, _| state.set_tasks(tasks_raw)).await
    }

    async fn complete_task(&self, id: TaskId) -> anyhow::Result<()> {
        self.update(|state, now| state.complete_task(id, now)).await
    }

    async fn set_working_mode(&self, enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
        self.update(|state, now| state.set_working_mode(enabled, now))
            .await
    }

    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision> {
        self.update(|state, now| state.check_reminder(now)).await
    }
}
