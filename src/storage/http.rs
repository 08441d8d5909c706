use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    api::{
        CompleteTaskRequest, SetTasksRequest, SuccessResponse, WorkingModeRequest,
        WorkingModeResponse,
    },
    reminder::ReminderDecision,
    task::TaskId,
};

use super::{TaskOverview, TaskStore};

/// Talks to the task server over its JSON API.
pub struct HttpTaskStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn overview(&self) -> anyhow::Result<TaskOverview> {
        self.get("/api/tasks").await
    }

    async fn set_tasks(&self, tasks_raw: String) -> anyhow::Result<()> {
        let request = SetTasksRequest {
            tasks_raw: Some(tasks_raw),
        };
        let response: SuccessResponse = self.post("/api/tasks", &request).await?;
        anyhow::ensure!(response.success, "Server did not save the task list");
        Ok(())
    }

    async fn complete_task(&self, id: TaskId) -> anyhow::Result<()> {
        let request = CompleteTaskRequest { task_id: id };
        let response: SuccessResponse = self.post("/api/complete-task", &request).await?;
        anyhow::ensure!(response.success, "Server did not complete task");
        Ok(())
    }

    async fn set_working_mode(&self, enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
        let request = WorkingModeRequest::new(enabled);
        let response: WorkingModeResponse = self.post("/api/working-mode", &request).await?;
        Ok(response.working_mode_until)
    }

    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision> {
        self.get("/api/reminder-check").await
    }
}
