use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};

use crate::{
    clock::Clock,
    reminder::ReminderDecision,
    storage::{TaskOverview, TaskStore},
    task::TaskId,
};

pub fn local_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    offset
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<DateTime<FixedOffset>>);

impl ManualClock {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.0.lock().unwrap() = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.0.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.0.lock().unwrap()
    }
}

/// Clock that follows tokio's (possibly paused) time, starting from `origin`.
pub struct PausedClock {
    origin: DateTime<FixedOffset>,
    started: tokio::time::Instant,
}

impl PausedClock {
    pub fn starting_at(origin: DateTime<FixedOffset>) -> Self {
        Self {
            origin,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for PausedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap();
        self.origin + elapsed
    }
}

/// Store whose every call fails, standing in for an unreachable server.
pub struct UnreachableTaskStore;

#[async_trait]
impl TaskStore for UnreachableTaskStore {
    async fn overview(&self) -> anyhow::Result<TaskOverview> {
        anyhow::bail!("Connection refused")
    }

    async fn set_tasks(&self, _tasks_raw: String) -> anyhow::Result<()> {
        anyhow::bail!("Connection refused")
    }

    async fn complete_task(&self, _id: TaskId) -> anyhow::Result<()> {
        anyhow::bail!("Connection refused")
    }

    async fn set_working_mode(&self, _enabled: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
        anyhow::bail!("Connection refused")
    }

    async fn check_reminder(&self) -> anyhow::Result<ReminderDecision> {
        anyhow::bail!("Connection refused")
    }
}
