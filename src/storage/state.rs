use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    daily_reset::DailyLedger,
    reminder::{self, ReminderDecision},
    task::{Task, TaskId, parse_tasks},
    working_mode::WorkingModeGate,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverview {
    pub tasks: Vec<Task>,
    pub completed_general_tasks: Vec<TaskId>,
    pub working_mode_until: Option<DateTime<Utc>>,
}

/// The whole mutable record behind a task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    #[serde(default)]
    tasks_raw: String,
    #[serde(flatten)]
    ledger: DailyLedger,
    #[serde(rename = "workingModeUntil", default)]
    working_mode: WorkingModeGate,
}

impl TaskState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            tasks_raw: String::new(),
            ledger: DailyLedger::new(today),
            working_mode: WorkingModeGate::default(),
        }
    }

    fn roll_over(&mut self, now: DateTime<FixedOffset>) {
        self.ledger.apply_reset(now.date_naive());
    }

    pub fn overview(&mut self, now: DateTime<FixedOffset>) -> TaskOverview {
        self.roll_over(now);

        TaskOverview {
            tasks: parse_tasks(&self.tasks_raw),
            completed_general_tasks: self.ledger.completed().to_vec(),
            working_mode_until: self.working_mode.until(),
        }
    }

    pub fn set_tasks(&mut self, tasks_raw: String) {
        self.tasks_raw = tasks_raw;
    }

    pub fn complete_task(&mut self, id: TaskId, now: DateTime<FixedOffset>) {
        self.roll_over(now);
        if !self.ledger.complete(id.clone()) {
            log::debug!("Task already completed today. [task_id = {id}]");
        }
    }

    pub fn set_working_mode(
        &mut self,
        enabled: bool,
        now: DateTime<FixedOffset>,
    ) -> Option<DateTime<Utc>> {
        let until = self.working_mode.toggle(enabled, now.with_timezone(&Utc));
        log::info!("Working mode set. [enabled = {enabled}, until = {until:?}]");
        until
    }

    pub fn check_reminder(&mut self, now: DateTime<FixedOffset>) -> ReminderDecision {
        self.roll_over(now);
        let tasks = parse_tasks(&self.tasks_raw);
        reminder::evaluate(&tasks, &self.ledger, now, &self.working_mode)
    }
}
