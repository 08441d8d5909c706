use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    daily_reset::DailyLedger,
    task::{Task, TaskTime},
    working_mode::WorkingModeGate,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDecision {
    #[serde(rename = "shouldShowReminder")]
    pub should_show: bool,
    pub current_timed_tasks: Vec<Task>,
    pub incomplete_general_tasks: Vec<Task>,
    pub working_mode_active: bool,
    pub working_mode_until: Option<DateTime<Utc>>,
}

/// Decides whether a reminder is due at `now` (local wall clock).
///
/// Timed tasks are due only during the minute whose zero-padded `HH:MM` equals
/// their time. General tasks are due until they show up in the ledger. The
/// ledger must already be rolled over to the day of `now`.
pub fn evaluate(
    tasks: &[Task],
    ledger: &DailyLedger,
    now: DateTime<FixedOffset>,
    working_mode: &WorkingModeGate,
) -> ReminderDecision {
    let current_time = TaskTime::from_wall_clock(now.time());

    let mut current_timed_tasks = Vec::new();
    let mut incomplete_general_tasks = Vec::new();
    for task in tasks {
        match task {
            Task::Timed { time, .. } => {
                if *time == current_time {
                    current_timed_tasks.push(task.clone());
                }
            }
            Task::General { id, .. } => {
                if !ledger.is_completed(id) {
                    incomplete_general_tasks.push(task.clone());
                }
            }
        }
    }

    let working_mode_active = working_mode.is_active(now.with_timezone(&Utc));
    let should_show = !working_mode_active
        && (!current_timed_tasks.is_empty() || !incomplete_general_tasks.is_empty());

    ReminderDecision {
        should_show,
        current_timed_tasks,
        incomplete_general_tasks,
        working_mode_active,
        working_mode_until: working_mode.until(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::{
        task::{TaskId, parse_tasks},
        test_utils::local_time,
    };

    fn ledger_for(now: DateTime<FixedOffset>) -> DailyLedger {
        DailyLedger::new(now.date_naive())
    }

    #[test]
    fn timed_task_at_current_minute_fires() {
        let now = local_time(2026, 10, 19, 9, 0);
        let tasks = parse_tasks("09:00 drink water");

        let decision = evaluate(&tasks, &ledger_for(now), now, &WorkingModeGate::default());

        assert!(decision.should_show);
        assert_eq!(decision.current_timed_tasks, tasks);
        assert!(decision.incomplete_general_tasks.is_empty());
    }

    #[test]
    fn timed_task_is_gone_a_minute_later() {
        let now = local_time(2026, 10, 19, 9, 1);
        let tasks = parse_tasks("09:00 drink water");

        let decision = evaluate(&tasks, &ledger_for(now), now, &WorkingModeGate::default());

        assert!(!decision.should_show);
        assert!(decision.current_timed_tasks.is_empty());
    }

    #[test]
    fn timed_task_matches_on_seconds_within_the_minute() {
        let now = local_time(2026, 10, 19, 9, 0) + TimeDelta::seconds(59);
        let tasks = parse_tasks("09:00 drink water");

        let decision = evaluate(&tasks, &ledger_for(now), now, &WorkingModeGate::default());

        assert_eq!(decision.current_timed_tasks.len(), 1);
    }

    #[test]
    fn unpadded_minute_never_matches() {
        let now = local_time(2026, 10, 19, 9, 5);
        let tasks = parse_tasks("9:5 stretch");

        let decision = evaluate(&tasks, &ledger_for(now), now, &WorkingModeGate::default());

        assert!(decision.current_timed_tasks.is_empty());
    }

    #[test]
    fn completed_general_tasks_are_left_out() {
        let now = local_time(2026, 10, 19, 11, 0);
        let tasks = parse_tasks("read\nwalk");
        let mut ledger = ledger_for(now);
        ledger.complete(tasks[0].id().clone());

        let decision = evaluate(&tasks, &ledger, now, &WorkingModeGate::default());

        assert!(decision.should_show);
        assert_eq!(decision.incomplete_general_tasks, vec![tasks[1].clone()]);
    }

    #[test]
    fn nothing_pending_means_no_reminder() {
        let now = local_time(2026, 10, 19, 11, 0);
        let tasks = parse_tasks("read\n08:00 breakfast");
        let mut ledger = ledger_for(now);
        ledger.complete(tasks[0].id().clone());

        let decision = evaluate(&tasks, &ledger, now, &WorkingModeGate::default());

        assert!(!decision.should_show);
    }

    #[test]
    fn working_mode_suppresses_reminders() {
        let now = local_time(2026, 10, 19, 9, 0);
        let tasks = parse_tasks("09:00 drink water\nread");
        let mut gate = WorkingModeGate::default();
        gate.enable(now.with_timezone(&Utc) - TimeDelta::minutes(30));

        let decision = evaluate(&tasks, &ledger_for(now), now, &gate);

        assert!(!decision.should_show);
        assert!(decision.working_mode_active);
        assert_eq!(decision.current_timed_tasks.len(), 1);
        assert_eq!(decision.incomplete_general_tasks.len(), 1);
        assert_eq!(decision.working_mode_until, gate.until());
    }

    #[test]
    fn expired_working_mode_no_longer_suppresses() {
        let now = local_time(2026, 10, 19, 11, 0);
        let tasks = parse_tasks("read");
        let mut gate = WorkingModeGate::default();
        gate.enable(now.with_timezone(&Utc) - TimeDelta::minutes(61));

        let decision = evaluate(&tasks, &ledger_for(now), now, &gate);

        assert!(decision.should_show);
        assert!(!decision.working_mode_active);
        assert!(decision.working_mode_until.is_some());
    }

    #[test]
    fn serializes_with_boundary_field_names() {
        let now = local_time(2026, 10, 19, 11, 0);
        let decision = evaluate(&[], &ledger_for(now), now, &WorkingModeGate::default());

        let value = serde_json::to_value(&decision).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "shouldShowReminder": false,
                "currentTimedTasks": [],
                "incompleteGeneralTasks": [],
                "workingModeActive": false,
                "workingModeUntil": null
            })
        );
    }

    #[test]
    fn unknown_completed_ids_do_not_hide_tasks() {
        let now = local_time(2026, 10, 19, 11, 0);
        let tasks = parse_tasks("read");
        let mut ledger = ledger_for(now);
        ledger.complete(TaskId::new("general_unknown"));

        let decision = evaluate(&tasks, &ledger, now, &WorkingModeGate::default());

        assert_eq!(decision.incomplete_general_tasks.len(), 1);
    }
}
