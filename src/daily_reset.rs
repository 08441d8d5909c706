use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

pub fn should_reset(last_reset: NaiveDate, today: NaiveDate) -> bool {
    last_reset != today
}

/// General tasks completed on the day of `last_reset`.
///
/// The ledger only knows about a single day. Anything that reads or writes
/// the completed ids has to call [`DailyLedger::apply_reset`] first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLedger {
    #[serde(rename = "completedGeneralTasks")]
    completed: Vec<TaskId>,
    #[serde(rename = "lastReset")]
    last_reset: NaiveDate,
}

impl DailyLedger {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            completed: Vec::new(),
            last_reset: today,
        }
    }

    /// Clears the completed ids when the day changed. Returns whether it did.
    pub fn apply_reset(&mut self, today: NaiveDate) -> bool {
        if !should_reset(self.last_reset, today) {
            return false;
        }

        log::info!(
            "New day, clearing completed tasks. [last_reset = {}, today = {}, cleared = {}]",
            self.last_reset,
            today,
            self.completed.len()
        );
        self.completed.clear();
        self.last_reset = today;

        true
    }

    /// Records a completion. Already completed ids are left as they are.
    pub fn complete(&mut self, id: TaskId) -> bool {
        if self.completed.contains(&id) {
            return false;
        }

        self.completed.push(id);
        true
    }

    pub fn is_completed(&self, id: &TaskId) -> bool {
        self.completed.contains(id)
    }

    pub fn completed(&self) -> &[TaskId] {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    use super::*;
    use crate::test_utils::date;

    #[test]
    fn reset_clears_completions_from_yesterday() {
        let mut ledger = DailyLedger::new(date(2026, 10, 18));
        ledger.complete(TaskId::new("general_a"));
        ledger.complete(TaskId::new("general_b"));

        let reset = ledger.apply_reset(date(2026, 10, 19));

        assert!(reset);
        assert!(ledger.completed().is_empty());
        assert_eq!(ledger.last_reset, date(2026, 10, 19));
    }

    #[test]
    fn same_day_keeps_completions() {
        let mut ledger = DailyLedger::new(date(2026, 10, 19));
        ledger.complete(TaskId::new("general_a"));

        let reset = ledger.apply_reset(date(2026, 10, 19));

        assert!(!reset);
        assert_eq!(ledger.completed(), [TaskId::new("general_a")]);
    }

    #[test]
    fn date_going_backwards_also_resets() {
        let mut ledger = DailyLedger::new(date(2026, 10, 19));
        ledger.complete(TaskId::new("general_a"));

        assert!(ledger.apply_reset(date(2026, 10, 18)));
        assert!(ledger.completed().is_empty());
    }

    #[test]
    fn completing_twice_is_a_no_op() {
        let mut ledger = DailyLedger::new(date(2026, 10, 19));

        assert!(ledger.complete(TaskId::new("general_a")));
        let once = ledger.clone();
        assert!(!ledger.complete(TaskId::new("general_a")));

        assert_eq!(ledger, once);
    }

    #[test]
    fn unknown_ids_are_accepted() {
        let mut ledger = DailyLedger::new(date(2026, 10, 19));

        ledger.complete(TaskId::new("no-such-task"));

        assert!(ledger.is_completed(&TaskId::new("no-such-task")));
    }

    #[test]
    fn serializes_with_storage_keys() {
        let mut ledger = DailyLedger::new(date(2026, 10, 19));
        ledger.complete(TaskId::new("general_a"));

        let value = serde_json::to_value(&ledger).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "completedGeneralTasks": ["general_a"], "lastReset": "2026-10-19" })
        );
    }

    proptest! {
        #[test]
        fn reset_happens_exactly_when_day_differs(
            last_reset in arb::<NaiveDate>(),
            days_later in 0u64..3
        ) {
            prop_assume!(last_reset.checked_add_days(Days::new(days_later)).is_some());
            let today = last_reset.checked_add_days(Days::new(days_later)).unwrap();
            let mut ledger = DailyLedger::new(last_reset);
            ledger.complete(TaskId::new("general_a"));

            let reset = ledger.apply_reset(today);

            prop_assert_eq!(reset, days_later > 0);
            prop_assert_eq!(ledger.last_reset, today);
            prop_assert_eq!(ledger.completed().is_empty(), days_later > 0);
        }
    }
}
