use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub const WORKING_MODE_MINUTES: i64 = 60;

/// Silences reminders until `until` passes.
///
/// Expiry is only ever looked at lazily, nothing fires when it passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingModeGate {
    until: Option<DateTime<Utc>>,
}

impl WorkingModeGate {
    /// Starts a full working-mode period from `now`, replacing any earlier one.
    pub fn enable(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let until = now + TimeDelta::minutes(WORKING_MODE_MINUTES);
        self.until = Some(until);
        until
    }

    pub fn disable(&mut self) {
        self.until = None;
    }

    pub fn toggle(&mut self, enabled: bool, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if enabled {
            Some(self.enable(now))
        } else {
            self.disable();
            None
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        matches!(self.until, Some(until) if now < until)
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }
}
