use chrono::{DateTime, FixedOffset, Local, Utc};

/// Source of the local wall-clock time every daily and time-of-day decision is made against.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock {
    timezone: Option<chrono_tz::Tz>,
}

impl SystemClock {
    /// Uses the machine's local time unless a timezone is given.
    pub fn new(timezone: Option<chrono_tz::Tz>) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
            None => Local::now().fixed_offset(),
        }
    }
}
