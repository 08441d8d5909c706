mod sink;

pub use sink::{ConsoleReminderSink, LogReminderSink, ReminderResponse, ReminderSink};

use std::{sync::Arc, time::Duration};

use chrono::{NaiveTime, TimeDelta, Timelike};
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{clock::Clock, reminder::ReminderDecision, storage::TaskStore};

pub const POLL_INTERVAL: Duration = Duration::from_secs(30 * 60);
pub const SNOOZE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Hours of the day, `[from_hour, until_hour)`, during which reminders are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveHours {
    from_hour: u32,
    until_hour: u32,
}

impl ActiveHours {
    pub fn new(from_hour: u32, until_hour: u32) -> anyhow::Result<Self> {
        anyhow::ensure!(
            from_hour < until_hour && until_hour <= 24,
            "Invalid active hours {from_hour}..{until_hour}"
        );
        Ok(Self {
            from_hour,
            until_hour,
        })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        (self.from_hour..self.until_hour).contains(&time.hour())
    }
}

impl Default for ActiveHours {
    fn default() -> Self {
        Self {
            from_hour: 9,
            until_hour: 22,
        }
    }
}

/// Time left until the next `:00` or `:30` of the hour. A reading right on a
/// boundary waits for the following one.
pub fn delay_until_next_half_hour(now: NaiveTime) -> TimeDelta {
    let minutes_until_next = if now.minute() < 30 {
        30 - now.minute()
    } else {
        60 - now.minute()
    };
    let nanos = now.nanosecond().min(999_999_999);

    TimeDelta::seconds(i64::from(minutes_until_next * 60 - now.second()))
        - TimeDelta::nanoseconds(i64::from(nanos))
}

pub struct PollerHandle {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl PollerHandle {
    /// Stops both the pending alignment delay and the repeating checks.
    pub async fn stop(self, timeout: Duration) {
        self.cancellation_token.cancel();
        if time::timeout(timeout, self.task).await.is_err() {
            log::warn!("Reminder poller did not stop within {timeout:?}");
        }
    }
}

/// Asks the task store whether a reminder is due, right away and then at
/// every half hour, and hands due reminders to a [`ReminderSink`].
///
/// Reminders are surfaced in their own task, so a sink waiting for an answer
/// or a snooze never moves the checks off the half-hour grid.
#[derive(Clone)]
pub struct ReminderPoller {
    store: Arc<dyn TaskStore>,
    sink: Arc<dyn ReminderSink>,
    clock: Arc<dyn Clock>,
    active_hours: ActiveHours,
}

impl ReminderPoller {
    pub fn new(
        store: Arc<dyn TaskStore>,
        sink: Arc<dyn ReminderSink>,
        clock: Arc<dyn Clock>,
        active_hours: ActiveHours,
    ) -> Self {
        Self {
            store,
            sink,
            clock,
            active_hours,
        }
    }

    pub fn start(self) -> PollerHandle {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::info!("Reminder poller stopped");
                }
                _ = self.run(task_cancellation_token.clone()) => {}
            }
        });

        PollerHandle {
            task,
            cancellation_token,
        }
    }

    async fn run(&self, cancellation_token: CancellationToken) {
        let alignment = delay_until_next_half_hour(self.clock.now().time())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let first_boundary = Instant::now() + alignment;

        self.check(&cancellation_token).await;

        log::info!("Next reminder check in {alignment:?}");
        let mut interval = time::interval_at(first_boundary, POLL_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            self.check(&cancellation_token).await;
        }
    }

    async fn check(&self, cancellation_token: &CancellationToken) {
        let now = self.clock.now();
        if !self.active_hours.contains(now.time()) {
            log::debug!("Outside active hours, skipping reminder check. [now = {now}]");
            return;
        }

        let decision = match self.store.check_reminder().await {
            Ok(decision) => decision,
            Err(error) => {
                log::error!("Failed to check reminders. [error = {error:#}]");
                return;
            }
        };

        log::debug!(
            "Reminder check done. [should_show = {}, working_mode_active = {}, working_mode_until = {:?}]",
            decision.should_show,
            decision.working_mode_active,
            decision.working_mode_until
        );
        if decision.should_show {
            self.spawn_surface(decision, cancellation_token.clone());
        }
    }

    fn spawn_surface(&self, decision: ReminderDecision, cancellation_token: CancellationToken) {
        let poller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancellation_token.cancelled() => {}
                _ = poller.surface(&decision) => {}
            }
        });
    }

    async fn surface(&self, decision: &ReminderDecision) {
        loop {
            match self.sink.show_reminder(decision).await {
                ReminderResponse::Complete => {
                    self.complete_shown(decision).await;
                    break;
                }
                ReminderResponse::Snooze => {
                    log::info!("Reminder snoozed for {SNOOZE_DURATION:?}");
                    time::sleep(SNOOZE_DURATION).await;
                }
                ReminderResponse::Dismiss => break,
            }
        }
    }

    async fn complete_shown(&self, decision: &ReminderDecision) {
        for task in &decision.incomplete_general_tasks {
            if let Err(error) = self.store.complete_task(task.id().clone()).await {
                log::error!(
                    "Failed to complete task from reminder. [task_id = {}, error = {error:#}]",
                    task.id()
                );
            }
        }
    }
}
