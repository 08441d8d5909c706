use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Stdin},
    sync::Mutex,
};

use crate::{reminder::ReminderDecision, task::Task};

/// What the user did with a surfaced reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderResponse {
    /// Mark every general task in the reminder as done.
    Complete,
    /// Show the same reminder again a bit later.
    Snooze,
    Dismiss,
}

#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn show_reminder(&self, decision: &ReminderDecision) -> ReminderResponse;
}

/// Writes reminders to the log and leaves them be.
pub struct LogReminderSink;

#[async_trait]
impl ReminderSink for LogReminderSink {
    async fn show_reminder(&self, decision: &ReminderDecision) -> ReminderResponse {
        log::info!("Task reminder\n{}", notification_body(decision));
        ReminderResponse::Dismiss
    }
}

/// Prints reminders to the terminal and waits for an answer on stdin.
pub struct ConsoleReminderSink {
    input: Mutex<BufReader<Stdin>>,
}

impl ConsoleReminderSink {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

#[async_trait]
impl ReminderSink for ConsoleReminderSink {
    async fn show_reminder(&self, decision: &ReminderDecision) -> ReminderResponse {
        println!(
            "\n== Task reminder ==\n{}\n[c] complete  [s] snooze  [enter] dismiss",
            notification_body(decision)
        );

        let mut line = String::new();
        match self.input.lock().await.read_line(&mut line).await {
            Ok(_) => parse_response(&line),
            Err(error) => {
                log::warn!("Could not read reminder response. [error = {error}]");
                ReminderResponse::Dismiss
            }
        }
    }
}

fn parse_response(line: &str) -> ReminderResponse {
    match line.trim().to_lowercase().as_str() {
        "c" | "complete" | "done" => ReminderResponse::Complete,
        "s" | "snooze" => ReminderResponse::Snooze,
        _ => ReminderResponse::Dismiss,
    }
}

pub fn notification_body(decision: &ReminderDecision) -> String {
    let mut lines = Vec::new();
    if !decision.current_timed_tasks.is_empty() {
        lines.push(format!(
            "Timed: {}",
            descriptions(&decision.current_timed_tasks)
        ));
    }
    if !decision.incomplete_general_tasks.is_empty() {
        lines.push(format!(
            "General: {}",
            descriptions(&decision.incomplete_general_tasks)
        ));
    }

    lines.join("\n")
}

fn descriptions(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(Task::description)
        .collect::<Vec<_>>()
        .join(", ")
}
