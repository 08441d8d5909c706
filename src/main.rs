mod api;
mod appsettings;
mod clock;
mod daily_reset;
mod poller;
mod reminder;
mod server;
mod storage;
mod task;
#[cfg(test)]
mod test_utils;
mod working_mode;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use appsettings::{AppSettings, PollerSettings};
use clock::{Clock, SystemClock};
use poller::{
    ActiveHours, ConsoleReminderSink, LogReminderSink, PollerHandle, ReminderPoller, ReminderSink,
};
use storage::{FallbackTaskStore, FileTaskStore, HttpTaskStore, InMemoryTaskStore, TaskStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load().context("Could not load application settings")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(settings.clock.timezone()?));

    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new(Arc::clone(&clock)));
    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port))
        .await
        .with_context(|| {
            format!(
                "Could not bind {}:{}",
                settings.server.host, settings.server.port
            )
        })?;
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(server::serve(listener, store, shutdown.clone()));

    let poller = if settings.poller.enabled {
        Some(start_poller(&settings.poller, clock).await?)
    } else {
        None
    };

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");

    if let Some(poller) = poller {
        poller.stop(SHUTDOWN_TIMEOUT).await;
    }
    shutdown.cancel();
    server.await??;

    Ok(())
}

async fn start_poller(
    settings: &PollerSettings,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<PollerHandle> {
    log::info!(
        "Starting reminder poller. [server_url = {}, fallback = {}]",
        settings.server_url,
        settings.fallback_path.display()
    );

    let active_hours = ActiveHours::new(settings.active_from_hour, settings.active_until_hour)?;
    let remote = HttpTaskStore::new(
        settings.server_url.as_str(),
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let local = FileTaskStore::open(&settings.fallback_path, Arc::clone(&clock)).await;
    let store = Arc::new(FallbackTaskStore::new(remote, local));
    let sink: Arc<dyn ReminderSink> = if settings.interactive {
        Arc::new(ConsoleReminderSink::new())
    } else {
        Arc::new(LogReminderSink)
    };

    Ok(ReminderPoller::new(store, sink, clock, active_hours).start())
}
