//! Background status poller
//!
//! Refreshes the relay status on a fixed cadence, independent of any
//! operator action. A failed poll is skipped silently; the next tick
//! tries again.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::api::RelayClient;
use crate::view::status_view;

use super::ViewEvent;

/// How often the relay status is refreshed
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct StatusPoller {
    api: RelayClient,
    view_tx: broadcast::Sender<ViewEvent>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(api: RelayClient, view_tx: broadcast::Sender<ViewEvent>) -> Self {
        Self {
            api,
            view_tx,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the cadence, for tests that cannot wait five seconds
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the poll loop. The first fetch happens one full interval
    /// after spawn, so a console that just loaded is not polled twice.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut timer =
                tokio::time::interval_at(Instant::now() + self.interval, self.interval);

            loop {
                timer.tick().await;
                match self.api.fetch_status().await {
                    Ok(status) => {
                        let _ = self.view_tx.send(ViewEvent::Status(status_view(&status)));
                    }
                    Err(e) => {
                        debug!("Status poll skipped: {}", e);
                    }
                }
            }
        })
    }
}
