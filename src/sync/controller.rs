//! Console controller implementation
//!
//! Owns the config store and the player, and serializes every operator
//! action against the relay server. Mutating actions always end with a
//! full state reload so the form and player reflect what the server
//! actually accepted.

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

use crate::api::{RelayApiError, RelayClient};
use crate::data::RelayStatus;
use crate::player::PlayerManager;
use crate::store::ConfigStore;
use crate::view::snapshot_view;

use super::{ControlCommand, ViewEvent};

/// The controller drives the whole console from a single task
pub struct SyncController {
    api: RelayClient,
    store: ConfigStore,
    player: PlayerManager,
    last_status: RelayStatus,
    cmd_rx: mpsc::Receiver<ControlCommand>,
    view_tx: broadcast::Sender<ViewEvent>,
}

impl SyncController {
    pub fn new(
        api: RelayClient,
        player: PlayerManager,
        cmd_rx: mpsc::Receiver<ControlCommand>,
        view_tx: broadcast::Sender<ViewEvent>,
    ) -> Self {
        Self {
            api,
            store: ConfigStore::new(),
            player,
            last_status: RelayStatus::default(),
            cmd_rx,
            view_tx,
        }
    }

    /// Broadcast a view update
    fn send(&self, event: ViewEvent) {
        let _ = self.view_tx.send(event);
    }

    /// Run the controller main loop
    pub async fn run(mut self) -> Result<()> {
        info!("Console controller starting");
        self.load_state().await;

        while let Some(cmd) = self.cmd_rx.recv().await {
            match cmd {
                ControlCommand::Reload => {
                    self.load_state().await;
                }
                ControlCommand::SetField { name, value } => {
                    self.edit(|store| store.set_field(&name, &value));
                }
                ControlCommand::SetChannelField { index, name, value } => {
                    self.edit(|store| store.set_channel_field(index, &name, &value));
                }
                ControlCommand::AddChannel => {
                    self.edit(|store| {
                        store.add_channel();
                        Ok(())
                    });
                }
                ControlCommand::SelectChannel { id } => {
                    self.edit(|store| store.select_active_channel(&id));
                }
                ControlCommand::Save => {
                    self.save_config().await;
                }
                ControlCommand::StartRelay => {
                    self.send(ViewEvent::Notice("Relay start requested".to_string()));
                    let result = self.api.start().await;
                    self.finish_relay_action(result).await;
                }
                ControlCommand::StopRelay => {
                    self.send(ViewEvent::Notice("Relay stop requested".to_string()));
                    let result = self.api.stop().await;
                    self.finish_relay_action(result).await;
                }
                ControlCommand::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        self.player.teardown();
        info!("Console controller shutting down");
        Ok(())
    }

    /// Apply a form edit and re-render, or surface the rejection
    fn edit(&mut self, apply: impl FnOnce(&mut ConfigStore) -> Result<()>) {
        match apply(&mut self.store) {
            Ok(()) => self.render_full(),
            Err(e) => {
                warn!("Form edit rejected: {}", e);
                self.send(ViewEvent::Notice(format!("Edit failed: {}", e)));
            }
        }
    }

    /// Fetch the combined snapshot, rebuild the form, and restart the
    /// player at the mirrored delay. Player trouble is surfaced as a
    /// notice but never blocks the rest of the console.
    async fn load_state(&mut self) {
        match self.api.fetch_snapshot().await {
            Ok(snapshot) => {
                self.store.load(snapshot.config);
                self.last_status = snapshot.status;
                self.render_full();

                let delay = self
                    .store
                    .mirror()
                    .map(|config| config.player_delay_seconds)
                    .unwrap_or(0.0);
                if let Err(e) = self.player.setup(delay) {
                    warn!("Player setup failed: {}", e);
                    self.send(ViewEvent::Notice(format!("Player failed: {}", e)));
                }
            }
            Err(e) => {
                warn!("Failed to load relay state: {}", e);
                self.send(ViewEvent::Notice(format!("Load failed: {}", e)));
            }
        }
    }

    /// Collect the form and push it to the server, then reload whatever
    /// the server ended up with, accepted or not.
    async fn save_config(&mut self) {
        let config = self.store.collect();
        match self.api.save_config(&config).await {
            Ok(()) => {
                info!("Config saved, relay restarting");
                self.send(ViewEvent::Notice("Saved + restarted".to_string()));
            }
            Err(e) => {
                warn!("Config save rejected: {}", e);
                let text = match &e {
                    RelayApiError::Rejected { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                self.send(ViewEvent::Notice(format!("Save failed: {}", text)));
            }
        }
        self.load_state().await;
    }

    /// Surface a start/stop outcome, then reload the server state
    async fn finish_relay_action(&mut self, result: Result<(), RelayApiError>) {
        if let Err(e) = result {
            warn!("Relay action failed: {}", e);
            self.send(ViewEvent::Notice(format!("Request failed: {}", e)));
        }
        self.load_state().await;
    }

    /// Push a full form + status render to the views
    fn render_full(&self) {
        self.send(ViewEvent::Snapshot(snapshot_view(
            self.store.form(),
            &self.last_status,
        )));
    }
}
