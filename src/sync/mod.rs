//! Console engine - coordinates the config store, relay API, and player

mod controller;
mod poller;

pub use controller::SyncController;
pub use poller::{StatusPoller, POLL_INTERVAL};

use crate::view::{SnapshotView, StatusView};

/// Commands that can be sent to the console engine
#[derive(Debug, Clone)]
pub enum ControlCommand {
    /// Re-fetch config and status from the relay and rebuild the player
    Reload,
    /// Edit a top-level config field in the form
    SetField { name: String, value: String },
    /// Edit one field of a channel row
    SetChannelField {
        index: usize,
        name: String,
        value: String,
    },
    /// Append a placeholder channel row
    AddChannel,
    /// Mark a channel as the active one
    SelectChannel { id: String },
    /// Collect the form and push it to the relay server
    Save,
    /// Request relay start on the server
    StartRelay,
    /// Request relay stop on the server
    StopRelay,
    /// Shut the engine down
    Shutdown,
}

/// Updates pushed to every attached view
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// Full form + status render
    Snapshot(SnapshotView),
    /// Status-only refresh from the background poller
    Status(StatusView),
    /// One-line operator notice
    Notice(String),
}
