//! Operator console for a live-video HLS relay
//!
//! Mirrors the relay server's config into an editable form, watches the
//! relay's health, and keeps a local player attached to the delayed
//! live stream.

pub mod api;
pub mod config;
pub mod console;
pub mod data;
pub mod health;
pub mod logging;
pub mod player;
pub mod store;
pub mod sync;
pub mod view;
