//! Player engine trait and session tuning

use anyhow::Result;

use crate::config::PlayerSettings;

/// Default distance behind live when the configured delay is unusable
pub const DEFAULT_LIVE_SYNC_SECS: f64 = 75.0;

const MAX_BUFFER_SECS: f64 = 180.0;
const MAX_MAX_BUFFER_SECS: f64 = 240.0;
const BACK_BUFFER_SECS: f64 = 180.0;

/// Buffering parameters for one playback session.
///
/// The buffer bounds are fixed, generous multi-minute values so playback
/// tolerates the configured relay delay without rebuffering; only the
/// live-sync distance comes from the server config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    /// Seconds behind the live edge playback should sit
    pub live_sync_duration: f64,

    /// Forward buffer target in seconds
    pub max_buffer_length: f64,

    /// Hard cap on the forward buffer in seconds
    pub max_max_buffer_length: f64,

    /// Seconds of already-played media kept around
    pub back_buffer_length: f64,
}

impl PlayerTuning {
    /// Tuning for a configured delay. Falsy delays (zero or NaN) fall
    /// back to the default.
    pub fn for_delay(delay_seconds: f64) -> Self {
        let live_sync_duration = if delay_seconds == 0.0 || delay_seconds.is_nan() {
            DEFAULT_LIVE_SYNC_SECS
        } else {
            delay_seconds
        };

        Self {
            live_sync_duration,
            max_buffer_length: MAX_BUFFER_SECS,
            max_max_buffer_length: MAX_MAX_BUFFER_SECS,
            back_buffer_length: BACK_BUFFER_SECS,
        }
    }
}

/// Playback capability of the host machine.
///
/// `create` builds a tuned adaptive session; `create_direct` is the
/// untuned fallback used when adaptive playback is unsupported.
pub trait PlayerEngine: Send + Sync {
    /// Whether tuned adaptive playback is available
    fn is_supported(&self) -> bool;

    /// Build a session with the given tuning
    fn create(&self, tuning: &PlayerTuning) -> Result<Box<dyn PlayerSession>>;

    /// Build a plain session with no tuning at all
    fn create_direct(&self) -> Result<Box<dyn PlayerSession>>;
}

/// One playback session. Sessions are single-use: reconfiguring means
/// destroying the session and creating a new one.
pub trait PlayerSession: Send {
    /// Point the session at a manifest URL
    fn load_source(&mut self, url: &str) -> Result<()>;

    /// Bind to the display, starting the player process
    fn attach_media(&mut self) -> Result<()>;

    /// Release the underlying process. Must be safe to call twice.
    fn destroy(&mut self);
}

/// Build the player engine for this machine
pub fn create_player_engine(settings: &PlayerSettings) -> Box<dyn PlayerEngine> {
    Box::new(super::mpv::MpvEngine::new(settings))
}
