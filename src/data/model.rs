//! JSON models for the relay API

use serde::{Deserialize, Serialize};

/// Relay configuration held by the server.
///
/// Numeric fields are `f64` because form input coerces the way a browser
/// form would: empty becomes 0, garbage becomes NaN, and NaN serializes
/// as JSON `null`, leaving rejection to server-side validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Upstream stream URL the relay pulls from
    #[serde(default)]
    pub source_url: String,

    /// Encoder preset, e.g. "veryfast"
    #[serde(default)]
    pub preset: String,

    /// HLS segment length in seconds
    #[serde(default)]
    pub hls_time: f64,

    /// Rolling buffer window in minutes (older servers send this as
    /// `hls_list_size`)
    #[serde(default, alias = "hls_list_size")]
    pub buffer_minutes: f64,

    /// How far behind live the player should sit, in seconds
    #[serde(default)]
    pub player_delay_seconds: f64,

    /// ffmpeg thread count, 0 meaning auto
    #[serde(default)]
    pub ffmpeg_threads: f64,

    /// Video bitrate, e.g. "2500k"
    #[serde(default)]
    pub video_bitrate: String,

    /// Audio bitrate, e.g. "128k"
    #[serde(default)]
    pub audio_bitrate: String,

    /// Configured channels (absent on single-stream servers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,

    /// Id of the channel currently selected for relay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_channel_id: Option<String>,
}

/// One configured relay channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique id within the channel list
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub url: String,
}

/// Runtime status reported by the relay server. Read-only on this side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayStatus {
    #[serde(default)]
    pub running: bool,

    /// Relay process id, absent unless running
    #[serde(default)]
    pub pid: Option<u32>,

    #[serde(default)]
    pub uptime_seconds: f64,

    #[serde(default)]
    pub segment_count: u64,

    #[serde(default)]
    pub playlist_exists: bool,

    /// Seconds since the playlist file last advanced; null when the
    /// playlist is missing
    #[serde(default)]
    pub playlist_age_seconds: Option<f64>,

    /// Length of the window the relay is actually keeping, in seconds
    #[serde(default)]
    pub effective_buffer_seconds: Option<f64>,

    #[serde(default)]
    pub effective_hls_list_size: Option<u64>,

    #[serde(default)]
    pub source_url: String,

    /// Last relay failure, empty when none
    #[serde(default)]
    pub last_error: String,

    #[serde(default)]
    pub last_exit_code: Option<i32>,
}

/// Combined envelope returned by `GET /api/config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub config: RelayConfig,
    pub status: RelayStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_serializes_as_null() {
        let config = RelayConfig {
            player_delay_seconds: f64::NAN,
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"player_delay_seconds\":null"));
    }

    #[test]
    fn test_hls_list_size_alias_accepted() {
        let config: RelayConfig =
            serde_json::from_str(r#"{"source_url":"http://u","hls_list_size":30}"#).unwrap();
        assert_eq!(config.buffer_minutes, 30.0);
    }

    #[test]
    fn test_empty_channels_omitted_from_payload() {
        let json = serde_json::to_string(&RelayConfig::default()).unwrap();
        assert!(!json.contains("channels"));
    }

    #[test]
    fn test_status_tolerates_nulls_and_missing_fields() {
        let status: RelayStatus = serde_json::from_str(
            r#"{"running":false,"pid":null,"playlist_age_seconds":null,"last_exit_code":null}"#,
        )
        .unwrap();

        assert!(!status.running);
        assert_eq!(status.pid, None);
        assert_eq!(status.playlist_age_seconds, None);
        assert_eq!(status.segment_count, 0);
    }
}
