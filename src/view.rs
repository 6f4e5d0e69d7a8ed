//! View values broadcast to the front-end
//!
//! Rendering is a pure projection: equal inputs always produce equal
//! view values, so tests assert on these instead of printed text.

use crate::data::RelayStatus;
use crate::health;
use crate::store::FormState;

/// Placeholder shown for telemetry the server could not provide
pub const MISSING_TELEMETRY: &str = "n/a";

/// Status half of the display
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub healthy: bool,

    /// One-line summary of the relay's running state
    pub headline: String,

    pub uptime_seconds: f64,
    pub segment_count: u64,

    /// Playlist age as display text, placeholder when unavailable
    pub playlist_age: String,

    /// Effective buffer window as display text, placeholder when unavailable
    pub effective_buffer: String,

    /// Last relay failure with its exit code, if any
    pub last_error: Option<String>,
}

/// Full display state: form plus status
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotView {
    pub form: FormState,
    pub status: StatusView,
}

/// Project raw status into its display form
pub fn status_view(status: &RelayStatus) -> StatusView {
    let headline = if status.running {
        match status.pid {
            Some(pid) => format!(
                "Relay running (pid {}) source: {}",
                pid, status.source_url
            ),
            None => format!("Relay running source: {}", status.source_url),
        }
    } else {
        "Relay stopped".to_string()
    };

    let last_error = if status.last_error.is_empty() {
        None
    } else {
        Some(match status.last_exit_code {
            Some(code) => format!("{} (exit code {})", status.last_error, code),
            None => status.last_error.clone(),
        })
    };

    StatusView {
        healthy: health::healthy(status),
        headline,
        uptime_seconds: status.uptime_seconds,
        segment_count: status.segment_count,
        playlist_age: seconds_or_placeholder(status.playlist_age_seconds),
        effective_buffer: seconds_or_placeholder(status.effective_buffer_seconds),
        last_error,
    }
}

/// Project the full form/status pair
pub fn snapshot_view(form: &FormState, status: &RelayStatus) -> SnapshotView {
    SnapshotView {
        form: form.clone(),
        status: status_view(status),
    }
}

fn seconds_or_placeholder(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}s", v),
        None => MISSING_TELEMETRY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_status() -> RelayStatus {
        RelayStatus {
            running: true,
            pid: Some(321),
            playlist_exists: true,
            playlist_age_seconds: Some(2.5),
            source_url: "http://upstream/live".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_running_headline_includes_pid_and_source() {
        let view = status_view(&running_status());
        assert_eq!(
            view.headline,
            "Relay running (pid 321) source: http://upstream/live"
        );
        assert!(view.healthy);
    }

    #[test]
    fn test_stopped_headline() {
        let view = status_view(&RelayStatus::default());
        assert_eq!(view.headline, "Relay stopped");
        assert!(!view.healthy);
    }

    #[test]
    fn test_missing_telemetry_renders_placeholder() {
        let status = RelayStatus {
            playlist_age_seconds: None,
            effective_buffer_seconds: None,
            ..running_status()
        };

        let view = status_view(&status);
        assert_eq!(view.playlist_age, MISSING_TELEMETRY);
        assert_eq!(view.effective_buffer, MISSING_TELEMETRY);
    }

    #[test]
    fn test_last_error_carries_exit_code() {
        let status = RelayStatus {
            last_error: "ffmpeg not installed".to_string(),
            last_exit_code: Some(1),
            ..RelayStatus::default()
        };

        let view = status_view(&status);
        assert_eq!(
            view.last_error.as_deref(),
            Some("ffmpeg not installed (exit code 1)")
        );
    }

    #[test]
    fn test_projection_is_deterministic() {
        let status = running_status();
        assert_eq!(status_view(&status), status_view(&status));

        let form = FormState::default();
        assert_eq!(snapshot_view(&form, &status), snapshot_view(&form, &status));
    }
}
