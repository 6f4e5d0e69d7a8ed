//! Health verdict derived from raw relay status

use crate::data::RelayStatus;

/// A playlist older than this is considered stalled even if the relay
/// process is still alive.
pub const STALE_PLAYLIST_SECS: f64 = 20.0;

/// Collapse raw status signals into a single verdict.
///
/// A missing playlist age means the signal is unavailable, not that the
/// relay failed; a stale age means the playlist stopped advancing.
pub fn healthy(status: &RelayStatus) -> bool {
    let fresh = match status.playlist_age_seconds {
        None => true,
        Some(age) => age < STALE_PLAYLIST_SECS,
    };

    status.running && status.playlist_exists && fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_status(age: Option<f64>) -> RelayStatus {
        RelayStatus {
            running: true,
            playlist_exists: true,
            playlist_age_seconds: age,
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_when_fresh() {
        assert!(healthy(&running_status(Some(3.2))));
    }

    #[test]
    fn test_stale_boundary() {
        assert!(!healthy(&running_status(Some(20.0))));
        assert!(healthy(&running_status(Some(19.999))));
    }

    #[test]
    fn test_missing_age_is_not_failure() {
        assert!(healthy(&running_status(None)));
    }

    #[test]
    fn test_requires_running_and_playlist() {
        let mut status = running_status(None);
        status.running = false;
        assert!(!healthy(&status));

        let mut status = running_status(Some(1.0));
        status.playlist_exists = false;
        assert!(!healthy(&status));
    }
}
