//! Player lifecycle management
//!
//! Exactly one session is live at a time. Reconfiguring always tears the
//! old session down completely before the next one is created; the
//! engines cannot retune a live session in place.

use anyhow::Result;
use tracing::info;

use super::engine::{PlayerEngine, PlayerSession, PlayerTuning};

/// Owns the single live player session
pub struct PlayerManager {
    engine: Box<dyn PlayerEngine>,
    session: Option<Box<dyn PlayerSession>>,
    manifest_url: String,
}

impl PlayerManager {
    pub fn new(engine: Box<dyn PlayerEngine>, manifest_url: String) -> Self {
        Self {
            engine,
            session: None,
            manifest_url,
        }
    }

    /// (Re)build the player for the given delay. Any existing session is
    /// destroyed first, so repeated calls with the same config are safe.
    pub fn setup(&mut self, delay_seconds: f64) -> Result<()> {
        self.teardown();

        let mut session = if self.engine.is_supported() {
            let tuning = PlayerTuning::for_delay(delay_seconds);
            info!(
                "Starting player session {}s behind live: {}",
                tuning.live_sync_duration, self.manifest_url
            );
            self.engine.create(&tuning)?
        } else {
            info!("Adaptive playback unavailable, using plain playback");
            self.engine.create_direct()?
        };

        session.load_source(&self.manifest_url)?;
        session.attach_media()?;
        self.session = Some(session);
        Ok(())
    }

    /// Destroy the live session, if any
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.destroy();
        }
    }

    /// Whether a session is currently attached
    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for PlayerManager {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::DEFAULT_LIVE_SYNC_SECS;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Created { live_sync: f64 },
        CreatedDirect,
        Loaded(String),
        Attached,
        Destroyed,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl Recorder {
        fn push(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    struct StubEngine {
        supported: bool,
        recorder: Recorder,
    }

    struct StubSession {
        recorder: Recorder,
    }

    impl PlayerEngine for StubEngine {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn create(&self, tuning: &PlayerTuning) -> Result<Box<dyn PlayerSession>> {
            self.recorder.push(Event::Created {
                live_sync: tuning.live_sync_duration,
            });
            Ok(Box::new(StubSession {
                recorder: self.recorder.clone(),
            }))
        }

        fn create_direct(&self) -> Result<Box<dyn PlayerSession>> {
            self.recorder.push(Event::CreatedDirect);
            Ok(Box::new(StubSession {
                recorder: self.recorder.clone(),
            }))
        }
    }

    impl PlayerSession for StubSession {
        fn load_source(&mut self, url: &str) -> Result<()> {
            self.recorder.push(Event::Loaded(url.to_string()));
            Ok(())
        }

        fn attach_media(&mut self) -> Result<()> {
            self.recorder.push(Event::Attached);
            Ok(())
        }

        fn destroy(&mut self) {
            self.recorder.push(Event::Destroyed);
        }
    }

    fn stub_manager(supported: bool) -> (PlayerManager, Recorder) {
        let recorder = Recorder::default();
        let engine = StubEngine {
            supported,
            recorder: recorder.clone(),
        };
        let manager = PlayerManager::new(Box::new(engine), "http://relay/hls/live.m3u8".to_string());
        (manager, recorder)
    }

    #[test]
    fn test_setup_twice_keeps_one_session_with_new_tuning() {
        let (mut manager, recorder) = stub_manager(true);
        manager.setup(30.0).unwrap();
        manager.setup(90.0).unwrap();

        assert!(manager.is_attached());
        assert_eq!(
            recorder.events(),
            vec![
                Event::Created { live_sync: 30.0 },
                Event::Loaded("http://relay/hls/live.m3u8".to_string()),
                Event::Attached,
                Event::Destroyed,
                Event::Created { live_sync: 90.0 },
                Event::Loaded("http://relay/hls/live.m3u8".to_string()),
                Event::Attached,
            ]
        );
    }

    #[test]
    fn test_falsy_delay_uses_default() {
        let (mut manager, recorder) = stub_manager(true);
        manager.setup(0.0).unwrap();

        assert_eq!(
            recorder.events()[0],
            Event::Created {
                live_sync: DEFAULT_LIVE_SYNC_SECS
            }
        );
    }

    #[test]
    fn test_unsupported_engine_falls_back_to_direct() {
        let (mut manager, recorder) = stub_manager(false);
        manager.setup(60.0).unwrap();

        assert_eq!(
            recorder.events(),
            vec![
                Event::CreatedDirect,
                Event::Loaded("http://relay/hls/live.m3u8".to_string()),
                Event::Attached,
            ]
        );
    }

    #[test]
    fn test_drop_destroys_session() {
        let (mut manager, recorder) = stub_manager(true);
        manager.setup(45.0).unwrap();
        drop(manager);

        assert_eq!(recorder.events().last(), Some(&Event::Destroyed));
    }
}
