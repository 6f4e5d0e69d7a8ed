//! External player processes
//!
//! Runs mpv as the delayed live player, with a plain ffplay fallback for
//! hosts where mpv is not installed.

use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use tracing::{debug, error, info, warn};

use super::engine::{PlayerEngine, PlayerSession, PlayerTuning};
use crate::config::PlayerSettings;

/// Player engine backed by local mpv / ffplay binaries
pub struct MpvEngine {
    mpv_path: String,
    ffplay_path: String,
}

impl MpvEngine {
    pub fn new(settings: &PlayerSettings) -> Self {
        Self {
            mpv_path: settings.mpv_path.clone(),
            ffplay_path: settings.ffplay_path.clone(),
        }
    }
}

impl PlayerEngine for MpvEngine {
    fn is_supported(&self) -> bool {
        match Command::new(&self.mpv_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("mpv probe failed: {}", e);
                false
            }
        }
    }

    fn create(&self, tuning: &PlayerTuning) -> Result<Box<dyn PlayerSession>> {
        Ok(Box::new(MpvSession {
            mpv_path: self.mpv_path.clone(),
            tuning: *tuning,
            source: None,
            process: None,
        }))
    }

    fn create_direct(&self) -> Result<Box<dyn PlayerSession>> {
        Ok(Box::new(FfplaySession {
            ffplay_path: self.ffplay_path.clone(),
            source: None,
            process: None,
        }))
    }
}

/// A single mpv process playing the relay manifest
struct MpvSession {
    mpv_path: String,
    tuning: PlayerTuning,
    source: Option<String>,
    process: Option<Child>,
}

impl PlayerSession for MpvSession {
    fn load_source(&mut self, url: &str) -> Result<()> {
        self.source = Some(url.to_string());
        Ok(())
    }

    fn attach_media(&mut self) -> Result<()> {
        let source = self
            .source
            .clone()
            .context("No source loaded before attach")?;

        let args = vec![
            "--no-terminal".to_string(),
            // Negative start seeks back from the live edge of the playlist
            format!("--start=-{}", self.tuning.live_sync_duration),
            "--cache=yes".to_string(),
            format!("--demuxer-readahead-secs={}", self.tuning.max_buffer_length),
            format!("--cache-secs={}", self.tuning.max_max_buffer_length),
            // Roughly one MiB per buffered second at the relay's default bitrate
            format!(
                "--demuxer-max-back-bytes={}MiB",
                self.tuning.back_buffer_length as u64
            ),
            source,
        ];

        debug!("Launching mpv with args: {:?}", args);

        let process = Command::new(&self.mpv_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch mpv from {:?}", self.mpv_path))?;

        info!("mpv started (pid {})", process.id());
        self.process = Some(process);
        Ok(())
    }

    fn destroy(&mut self) {
        stop_process("mpv", &mut self.process);
    }
}

impl Drop for MpvSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Plain playback without buffering control
struct FfplaySession {
    ffplay_path: String,
    source: Option<String>,
    process: Option<Child>,
}

impl PlayerSession for FfplaySession {
    fn load_source(&mut self, url: &str) -> Result<()> {
        self.source = Some(url.to_string());
        Ok(())
    }

    fn attach_media(&mut self) -> Result<()> {
        let source = self
            .source
            .clone()
            .context("No source loaded before attach")?;

        let process = Command::new(&self.ffplay_path)
            .args(["-loglevel", "error", &source])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to launch ffplay from {:?}", self.ffplay_path))?;

        info!("ffplay started (pid {})", process.id());
        self.process = Some(process);
        Ok(())
    }

    fn destroy(&mut self) {
        stop_process("ffplay", &mut self.process);
    }
}

impl Drop for FfplaySession {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Stop a player process, trying SIGTERM before a forced kill
fn stop_process(name: &str, slot: &mut Option<Child>) {
    let Some(mut process) = slot.take() else {
        return;
    };

    match process.try_wait() {
        Ok(Some(status)) => {
            debug!("{} already exited: {:?}", name, status);
            return;
        }
        Ok(None) => {}
        Err(e) => {
            error!("Error checking {} status: {}", name, e);
        }
    }

    // Try graceful shutdown first
    #[cfg(unix)]
    {
        unsafe {
            libc::kill(process.id() as i32, libc::SIGTERM);
        }

        for _ in 0..10 {
            std::thread::sleep(std::time::Duration::from_millis(100));
            if let Ok(Some(status)) = process.try_wait() {
                debug!("{} exited with status: {:?}", name, status);
                return;
            }
        }
        warn!("{} did not stop gracefully, killing...", name);
    }

    let _ = process.kill();
    let _ = process.wait();
    info!("{} stopped", name);
}
