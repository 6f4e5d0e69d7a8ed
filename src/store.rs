//! Config mirror and form state
//!
//! Owns the last-fetched server config and the editable form bound to it.
//! A load replaces the mirror wholesale; collecting reads the form back
//! into a config payload with the same coercion rules a browser form
//! would apply.

use anyhow::{bail, Context, Result};

use crate::data::{Channel, RelayConfig};

/// One editable channel row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelRow {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Editable form values, all kept as raw input strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub source_url: String,
    pub preset: String,
    pub hls_time: String,
    pub buffer_minutes: String,
    pub player_delay_seconds: String,
    pub ffmpeg_threads: String,
    pub video_bitrate: String,
    pub audio_bitrate: String,
    pub channels: Vec<ChannelRow>,

    /// Channel id currently marked active (radio semantics: at most one)
    pub active_channel: Option<String>,
}

/// Holds the authoritative config mirror plus the form bound to it
#[derive(Debug, Default)]
pub struct ConfigStore {
    mirror: Option<RelayConfig>,
    form: FormState,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirror with a freshly fetched config and rebuild the
    /// whole form from it. The active channel is normalized to the first
    /// one when the stored id is unset or no longer present.
    pub fn load(&mut self, mut config: RelayConfig) {
        if config.channels.is_empty() {
            config.active_channel_id = None;
        } else {
            let known = config
                .active_channel_id
                .as_deref()
                .is_some_and(|id| config.channels.iter().any(|c| c.id == id));
            if !known {
                config.active_channel_id = Some(config.channels[0].id.clone());
            }
        }

        self.form = FormState::from_config(&config);
        self.mirror = Some(config);
    }

    /// Last successfully loaded config, if any
    pub fn mirror(&self) -> Option<&RelayConfig> {
        self.mirror.as_ref()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Read the form back into a config payload. Never fails: free text
    /// is trimmed, blank channel ids and names get positional defaults,
    /// and numeric fields coerce like a browser form (empty to 0,
    /// garbage to NaN).
    pub fn collect(&self) -> RelayConfig {
        let channels: Vec<Channel> = self
            .form
            .channels
            .iter()
            .enumerate()
            .map(|(idx, row)| Channel {
                id: non_blank(&row.id, || format!("channel-{}", idx + 1)),
                name: non_blank(&row.name, || format!("Channel {}", idx + 1)),
                url: row.url.trim().to_string(),
            })
            .collect();

        let active = self
            .form
            .active_channel
            .clone()
            .or_else(|| channels.first().map(|c| c.id.clone()));

        RelayConfig {
            source_url: self.form.source_url.trim().to_string(),
            preset: self.form.preset.trim().to_string(),
            hls_time: to_number(&self.form.hls_time),
            buffer_minutes: to_number(&self.form.buffer_minutes),
            player_delay_seconds: to_number(&self.form.player_delay_seconds),
            ffmpeg_threads: to_number(&self.form.ffmpeg_threads),
            video_bitrate: self.form.video_bitrate.trim().to_string(),
            audio_bitrate: self.form.audio_bitrate.trim().to_string(),
            channels,
            active_channel_id: active,
        }
    }

    /// Append a fresh channel row with placeholder values
    pub fn add_channel(&mut self) {
        self.form.channels.push(ChannelRow {
            id: format!("new-{}", chrono::Utc::now().timestamp_millis()),
            name: "New channel".to_string(),
            url: String::new(),
        });
    }

    /// Set a top-level form field by its stable name
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let slot = match field {
            "source_url" => &mut self.form.source_url,
            "preset" => &mut self.form.preset,
            "hls_time" => &mut self.form.hls_time,
            "buffer_minutes" | "hls_list_size" => &mut self.form.buffer_minutes,
            "player_delay_seconds" => &mut self.form.player_delay_seconds,
            "ffmpeg_threads" => &mut self.form.ffmpeg_threads,
            "video_bitrate" => &mut self.form.video_bitrate,
            "audio_bitrate" => &mut self.form.audio_bitrate,
            _ => bail!("unknown field: {}", field),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Set one field of a channel row
    pub fn set_channel_field(&mut self, index: usize, field: &str, value: &str) -> Result<()> {
        let row = self
            .form
            .channels
            .get_mut(index)
            .with_context(|| format!("no channel at index {}", index))?;

        match field {
            "id" => row.id = value.to_string(),
            "name" => row.name = value.to_string(),
            "url" => row.url = value.to_string(),
            _ => bail!("unknown channel field: {}", field),
        }
        Ok(())
    }

    /// Mark a channel active. Radio semantics: the previous selection is
    /// dropped implicitly. The id is captured as-is, so a later edit to
    /// that row's id field leaves the selection pointing at the old value
    /// until the next load normalizes it.
    pub fn select_active_channel(&mut self, id: &str) -> Result<()> {
        if !self.form.channels.iter().any(|c| c.id == id) {
            bail!("no channel with id {:?}", id);
        }
        self.form.active_channel = Some(id.to_string());
        Ok(())
    }
}

impl FormState {
    /// Build form values from a config the way input elements would be
    /// populated, with numbers printed plainly (no trailing `.0`).
    fn from_config(config: &RelayConfig) -> Self {
        Self {
            source_url: config.source_url.clone(),
            preset: config.preset.clone(),
            hls_time: format_number(config.hls_time),
            buffer_minutes: format_number(config.buffer_minutes),
            player_delay_seconds: format_number(config.player_delay_seconds),
            ffmpeg_threads: format_number(config.ffmpeg_threads),
            video_bitrate: config.video_bitrate.clone(),
            audio_bitrate: config.audio_bitrate.clone(),
            channels: config
                .channels
                .iter()
                .map(|c| ChannelRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    url: c.url.clone(),
                })
                .collect(),
            active_channel: config.active_channel_id.clone(),
        }
    }
}

/// Browser-style numeric coercion: trimmed empty input is 0, anything
/// that does not parse is NaN.
fn to_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn non_blank(raw: &str, fallback: impl FnOnce() -> String) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback()
    } else {
        trimmed.to_string()
    }
}
