//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Track descriptor supplied by the catalog, search results or playlists
///
/// Treated as a read-only value by the engine. `duration` is the catalog's
/// nominal length in seconds; the decoder-reported duration replaces it in
/// [`PlayerState`] once the session is ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist display name
    pub artist_name: String,

    /// Locator handed to the session backend
    pub audio_url: String,

    /// Cover art locator (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    /// Nominal duration in seconds
    pub duration: f64,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the toggle cycle: Off -> All -> One -> Off
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Externally visible player snapshot
///
/// Owned copy handed to observers; mutating it has no effect on the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Currently loaded track
    pub current_track: Option<Track>,

    /// Pending tracks, in play order
    pub queue: Vec<Track>,

    /// Whether the session is producing audio
    pub is_playing: bool,

    /// Stored volume level (0.0-1.0), kept across track changes
    pub volume: f32,

    /// Whether output is muted (volume level preserved)
    pub muted: bool,

    /// Playback position in seconds, within `0..=duration` (0 until ready)
    pub position: f64,

    /// Decoder-reported duration in seconds (0 until the session is ready)
    pub duration: f64,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// Whether `next` picks randomly from the queue
    pub shuffle: bool,
}

impl PlayerState {
    /// Empty state with the given initial volume and modes
    pub fn new(volume: f32, repeat_mode: RepeatMode, shuffle: bool) -> Self {
        Self {
            current_track: None,
            queue: Vec::new(),
            is_playing: false,
            volume,
            muted: false,
            position: 0.0,
            duration: 0.0,
            repeat_mode,
            shuffle,
        }
    }

    /// Fraction of the track played (0.0-1.0), 0 while duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Position formatted for display (`m:ss`)
    pub fn position_label(&self) -> String {
        format_time(self.position)
    }

    /// Duration formatted for display (`m:ss`)
    pub fn duration_label(&self) -> String {
        format_time(self.duration)
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(0.7, RepeatMode::Off, false)
    }
}

/// Format seconds as `m:ss`
///
/// Non-finite and non-positive values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
