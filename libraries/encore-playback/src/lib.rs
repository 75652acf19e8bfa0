//! Encore - Playback Engine
//!
//! Platform-agnostic playback core for the Encore music app.
//!
//! This crate provides:
//! - Single-session playback (at most one audio session alive)
//! - Upcoming-track queue with play-next, reorder and skip-to
//! - Play history for "previous"
//! - Shuffle (random pick from the queue) and repeat modes (Off, All, One)
//! - Seek by time or fraction, volume with mute
//! - Position sampling and event subscription for UI sync
//!
//! # Architecture
//!
//! The engine never touches audio hardware or the network. A host platform
//! implements [`SessionBackend`] to open an [`AudioSession`] for a track
//! URL, and reports readiness, end of track and load failures through the
//! [`SessionNotifier`] it is handed. The engine applies those events on
//! [`PlaybackManager::tick`], which a host drives from its own timer or via
//! [`spawn_ticker`].
//!
//! # Example
//!
//! ```rust
//! use encore_playback::{
//!     AudioSession, PlaybackManager, RepeatMode, Result, SessionBackend, SessionRequest, Track,
//! };
//!
//! struct SilentSession {
//!     playing: bool,
//!     position: f64,
//! }
//!
//! impl AudioSession for SilentSession {
//!     fn play(&mut self) -> Result<()> {
//!         self.playing = true;
//!         Ok(())
//!     }
//!     fn pause(&mut self) -> Result<()> {
//!         self.playing = false;
//!         Ok(())
//!     }
//!     fn seek(&mut self, position: f64) -> Result<()> {
//!         self.position = position;
//!         Ok(())
//!     }
//!     fn set_volume(&mut self, _volume: f32) -> Result<()> {
//!         Ok(())
//!     }
//!     fn position(&self) -> f64 {
//!         self.position
//!     }
//!     fn is_playing(&self) -> bool {
//!         self.playing
//!     }
//!     fn unload(&mut self) {
//!         self.playing = false;
//!     }
//! }
//!
//! struct SilentBackend;
//!
//! impl SessionBackend for SilentBackend {
//!     fn load(&mut self, request: SessionRequest) -> Result<Box<dyn AudioSession>> {
//!         request.notifier.ready(180.0);
//!         Ok(Box::new(SilentSession { playing: false, position: 0.0 }))
//!     }
//! }
//!
//! let mut manager = PlaybackManager::with_backend(SilentBackend);
//! manager.set_repeat(RepeatMode::All);
//!
//! let track = Track {
//!     id: "t1".to_string(),
//!     title: "Song".to_string(),
//!     artist_name: "Artist".to_string(),
//!     audio_url: "https://cdn.example.com/t1.mp3".to_string(),
//!     cover_image_url: None,
//!     duration: 180.0,
//! };
//!
//! manager.play_track(track, None)?;
//! manager.poll_events();
//! assert!(manager.is_playing());
//! assert_eq!(manager.duration(), 180.0);
//! # Ok::<(), encore_playback::PlaybackError>(())
//! ```

pub mod config;
mod error;
pub mod events;
mod history;
mod manager;
mod queue;
mod sampler;
pub mod session;
mod shuffle;
mod ticker;
pub mod types;
mod volume;

// Public exports
pub use config::PlaybackConfig;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use manager::PlaybackManager;
pub use session::{
    AudioSession, SessionBackend, SessionEvent, SessionId, SessionNotifier, SessionRequest,
};
pub use ticker::{spawn_ticker, Ticker};
pub use types::{format_time, PlayerState, RepeatMode, Track};
