//! Platform-agnostic audio session traits
//!
//! The engine never decodes audio itself. A host platform provides a
//! [`SessionBackend`] that turns a track locator into a live
//! [`AudioSession`], and reports asynchronous lifecycle changes (ready,
//! ended, failed) through the [`SessionNotifier`] it was handed.

use crate::error::Result;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one audio session
///
/// Allocated by the engine, strictly increasing. Events tagged with an id
/// other than the currently bound session are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle events reported by a backend
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Resource decoded far enough to know its duration (seconds)
    Ready { duration: f64 },

    /// Playback reached the end of the resource naturally
    Ended,

    /// Resource could not be fetched or decoded
    LoadFailed { reason: String },
}

/// Channel handle a backend uses to report events for one session
///
/// Cheap to clone; safe to move into decoder threads. Sends after the
/// engine is dropped are silently discarded.
#[derive(Debug, Clone)]
pub struct SessionNotifier {
    id: SessionId,
    tx: Sender<(SessionId, SessionEvent)>,
}

impl SessionNotifier {
    pub(crate) fn new(id: SessionId, tx: Sender<(SessionId, SessionEvent)>) -> Self {
        Self { id, tx }
    }

    /// Session this notifier reports for
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Report that the session is ready with its decoded duration
    pub fn ready(&self, duration: f64) {
        self.send(SessionEvent::Ready { duration });
    }

    /// Report natural end of playback
    pub fn ended(&self) {
        self.send(SessionEvent::Ended);
    }

    /// Report that the resource could not be loaded
    pub fn load_failed(&self, reason: impl Into<String>) {
        self.send(SessionEvent::LoadFailed {
            reason: reason.into(),
        });
    }

    /// Send an arbitrary event
    pub fn send(&self, event: SessionEvent) {
        self.tx.send((self.id, event)).ok();
    }
}

/// Everything a backend needs to open a session
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Track locator (`Track::audio_url`)
    pub url: String,

    /// Initial gain (0.0-1.0, already accounts for mute)
    pub volume: f32,

    /// Event channel for this session
    pub notifier: SessionNotifier,
}

/// A live decode/playback handle bound to one track
///
/// Positions are in seconds. The engine calls [`AudioSession::unload`]
/// exactly once before dropping the session.
pub trait AudioSession: Send {
    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Reposition the playback clock
    fn seek(&mut self, position: f64) -> Result<()>;

    /// Set output gain (0.0-1.0)
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Current playback clock
    fn position(&self) -> f64;

    /// Whether output is currently running
    fn is_playing(&self) -> bool;

    /// Stop output and free decode resources
    fn unload(&mut self);

    /// Rewind to the start and play
    fn restart(&mut self) -> Result<()> {
        self.seek(0.0)?;
        self.play()
    }
}

/// Factory for audio sessions, provided by the host platform
pub trait SessionBackend: Send {
    /// Open a session for `request.url`
    ///
    /// May return before the resource is ready; readiness and failures
    /// arrive later through `request.notifier`. Returning `Err` means the
    /// load was refused outright.
    fn load(&mut self, request: SessionRequest) -> Result<Box<dyn AudioSession>>;
}
