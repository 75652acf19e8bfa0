//! Player Events
//!
//! Event-based communication for UI synchronization. Observers subscribe
//! and receive every event published after subscription; they read full
//! state through `PlaybackManager::snapshot`.

use crate::types::{RepeatMode, Track};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Current track changed (None after stop)
    TrackChanged { track: Option<Track> },

    /// Playing flag flipped
    PlaybackStateChanged { is_playing: bool },

    /// Position moved (sampling tick, seek or restart)
    PositionChanged { position: f64, duration: f64 },

    /// Decoder reported the authoritative duration
    DurationChanged { duration: f64 },

    /// Volume level or mute changed
    VolumeChanged { volume: f32, muted: bool },

    /// Queue contents changed
    QueueChanged { length: usize },

    RepeatModeChanged { mode: RepeatMode },

    ShuffleChanged { enabled: bool },

    /// A track could not be loaded; the UI may offer to skip
    LoadFailed { track_id: String, reason: String },

    /// Queue exhausted, transport stopped
    PlaybackEnded,
}

/// Events buffered per subscriber before new ones are dropped
pub const SUBSCRIBER_CAPACITY: usize = 256;

/// Subscriber registry
///
/// Each subscriber owns a bounded channel. A subscriber that falls behind
/// misses events until it drains its channel; subscribers whose receiver
/// was dropped are removed on the next publish.
#[derive(Debug, Default)]
pub struct Observers {
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = bounded(SUBSCRIBER_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber
    pub fn publish(&mut self, event: &PlayerEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
                Ok(()) | Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
