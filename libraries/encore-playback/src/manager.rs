//! Playback manager - core orchestration
//!
//! Owns the single audio session and the player snapshot, and executes
//! transport, queue and mode operations.

use crate::{
    config::PlaybackConfig,
    error::{PlaybackError, Result},
    events::{Observers, PlayerEvent},
    history::History,
    queue::Queue,
    sampler::PositionSampler,
    session::{
        AudioSession, SessionBackend, SessionEvent, SessionId, SessionNotifier, SessionRequest,
    },
    shuffle::ShufflePicker,
    types::{PlayerState, RepeatMode, Track},
    volume::Volume,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The live session and the id its events are tagged with
struct ActiveSession {
    id: SessionId,
    handle: Box<dyn AudioSession>,
}

/// Central playback management
///
/// One instance per application, owned by the application root and shared
/// by reference (or `Arc<Mutex<_>>` together with a [`crate::Ticker`]).
/// Guarantees:
/// - At most one audio session is alive; the previous one is unloaded
///   before the next is opened.
/// - Session events from replaced sessions are ignored.
/// - Control calls never fail on misuse; only load failures are errors.
pub struct PlaybackManager {
    // Session
    backend: Box<dyn SessionBackend>,
    session: Option<ActiveSession>,
    next_session_id: u64,
    session_tx: Sender<(SessionId, SessionEvent)>,
    session_rx: Receiver<(SessionId, SessionEvent)>,

    // Snapshot
    current_track: Option<Track>,
    is_playing: bool,
    position: f64,
    duration: f64,

    // Queue and history
    queue: Queue,
    history: History,

    // Settings
    volume: Volume,
    repeat: RepeatMode,
    shuffle: bool,
    picker: ShufflePicker,
    previous_restart_secs: f64,

    sampler: PositionSampler,
    observers: Observers,
}

impl PlaybackManager {
    /// Create new playback manager
    pub fn new(backend: impl SessionBackend + 'static, config: PlaybackConfig) -> Self {
        let (session_tx, session_rx) = unbounded();

        Self {
            backend: Box::new(backend),
            session: None,
            next_session_id: 1,
            session_tx,
            session_rx,
            current_track: None,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            queue: Queue::new(),
            history: History::new(config.history_size),
            volume: Volume::new(config.volume),
            repeat: config.repeat,
            shuffle: config.shuffle,
            picker: ShufflePicker::new(config.shuffle_seed),
            previous_restart_secs: config.previous_restart_secs(),
            sampler: PositionSampler::new(config.position_interval()),
            observers: Observers::new(),
        }
    }

    /// Create a manager with default configuration
    pub fn with_backend(backend: impl SessionBackend + 'static) -> Self {
        Self::new(backend, PlaybackConfig::default())
    }

    // ===== Playback Control =====

    /// Load and start playing `track`
    ///
    /// Any active session is unloaded first. A non-empty `queue` replaces
    /// the current queue; otherwise the queue is kept. Duration stays 0
    /// until the backend reports the session ready.
    pub fn play_track(&mut self, track: Track, queue: Option<Vec<Track>>) -> Result<()> {
        if let Some(tracks) = queue.filter(|tracks| !tracks.is_empty()) {
            self.queue.replace(tracks);
            self.emit_queue_changed();
        }
        self.start_track(track, true)
    }

    /// Resume a paused session
    pub fn play(&mut self) {
        let Some(active) = self.session.as_mut() else {
            return;
        };
        if self.is_playing {
            return;
        }
        match active.handle.play() {
            Ok(()) => self.set_playing(true),
            Err(e) => warn!(session = %active.id, "Failed to resume session: {}", e),
        }
    }

    /// Pause the active session
    pub fn pause(&mut self) {
        let Some(active) = self.session.as_mut() else {
            return;
        };
        if !self.is_playing {
            return;
        }
        match active.handle.pause() {
            Ok(()) => self.set_playing(false),
            Err(e) => warn!(session = %active.id, "Failed to pause session: {}", e),
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop playback
    ///
    /// Unloads the session and clears the current track (but not the queue).
    pub fn stop(&mut self) {
        let had_track = self.current_track.is_some();
        self.release_session();
        self.current_track = None;
        self.set_playing(false);
        self.position = 0.0;
        self.duration = 0.0;
        if had_track {
            info!("Playback stopped");
            self.emit(PlayerEvent::TrackChanged { track: None });
        }
    }

    /// Skip to next track
    ///
    /// Takes the queue head (or a random entry when shuffling). With repeat
    /// all, the finished track goes to the queue tail, and an empty queue
    /// replays the current track. Otherwise an empty queue ends playback.
    pub fn next(&mut self) -> Result<()> {
        let picked = if self.shuffle {
            self.picker
                .pick(self.queue.len())
                .and_then(|index| self.queue.remove(index))
        } else {
            self.queue.pop_front()
        };

        match picked {
            Some(track) => self.advance_to(track),
            None => {
                if self.repeat == RepeatMode::All {
                    if let Some(current) = self.current_track.clone() {
                        debug!(track_id = %current.id, "Queue empty, repeating current track");
                        return self.start_track(current, false);
                    }
                }
                self.end_playback();
                Ok(())
            }
        }
    }

    /// Go to previous track
    ///
    /// If more than the restart threshold (3s by default) has elapsed,
    /// restarts the current track. Otherwise steps back through play
    /// history, returning the current track to the head of the queue. With
    /// no history the current track restarts. Under repeat all, the copy of
    /// the history entry that advancing appended to the tail is taken back
    /// out so the rotation keeps its length.
    pub fn previous(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Ok(());
        }

        if self.live_position() > self.previous_restart_secs {
            return self.restart_current();
        }

        debug!(history = self.history.len(), "Stepping back");
        match self.history.pop() {
            Some(previous) => {
                if self.repeat == RepeatMode::All {
                    self.queue.pop_back_if(&previous.id);
                }
                if let Some(current) = self.current_track.take() {
                    self.queue.push_front(current);
                    self.emit_queue_changed();
                }
                self.start_track(previous, false)
            }
            None => self.restart_current(),
        }
    }

    /// Play the queue entry at `index`, dropping the entries before it
    ///
    /// Returns `Ok(false)` without changes if the index is out of range.
    pub fn skip_to(&mut self, index: usize) -> Result<bool> {
        match self.queue.skip_to(index) {
            Some(track) => self.advance_to(track).map(|()| true),
            None => Ok(false),
        }
    }

    // ===== Seek =====

    /// Seek to `time` seconds
    ///
    /// Clamped to `[0, duration]`; non-finite input seeks to 0. The
    /// snapshot position updates immediately.
    pub fn seek(&mut self, time: f64) {
        let Some(active) = self.session.as_mut() else {
            return;
        };
        let target = clamp_position(time, self.duration);
        if let Err(e) = active.handle.seek(target) {
            warn!(session = %active.id, "Seek failed: {}", e);
        }
        self.position = target;
        self.emit_position_changed();
    }

    /// Seek to a fraction (0.0-1.0) of the track
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(fraction * self.duration);
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0, clamped)
    ///
    /// Kept across track changes; applied to the live session if any.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume.set_level(volume);
        self.apply_gain();
        self.emit_volume_changed();
    }

    /// Mute audio
    pub fn mute(&mut self) {
        if !self.volume.is_muted() {
            self.volume.mute();
            self.apply_gain();
            self.emit_volume_changed();
        }
    }

    /// Unmute audio
    pub fn unmute(&mut self) {
        if self.volume.is_muted() {
            self.volume.unmute();
            self.apply_gain();
            self.emit_volume_changed();
        }
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
        self.emit_volume_changed();
    }

    // ===== Queue Management =====

    /// Append track to the end of the queue
    pub fn add_to_queue(&mut self, track: Track) {
        self.queue.push_back(track);
        self.emit_queue_changed();
    }

    /// Insert track at the head of the queue
    pub fn play_next(&mut self, track: Track) {
        self.queue.push_front(track);
        self.emit_queue_changed();
    }

    /// Remove track from queue by index
    ///
    /// Out-of-range indices are ignored.
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Track> {
        let removed = self.queue.remove(index);
        if removed.is_some() {
            self.emit_queue_changed();
        }
        removed
    }

    /// Move a queue entry; returns `false` if either index is out of range
    pub fn move_in_queue(&mut self, from: usize, to: usize) -> bool {
        let moved = self.queue.move_track(from, to);
        if moved && from != to {
            self.emit_queue_changed();
        }
        moved
    }

    /// Clear the queue; the current track keeps playing
    pub fn clear_queue(&mut self) {
        if !self.queue.is_empty() {
            self.queue.clear();
            self.emit_queue_changed();
        }
    }

    // ===== Shuffle & Repeat =====

    /// Cycle repeat mode: Off -> All -> One -> Off
    pub fn toggle_repeat(&mut self) {
        self.set_repeat(self.repeat.cycle());
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat != mode {
            self.repeat = mode;
            self.emit(PlayerEvent::RepeatModeChanged { mode });
        }
    }

    /// Flip shuffle; the queue order itself is left alone
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffle != enabled {
            self.shuffle = enabled;
            self.emit(PlayerEvent::ShuffleChanged { enabled });
        }
    }

    // ===== Session Events =====

    /// Drain and apply pending session events
    ///
    /// Returns the number of events received (stale ones included).
    pub fn poll_events(&mut self) -> usize {
        let pending: Vec<_> = self.session_rx.try_iter().collect();
        let count = pending.len();
        for (id, event) in pending {
            self.handle_session_event(id, event);
        }
        count
    }

    /// Apply one session event
    ///
    /// Events for any session other than the bound one are dropped.
    pub fn handle_session_event(&mut self, id: SessionId, event: SessionEvent) {
        if self.session_id() != Some(id) {
            debug!(session = %id, ?event, "Ignoring event from stale session");
            return;
        }

        match event {
            SessionEvent::Ready { duration } => {
                if !duration.is_finite() || duration < 0.0 {
                    warn!(session = %id, duration, "Backend reported invalid duration");
                    return;
                }
                debug!(session = %id, duration, "Session ready");
                self.duration = duration;
                self.position = self.position.min(duration);
                self.emit(PlayerEvent::DurationChanged { duration });
            }
            SessionEvent::Ended => {
                debug!(session = %id, repeat = ?self.repeat, "Track ended");
                self.handle_track_ended();
            }
            SessionEvent::LoadFailed { reason } => {
                let track_id = self
                    .current_track
                    .as_ref()
                    .map(|t| t.id.clone())
                    .unwrap_or_default();
                self.fail_load(&track_id, &reason);
            }
        }
    }

    /// Periodic driver: apply session events, then sample the position
    ///
    /// Call at least every position interval (see [`crate::Ticker`]). The
    /// position is only sampled while playing, so it stays frozen while
    /// paused, and it is held at 0 until the session reports its duration.
    pub fn tick(&mut self, now: Instant) {
        self.poll_events();

        if !self.is_playing {
            return;
        }
        let Some(active) = self.session.as_ref() else {
            return;
        };
        if self.sampler.poll(active.id, now) {
            self.position = clamp_position(active.handle.position(), self.duration);
            self.emit_position_changed();
        }
    }

    // ===== State Queries =====

    /// Owned snapshot of the player state
    pub fn snapshot(&self) -> PlayerState {
        PlayerState {
            current_track: self.current_track.clone(),
            queue: self.queue.tracks().to_vec(),
            is_playing: self.is_playing,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            position: self.position,
            duration: self.duration,
            repeat_mode: self.repeat,
            shuffle: self.shuffle,
        }
    }

    /// Subscribe to player events
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let rx = self.observers.subscribe();
        debug!(subscribers = self.observers.len(), "Observer subscribed");
        rx
    }

    /// Whether `next` would start another track
    pub fn has_next(&self) -> bool {
        !self.queue.is_empty()
            || (self.repeat == RepeatMode::All && self.current_track.is_some())
    }

    /// Whether play history has an entry to step back to
    ///
    /// `previous` still restarts the current track instead once more than
    /// the restart threshold has elapsed.
    pub fn has_previous(&self) -> bool {
        !self.history.is_empty()
    }

    /// The track `next` will play, if it is predictable
    ///
    /// `None` while shuffling with more than one candidate.
    pub fn peek_next(&self) -> Option<&Track> {
        if self.shuffle && self.queue.len() > 1 {
            return None;
        }
        self.queue.get(0).or_else(|| {
            if self.repeat == RepeatMode::All {
                self.current_track.as_ref()
            } else {
                None
            }
        })
    }

    /// Forget play history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    /// Play history, oldest first
    pub fn history(&self) -> Vec<&Track> {
        self.history.iter().collect()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Id of the bound session, if one is alive
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Position sampling interval
    pub fn position_interval(&self) -> Duration {
        self.sampler.interval()
    }

    // ===== Internals =====

    /// Unload the current session and open one for `track`
    ///
    /// `remember_current` pushes the outgoing track to history.
    fn start_track(&mut self, track: Track, remember_current: bool) -> Result<()> {
        self.release_session();

        if remember_current {
            if let Some(previous) = self.current_track.take() {
                self.history.push(previous);
            }
        }

        let id = SessionId::new(self.next_session_id);
        self.next_session_id += 1;

        self.current_track = Some(track.clone());
        self.position = 0.0;
        self.duration = 0.0;
        self.emit(PlayerEvent::TrackChanged {
            track: Some(track.clone()),
        });

        let request = SessionRequest {
            url: track.audio_url.clone(),
            volume: self.volume.gain(),
            notifier: SessionNotifier::new(id, self.session_tx.clone()),
        };

        let mut handle = match self.backend.load(request) {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail_load(&track.id, &e.to_string())),
        };

        if let Err(e) = handle.play() {
            handle.unload();
            return Err(self.fail_load(&track.id, &e.to_string()));
        }

        info!(session = %id, track_id = %track.id, url = %track.audio_url, "Started session");
        self.session = Some(ActiveSession { id, handle });
        self.sampler.start(id);
        self.set_playing(true);
        Ok(())
    }

    /// Play `track` as the successor of the current one
    fn advance_to(&mut self, track: Track) -> Result<()> {
        let finished = self.current_track.clone();
        let result = self.start_track(track, true);

        if self.repeat == RepeatMode::All {
            if let Some(finished) = finished {
                self.queue.push_back(finished);
            }
        }
        self.emit_queue_changed();
        result
    }

    /// Rewind the current track, reloading it if its session is gone
    fn restart_current(&mut self) -> Result<()> {
        if let Some(active) = self.session.as_mut() {
            if let Err(e) = active.handle.seek(0.0) {
                warn!(session = %active.id, "Restart failed: {}", e);
            }
            self.position = 0.0;
            self.emit_position_changed();
            return Ok(());
        }

        match self.current_track.clone() {
            Some(track) => self.start_track(track, false),
            None => Ok(()),
        }
    }

    fn handle_track_ended(&mut self) {
        if self.repeat == RepeatMode::One {
            if let Some(active) = self.session.as_mut() {
                match active.handle.restart() {
                    Ok(()) => {
                        self.position = 0.0;
                        self.set_playing(true);
                        self.emit_position_changed();
                    }
                    Err(e) => {
                        warn!(session = %active.id, "Repeat-one restart failed: {}", e);
                        self.set_playing(false);
                    }
                }
            }
            return;
        }

        if let Err(e) = self.next() {
            warn!("Advancing after track end failed: {}", e);
        }
    }

    /// Queue exhausted: release the session, keep the last track visible
    fn end_playback(&mut self) {
        let had_session = self.session.is_some();
        self.release_session();
        self.set_playing(false);
        self.position = 0.0;
        self.duration = 0.0;
        if had_session {
            info!("Queue exhausted, playback ended");
            self.emit(PlayerEvent::PlaybackEnded);
        }
    }

    /// Put the engine in the load-failed state and build the error
    fn fail_load(&mut self, track_id: &str, reason: &str) -> PlaybackError {
        warn!(track_id, reason, "Failed to load track");
        self.release_session();
        self.set_playing(false);
        self.position = 0.0;
        self.duration = 0.0;
        self.emit(PlayerEvent::LoadFailed {
            track_id: track_id.to_string(),
            reason: reason.to_string(),
        });
        PlaybackError::LoadFailed {
            track_id: track_id.to_string(),
            reason: reason.to_string(),
        }
    }

    fn release_session(&mut self) {
        if let Some(mut active) = self.session.take() {
            active.handle.unload();
            debug!(session = %active.id, "Released session");
        }
        self.sampler.stop();
    }

    fn live_position(&self) -> f64 {
        self.session
            .as_ref()
            .map(|s| s.handle.position())
            .unwrap_or(self.position)
    }

    fn apply_gain(&mut self) {
        let gain = self.volume.gain();
        if let Some(active) = self.session.as_mut() {
            if let Err(e) = active.handle.set_volume(gain) {
                warn!(session = %active.id, "Failed to apply volume: {}", e);
            }
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.emit(PlayerEvent::PlaybackStateChanged {
                is_playing: playing,
            });
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        if self.observers.is_empty() {
            return;
        }
        self.observers.publish(&event);
    }

    fn emit_position_changed(&mut self) {
        self.emit(PlayerEvent::PositionChanged {
            position: self.position,
            duration: self.duration,
        });
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }
}

/// Clamp a requested position into `[0, upper]`; non-finite input maps to 0
fn clamp_position(time: f64, upper: f64) -> f64 {
    if time.is_finite() {
        time.clamp(0.0, upper.max(0.0))
    } else {
        0.0
    }
}
