//! Playback queue
//!
//! Ordered list of tracks waiting to play. The current track is never an
//! implicit member; `next` takes tracks out explicitly.
//!
//! ```text
//! Currently Playing: Track A      (owned by the manager)
//! ─────────────────────────────
//! Queue:
//!   0. Track B   <- sequential next
//!   1. Track C
//!   2. Track D
//! ```

use crate::types::Track;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Replace the whole queue
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Append track to the tail
    pub fn push_back(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Insert track at the head (plays next)
    pub fn push_front(&mut self, track: Track) {
        self.tracks.insert(0, track);
    }

    /// Take the head of the queue
    pub fn pop_front(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.tracks.remove(0))
        }
    }

    /// Remove track by index
    ///
    /// Returns `None` if the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Move track from `from` to `to`
    ///
    /// Returns `false` (queue untouched) if either index is out of range.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let track = self.tracks.remove(from);
            self.tracks.insert(to, track);
        }
        true
    }

    /// Drop the tracks before `index` and take the one at `index`
    pub fn skip_to(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.tracks.drain(..index);
        self.pop_front()
    }

    /// Take the tail entry if it is the track with `id`
    pub fn pop_back_if(&mut self, id: &str) -> Option<Track> {
        if self.tracks.last().is_some_and(|t| t.id == id) {
            self.tracks.pop()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
