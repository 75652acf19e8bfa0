//! Shared test helpers: an in-memory session backend
//!
//! Each session's state lives in a shared vector so tests can inspect it
//! after the engine has taken ownership of the session.

#![allow(dead_code)]

use encore_playback::{
    AudioSession, PlaybackConfig, PlaybackError, PlaybackManager, Result, SessionBackend,
    SessionNotifier, SessionRequest, Track,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct MockSessionState {
    pub url: String,
    pub alive: bool,
    pub playing: bool,
    pub position: f64,
    pub volume: f32,
    pub notifier: SessionNotifier,
}

/// Backend that records every session it opens
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    sessions: Arc<Mutex<Vec<MockSessionState>>>,
    failing_urls: Arc<Mutex<HashSet<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to load `url` from now on
    pub fn fail_url(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_string());
    }

    pub fn opened(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn live_count(&self) -> usize {
        self.sessions.lock().unwrap().iter().filter(|s| s.alive).count()
    }

    pub fn last(&self) -> MockSessionState {
        self.sessions.lock().unwrap().last().cloned().unwrap()
    }

    pub fn session(&self, index: usize) -> MockSessionState {
        self.sessions.lock().unwrap()[index].clone()
    }

    /// Move the clock of the most recent session
    pub fn set_position(&self, position: f64) {
        if let Some(s) = self.sessions.lock().unwrap().last_mut() {
            s.position = position;
        }
    }
}

struct MockSession {
    index: usize,
    sessions: Arc<Mutex<Vec<MockSessionState>>>,
}

impl MockSession {
    fn with<R>(&self, f: impl FnOnce(&mut MockSessionState) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap();
        f(&mut sessions[self.index])
    }
}

impl AudioSession for MockSession {
    fn play(&mut self) -> Result<()> {
        self.with(|s| s.playing = true);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.with(|s| s.playing = false);
        Ok(())
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        self.with(|s| s.position = position);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.with(|s| s.volume = volume);
        Ok(())
    }

    fn position(&self) -> f64 {
        self.with(|s| s.position)
    }

    fn is_playing(&self) -> bool {
        self.with(|s| s.playing)
    }

    fn unload(&mut self) {
        self.with(|s| {
            s.alive = false;
            s.playing = false;
        });
    }
}

impl SessionBackend for MockBackend {
    fn load(&mut self, request: SessionRequest) -> Result<Box<dyn AudioSession>> {
        if self.failing_urls.lock().unwrap().contains(&request.url) {
            return Err(PlaybackError::Session(format!(
                "cannot decode {}",
                request.url
            )));
        }

        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(MockSessionState {
            url: request.url,
            alive: true,
            playing: false,
            position: 0.0,
            volume: request.volume,
            notifier: request.notifier,
        });

        Ok(Box::new(MockSession {
            index: sessions.len() - 1,
            sessions: self.sessions.clone(),
        }))
    }
}

pub fn create_test_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id.to_uppercase()),
        artist_name: "Test Artist".to_string(),
        audio_url: format!("https://cdn.example.com/{}.mp3", id),
        cover_image_url: Some(format!("https://cdn.example.com/{}.jpg", id)),
        duration: 180.0,
    }
}

/// Route engine logs to the test harness (`RUST_LOG=encore_playback=debug`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Manager with a deterministic shuffle seed
pub fn create_manager() -> (PlaybackManager, MockBackend) {
    init_tracing();
    let backend = MockBackend::new();
    let config = PlaybackConfig {
        shuffle_seed: Some(42),
        ..Default::default()
    };
    (PlaybackManager::new(backend.clone(), config), backend)
}

/// Report the latest session ready with `duration` and apply it
pub fn make_ready(manager: &mut PlaybackManager, backend: &MockBackend, duration: f64) {
    backend.last().notifier.ready(duration);
    manager.poll_events();
}

/// Report natural end of the latest session and apply it
pub fn finish_track(manager: &mut PlaybackManager, backend: &MockBackend) {
    backend.last().notifier.ended();
    manager.poll_events();
}

pub fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}
