//! Background driver thread
//!
//! Calls [`PlaybackManager::tick`] at the configured position interval so
//! session events are applied and the position is sampled without the host
//! having to run its own timer.

use crate::{error::Result, manager::PlaybackManager};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Handle to a running ticker thread
///
/// The thread stops when the handle is stopped or dropped.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Spawn a thread that ticks `manager` every `interval`
pub fn spawn_ticker(manager: Arc<Mutex<PlaybackManager>>, interval: Duration) -> Result<Ticker> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    let handle = thread::Builder::new()
        .name("encore-ticker".to_string())
        .spawn(move || {
            debug!(?interval, "Ticker started");
            while !stop_flag.load(Ordering::Relaxed) {
                match manager.lock() {
                    Ok(mut manager) => manager.tick(Instant::now()),
                    Err(_) => {
                        warn!("Playback manager lock poisoned, stopping ticker");
                        break;
                    }
                }
                thread::sleep(interval);
            }
            debug!("Ticker stopped");
        })?;

    Ok(Ticker {
        stop,
        handle: Some(handle),
    })
}

impl Ticker {
    /// Whether the thread is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
