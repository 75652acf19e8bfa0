//! Volume control
//!
//! Level is a linear 0.0-1.0 gain passed straight to the audio session.
//! Muting zeroes the gain without losing the level.

#[derive(Debug, Clone)]
pub struct Volume {
    level: f32,
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping the level into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp_level(level),
            muted: false,
        }
    }

    /// Set volume level
    ///
    /// Values outside 0.0-1.0 are clamped; NaN is treated as 0.0.
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp_level(level);
    }

    /// Current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain to apply to the session: 0.0 while muted, otherwise the level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn clamp_level(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.7)
    }
}
