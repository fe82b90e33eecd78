//! Audio via the terminal bell
//!
//! Sound effects are fire-and-forget: `play` queues an effect and the
//! frontend flushes the queue once per frame. A terminal has one voice,
//! so a frame rings the bell at most once no matter how many effects
//! were queued. Quiet effects only ring at high volume.

use std::io::Write;

use crate::settings::Settings;
use crate::sim::tick::{GameEvent, TickReport};

/// ASCII BEL
const BELL: &[u8] = b"\x07";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Mode button pressed
    Select,
    /// Pause toggled either way
    Pause,
    /// An obstacle wrapped and scored
    Score,
    /// An obstacle hit the player
    Hit,
    /// Health ran out
    GameOver,
}

impl SoundEffect {
    /// Lowest effective volume at which the effect is audible
    fn threshold(&self) -> f32 {
        match self {
            SoundEffect::Score => 0.9,
            SoundEffect::Select | SoundEffect::Pause => 0.5,
            SoundEffect::Hit | SoundEffect::GameOver => 0.05,
        }
    }

    /// Effects a tick should produce, in event order
    pub fn for_report(report: &TickReport) -> Vec<SoundEffect> {
        report
            .events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Paused | GameEvent::Resumed => Some(SoundEffect::Pause),
                GameEvent::ObstacleWrapped { .. } => Some(SoundEffect::Score),
                GameEvent::ObstacleHit { .. } => Some(SoundEffect::Hit),
                GameEvent::GameOver => Some(SoundEffect::GameOver),
                GameEvent::LabelContact(_) => None,
            })
            .collect()
    }
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    pending: Vec<SoundEffect>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pending: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a sound effect if it is audible at the current volume
    pub fn play(&mut self, effect: SoundEffect) {
        if self.effective_volume() >= effect.threshold() {
            self.pending.push(effect);
        }
    }

    /// Queue every effect a tick produced
    pub fn play_report(&mut self, report: &TickReport) {
        for effect in SoundEffect::for_report(report) {
            self.play(effect);
        }
    }

    pub fn pending(&self) -> &[SoundEffect] {
        &self.pending
    }

    /// Ring the bell once if anything is queued, then clear the queue.
    /// Returns whether the bell rang.
    pub fn flush(&mut self, out: &mut impl Write) -> std::io::Result<bool> {
        if self.pending.is_empty() {
            return Ok(false);
        }
        self.pending.clear();
        out.write_all(BELL)?;
        Ok(true)
    }
}
