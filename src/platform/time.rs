//! Frame pacing
//!
//! One simulation tick per frame; the clock sleeps off whatever is left of
//! the frame budget after input, update and render.

use std::time::{Duration, Instant};

/// Frames averaged for the FPS readout
const FPS_WINDOW: u32 = 30;

#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    frame_start: Instant,
    window_start: Instant,
    window_frames: u32,
    measured_fps: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new(budget: Duration) -> Self {
        let now = Instant::now();
        Self {
            budget,
            frame_start: now,
            window_start: now,
            window_frames: 0,
            measured_fps: 0.0,
            frames: 0,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    /// Mark the start of a frame
    pub fn begin(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleep until the frame budget is used up
    pub fn finish(&mut self) {
        let wait = remaining(self.budget, self.frame_start.elapsed());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }

        self.frames += 1;
        self.window_frames += 1;
        if self.window_frames >= FPS_WINDOW {
            let secs = self.window_start.elapsed().as_secs_f32();
            if secs > 0.0 {
                self.measured_fps = self.window_frames as f32 / secs;
            }
            self.window_start = Instant::now();
            self.window_frames = 0;
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average over the last full window (0 until one completes)
    pub fn measured_fps(&self) -> f32 {
        self.measured_fps
    }
}

/// Time left in a frame after `elapsed` has been spent
pub fn remaining(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}
