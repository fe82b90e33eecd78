//! Animation index sequencing
//!
//! Frame lists are expanded up front ("ping-ponged") so a sequencer only
//! ever walks forward and resets; it never mirrors a range.

use serde::{Deserialize, Serialize};

/// Which way a sprite is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Sequencer behavior on top of the shared forward-walking index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SequencerMode {
    /// Walk `[0, len)` and reset to 0 on overflow
    Looping,
    /// Right-facing walks `[0, boundary)`, left-facing walks `[boundary, 2·boundary)`
    Facing { boundary: usize },
    /// Like `Looping`, but each reset flips the vertical sweep direction
    Oscillating { rising: bool },
}

/// Result of advancing a sequencer by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    /// Index into the frame list to display
    pub frame: usize,
    /// The index wrapped back to the start of its range this tick
    pub looped: bool,
}

/// Fractional frame index driven once per tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequencer {
    index: f32,
    speed: f32,
    len: usize,
    mode: SequencerMode,
}

impl Sequencer {
    /// Forward-only loop over a frame list of length `len`
    pub fn looping(len: usize, speed: f32) -> Self {
        Self {
            index: 0.0,
            speed,
            len: len.max(1),
            mode: SequencerMode::Looping,
        }
    }

    /// Player sequencer over a `facing_ping_pong(base_frames)` list
    pub fn facing(base_frames: usize, speed: f32) -> Self {
        let boundary = facing_boundary(base_frames);
        Self {
            index: 0.0,
            speed,
            len: boundary * 2,
            mode: SequencerMode::Facing { boundary },
        }
    }

    /// Loop that alternates an up/down sweep every cycle
    pub fn oscillating(len: usize, speed: f32) -> Self {
        Self {
            index: 0.0,
            speed,
            len: len.max(1),
            mode: SequencerMode::Oscillating { rising: true },
        }
    }

    /// Advance one tick and return the frame to render.
    ///
    /// `facing` only matters for the `Facing` mode; a change of facing
    /// clamps the index into the new sub-range in the same tick, so the
    /// returned frame already belongs to the new walking cycle.
    pub fn advance(&mut self, facing: Facing) -> FrameStep {
        self.index += self.speed;
        let len = self.len as f32;
        let mut looped = false;

        match &mut self.mode {
            SequencerMode::Looping => {
                if self.index >= len {
                    self.index = 0.0;
                    looped = true;
                }
            }
            SequencerMode::Oscillating { rising } => {
                if self.index >= len {
                    self.index = 0.0;
                    *rising = !*rising;
                    looped = true;
                }
            }
            SequencerMode::Facing { boundary } => {
                let b = *boundary as f32;
                match facing {
                    Facing::Right => {
                        if self.index >= b {
                            self.index = 0.0;
                            looped = true;
                        }
                    }
                    Facing::Left => {
                        if self.index < b {
                            self.index = b;
                        } else if self.index >= b * 2.0 {
                            self.index = b;
                            looped = true;
                        }
                    }
                }
            }
        }

        FrameStep {
            frame: self.frame(),
            looped,
        }
    }

    /// Integer part of the index, clamped into the frame list
    pub fn frame(&self) -> usize {
        (self.index.max(0.0) as usize).min(self.len - 1)
    }

    /// Current fractional index
    pub fn index(&self) -> f32 {
        self.index
    }

    /// Length of the frame list this sequencer walks
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Vertical sweep direction; always `true` outside `Oscillating`
    pub fn rising(&self) -> bool {
        match self.mode {
            SequencerMode::Oscillating { rising } => rising,
            _ => true,
        }
    }

    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) {
        self.index = 0.0;
        if let SequencerMode::Oscillating { rising } = &mut self.mode {
            *rising = true;
        }
    }
}

/// Split point between the right- and left-facing halves of a player sheet
pub fn facing_boundary(base_frames: usize) -> usize {
    (base_frames * 2).saturating_sub(2).max(1)
}

/// Image numbers `1..=n, n-1..=2` (1-based, as stored on disk)
pub fn ping_pong(base_frames: usize) -> Vec<u16> {
    let n = base_frames as u16;
    (1..=n).chain((2..n).rev()).collect()
}

/// Player sheet order: right cycle `1..=n..2`, then left cycle `n+1..=2n..n+2`.
///
/// A single-frame sheet has one image per facing: `[1, 2]`.
pub fn facing_ping_pong(base_frames: usize) -> Vec<u16> {
    let n = base_frames as u16;
    if n <= 1 {
        return vec![1, 2];
    }
    (1..=n)
        .chain((2..n).rev())
        .chain(n + 1..=2 * n)
        .chain((n + 2..2 * n).rev())
        .collect()
}
