//! Playback clock and the animator that drives a blend tree

use crate::blend_tree::{BlendNode, BlendOutcome};
use armature_core::Skeleton;

/// Playback time for one animated object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Current playback time in seconds
    pub time: f64,
    /// Playback speed multiplier (1.0 = normal, negative = reverse)
    pub speed: f64,
    pub looping: bool,
    pub playing: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(1.0, true)
    }
}

impl PlaybackState {
    pub fn new(speed: f64, looping: bool) -> Self {
        Self {
            time: 0.0,
            speed,
            looping,
            playing: true,
        }
    }

    /// Advance the clock by `dt` seconds against a clip of `duration`.
    ///
    /// Looping playback wraps; one-shot playback clamps at either end and
    /// stops. A stopped clock does not move.
    pub fn advance(&mut self, dt: f64, duration: f64) {
        if !self.playing {
            return;
        }

        self.time += dt * self.speed;

        if self.looping {
            if duration > 0.0 {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration - (-self.time % duration);
                    if self.time >= duration {
                        self.time = 0.0;
                    }
                }
            } else {
                self.time = 0.0;
            }
        } else if self.time >= duration {
            self.time = duration;
            self.playing = false;
        } else if self.time < 0.0 {
            self.time = 0.0;
            self.playing = false;
        }
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
        self.playing = true;
    }
}

/// Drives a blend tree from a playback clock and writes its pose onto a skeleton.
#[derive(Debug)]
pub struct Animator {
    pub root: BlendNode,
    pub playback: PlaybackState,
}

impl Animator {
    pub fn new(root: BlendNode) -> Self {
        Self {
            root,
            playback: PlaybackState::default(),
        }
    }

    pub fn with_playback(mut self, playback: PlaybackState) -> Self {
        self.playback = playback;
        self
    }

    /// Advance time, produce the root pose, and apply it to `skeleton`.
    pub fn tick(&mut self, dt: f64, skeleton: &mut Skeleton) -> BlendOutcome {
        let duration = self.root.duration();
        self.playback.advance(dt, duration);
        let outcome = self.root.produce_pose(self.playback.time);
        skeleton.apply_locals(self.root.pose());
        outcome
    }
}
