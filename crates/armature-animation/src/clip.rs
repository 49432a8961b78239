//! Skeletal animation clips: keyframe tracks per joint, rotations as quaternions

use crate::pose::Pose;
use crate::sampler::sample_joint_track;
use armature_core::{ArmatureError, JointId, Result, Skeleton, Transform};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keyframe interpolation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Hold the previous keyframe value until the next one
    Step,
    #[default]
    Linear,
}

/// Which joint property a track animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointProperty {
    Translation,
    Rotation,
    Scale,
}

impl JointProperty {
    /// Number of floats in a keyframe value
    pub fn components(self) -> usize {
        match self {
            JointProperty::Rotation => 4,
            JointProperty::Translation | JointProperty::Scale => 3,
        }
    }
}

/// A keyframe for a single joint property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointKeyframe {
    pub time: f64,
    /// 3 floats for translation/scale, 4 for rotation (quaternion xyzw)
    pub value: Vec<f32>,
}

/// A single track targeting one joint's property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointTrack {
    pub joint: JointId,
    pub property: JointProperty,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub keyframes: Vec<JointKeyframe>,
}

/// A complete skeletal animation clip with per-joint tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletalClip {
    pub name: String,
    /// Clip length in seconds. Zero in a file means "derive from the keyframes".
    #[serde(default)]
    pub duration: f64,
    #[serde(default, rename = "tracks")]
    pub joint_tracks: Vec<JointTrack>,
    /// Local transforms the tracks are layered over, keyed by joint
    #[serde(skip)]
    rest: HashMap<JointId, Transform>,
}

impl SkeletalClip {
    pub fn new(name: impl Into<String>, joint_tracks: Vec<JointTrack>) -> Self {
        let mut clip = Self {
            name: name.into(),
            duration: 0.0,
            joint_tracks,
            rest: HashMap::new(),
        };
        clip.duration = clip.last_keyframe_time();
        clip
    }

    /// Time of the latest keyframe across all tracks
    pub fn last_keyframe_time(&self) -> f64 {
        self.joint_tracks
            .iter()
            .filter_map(|t| t.keyframes.last())
            .map(|kf| kf.time)
            .fold(0.0, f64::max)
    }

    /// Joints targeted by at least one track
    pub fn animated_joints(&self) -> Vec<JointId> {
        let mut joints: Vec<JointId> = self.joint_tracks.iter().map(|t| t.joint).collect();
        joints.sort();
        joints.dedup();
        joints
    }

    /// Capture the skeleton's current local transforms as the base for every
    /// animated joint, so components without a track keep their bind value.
    pub fn bind_rest_pose(&mut self, skeleton: &Skeleton) {
        self.rest.clear();
        for joint in self.animated_joints() {
            if skeleton.contains(joint) {
                self.rest.insert(joint, *skeleton.local(joint));
            }
        }
    }

    /// Check track shapes and keyframe ordering; fills in a missing duration.
    pub fn validate(&mut self) -> Result<()> {
        if self.duration < 0.0 {
            return Err(ArmatureError::InvalidClip(format!(
                "Clip '{}' has negative duration: {}",
                self.name, self.duration
            )));
        }

        for (i, track) in self.joint_tracks.iter().enumerate() {
            if track.keyframes.is_empty() {
                return Err(ArmatureError::InvalidClip(format!(
                    "Clip '{}' track {} has no keyframes",
                    self.name, i
                )));
            }
            let expected = track.property.components();
            if let Some(kf) = track.keyframes.iter().find(|kf| kf.value.len() != expected) {
                return Err(ArmatureError::InvalidClip(format!(
                    "Clip '{}' track {} keyframe at {} has {} values, expected {}",
                    self.name,
                    i,
                    kf.time,
                    kf.value.len(),
                    expected
                )));
            }
            if track.keyframes.windows(2).any(|w| w[1].time < w[0].time) {
                return Err(ArmatureError::InvalidClip(format!(
                    "Clip '{}' track {} keyframes are not sorted by time",
                    self.name, i
                )));
            }
        }

        if self.duration == 0.0 {
            self.duration = self.last_keyframe_time();
        }
        Ok(())
    }

    /// Sample every track at `time` into a pose.
    ///
    /// Each animated joint starts from its rest transform (identity if none
    /// was bound) and has the tracked components overwritten.
    pub fn sample(&self, time: f64) -> Pose {
        let mut pose = Pose::with_capacity(self.joint_tracks.len());
        for track in &self.joint_tracks {
            let base = self.rest.get(&track.joint).copied().unwrap_or_default();
            let value = sample_joint_track(track, time);
            let transform = pose.entry_or(track.joint, base);
            match track.property {
                JointProperty::Translation => {
                    transform.position = Vec3::new(value[0], value[1], value[2]);
                }
                JointProperty::Scale => {
                    transform.scale = Vec3::new(value[0], value[1], value[2]);
                }
                JointProperty::Rotation => {
                    transform.rotation =
                        Quat::from_xyzw(value[0], value[1], value[2], value[3]).normalize();
                }
            }
        }
        pose
    }
}
