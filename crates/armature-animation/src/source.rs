//! Pose sources: anything a blend-tree leaf can sample

use crate::clip::SkeletalClip;
use crate::pose::Pose;

/// A time-parameterized pose producer.
///
/// Leaves of a blend tree hold one of these behind an `Arc`, so several trees
/// can share a single loaded clip.
pub trait PoseSource: Send + Sync {
    fn name(&self) -> &str;

    /// Length in seconds
    fn duration(&self) -> f64;

    /// Sample the pose at `time` seconds
    fn sample_pose(&self, time: f64) -> Pose;
}

impl PoseSource for SkeletalClip {
    fn name(&self) -> &str {
        &self.name
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn sample_pose(&self, time: f64) -> Pose {
        self.sample(time)
    }
}

/// A source that always yields the same pose
#[derive(Debug, Clone)]
pub struct StaticPose {
    pub name: String,
    pub pose: Pose,
}

impl StaticPose {
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose,
        }
    }
}

impl PoseSource for StaticPose {
    fn name(&self) -> &str {
        &self.name
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn sample_pose(&self, _time: f64) -> Pose {
        self.pose.clone()
    }
}
