//! Clip registry shared by blend trees

use crate::clip::SkeletalClip;
use crate::source::PoseSource;
use armature_core::{ArmatureError, Result, Skeleton};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds all loaded clips by name.
///
/// When a skeleton is bound, every clip is given that skeleton's local
/// transforms as its rest pose, so components a clip does not animate keep
/// their bind values. Leaves share clips through `Arc`, so the skeleton
/// must be bound before a blend tree is built from the library.
#[derive(Default)]
pub struct ClipLibrary {
    clips: HashMap<String, Arc<SkeletalClip>>,
    skeleton: Option<Skeleton>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A library whose clips rest on `skeleton`'s current locals
    pub fn for_skeleton(skeleton: &Skeleton) -> Self {
        let mut library = Self::new();
        library.bind_skeleton(skeleton);
        library
    }

    /// Bind the rest skeleton and rebind clips already registered.
    ///
    /// Clips already handed out to blend-tree leaves are copied rather than
    /// changed in place; those leaves keep sampling the old rest pose.
    pub fn bind_skeleton(&mut self, skeleton: &Skeleton) {
        for clip in self.clips.values_mut() {
            if Arc::strong_count(clip) > 1 {
                log::warn!(
                    "Clip '{}' is shared by a blend tree; rebuild the tree to use the new rest pose",
                    clip.name
                );
            }
            Arc::make_mut(clip).bind_rest_pose(skeleton);
        }
        self.skeleton = Some(skeleton.clone());
    }

    /// Register a clip. Overwrites any existing clip with the same name.
    pub fn add_clip(&mut self, mut clip: SkeletalClip) {
        if let Some(skeleton) = &self.skeleton {
            clip.bind_rest_pose(skeleton);
        }
        if self.clips.contains_key(&clip.name) {
            log::debug!("Replacing clip '{}'", clip.name);
        }
        self.clips.insert(clip.name.clone(), Arc::new(clip));
    }

    pub fn get_clip(&self, name: &str) -> Option<Arc<SkeletalClip>> {
        self.clips.get(name).cloned()
    }

    /// Look up a clip as a shareable pose source for a blend-tree leaf.
    pub fn source(&self, name: &str) -> Result<Arc<dyn PoseSource>> {
        self.clips
            .get(name)
            .map(|clip| Arc::clone(clip) as Arc<dyn PoseSource>)
            .ok_or_else(|| ArmatureError::ClipNotFound(name.to_string()))
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Registered clip names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{Interpolation, JointKeyframe, JointProperty, JointTrack};
    use armature_core::{JointId, Transform};
    use glam::Vec3;

    #[test]
    fn add_and_look_up() {
        let mut lib = ClipLibrary::new();
        lib.add_clip(SkeletalClip::new("idle", Vec::new()));
        lib.add_clip(SkeletalClip::new("walk", Vec::new()));
        assert_eq!(lib.clip_count(), 2);
        assert!(lib.has_clip("walk"));
        assert_eq!(lib.names(), vec!["idle", "walk"]);
        assert_eq!(lib.source("idle").unwrap().name(), "idle");
    }

    #[test]
    fn missing_source_is_an_error() {
        let lib = ClipLibrary::new();
        assert!(matches!(lib.source("run"), Err(ArmatureError::ClipNotFound(_))));
    }

    #[test]
    fn re_adding_replaces() {
        let mut lib = ClipLibrary::new();
        lib.add_clip(SkeletalClip::new("idle", Vec::new()));
        let mut longer = SkeletalClip::new("idle", Vec::new());
        longer.duration = 3.0;
        lib.add_clip(longer);
        assert_eq!(lib.clip_count(), 1);
        assert_eq!(lib.get_clip("idle").unwrap().duration, 3.0);
    }

    fn arm_skeleton() -> Skeleton {
        let mut skel = Skeleton::new();
        let root = skel.add_joint("root", None, Transform::IDENTITY).unwrap();
        skel.add_joint("arm", Some(root), Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();
        skel
    }

    fn turn_clip() -> SkeletalClip {
        SkeletalClip::new(
            "turn",
            vec![JointTrack {
                joint: JointId::from_raw(1),
                property: JointProperty::Rotation,
                interpolation: Interpolation::Linear,
                keyframes: vec![JointKeyframe {
                    time: 0.0,
                    value: vec![0.0, 0.0, 0.0, 1.0],
                }],
            }],
        )
    }

    #[test]
    fn bound_skeleton_supplies_rest_pose() {
        let mut lib = ClipLibrary::for_skeleton(&arm_skeleton());
        lib.add_clip(turn_clip());
        let pose = lib.source("turn").unwrap().sample_pose(0.0);
        let arm = pose.get(JointId::from_raw(1)).unwrap();
        assert_eq!(arm.position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn binding_later_rebinds_registered_clips() {
        let mut lib = ClipLibrary::new();
        lib.add_clip(turn_clip());
        lib.bind_skeleton(&arm_skeleton());
        let pose = lib.get_clip("turn").unwrap().sample(0.0);
        assert_eq!(pose.get(JointId::from_raw(1)).unwrap().position, Vec3::new(0.0, 2.0, 0.0));
    }
}
