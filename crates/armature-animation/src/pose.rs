//! Per-joint local transforms for one instant

use armature_core::{JointId, Transform};
use std::collections::hash_map;
use std::collections::HashMap;

/// Mapping from joint to local transform.
///
/// A pose only holds the joints its source modified this frame; joints that
/// are absent are "unmodified by this source", not reset to identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    joints: HashMap<JointId, Transform>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            joints: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, joint: JointId, transform: Transform) -> Option<Transform> {
        self.joints.insert(joint, transform)
    }

    pub fn get(&self, joint: JointId) -> Option<&Transform> {
        self.joints.get(&joint)
    }

    /// Entry for `joint`, starting from `base` when the joint is not in the pose yet.
    pub fn entry_or(&mut self, joint: JointId, base: Transform) -> &mut Transform {
        self.joints.entry(joint).or_insert(base)
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.joints.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn clear(&mut self) {
        self.joints.clear();
    }

    pub fn iter(&self) -> hash_map::Iter<'_, JointId, Transform> {
        self.joints.iter()
    }

    /// Joints present in this pose, sorted for stable output
    pub fn sorted_joints(&self) -> Vec<JointId> {
        let mut ids: Vec<JointId> = self.joints.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl<'a> IntoIterator for &'a Pose {
    type Item = (&'a JointId, &'a Transform);
    type IntoIter = hash_map::Iter<'a, JointId, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.joints.iter()
    }
}

impl FromIterator<(JointId, Transform)> for Pose {
    fn from_iter<T: IntoIterator<Item = (JointId, Transform)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}
