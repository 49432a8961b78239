//! Runtime joint hierarchy with local and world transforms
//!
//! This is the minimal slice of a scene graph that the blend tree and the IK
//! solvers need: parent/child links, a local transform per joint, and world
//! transforms derived from them.

use crate::error::{ArmatureError, Result};
use crate::id::JointId;
use crate::types::Transform;
use glam::{Quat, Vec3};

/// A single joint in a [`Skeleton`]
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub parent: Option<JointId>,
    pub children: Vec<JointId>,
    pub local: Transform,
    world: Transform,
}

impl Joint {
    /// World transform as of the last propagation
    pub fn world(&self) -> &Transform {
        &self.world
    }
}

/// Joint hierarchy stored as an arena.
///
/// Joints are always stored parents-before-children (a parent must exist
/// before a child can be added), so one forward pass over the array is enough
/// to refresh every world transform.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Add a joint under `parent` (or as a root) and compute its world transform.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        parent: Option<JointId>,
        local: Transform,
    ) -> Result<JointId> {
        if let Some(parent_id) = parent {
            if parent_id.index() >= self.joints.len() {
                return Err(ArmatureError::JointNotFound(parent_id));
            }
        }

        let id = JointId::from_index(self.joints.len());
        let world = match parent {
            Some(p) => self.joints[p.index()].world.mul_transform(&local),
            None => local,
        };
        self.joints.push(Joint {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
            world,
        });
        if let Some(p) = parent {
            self.joints[p.index()].children.push(id);
        }
        Ok(id)
    }

    /// Remove the most recently added joint. It must not have children.
    pub fn pop_joint(&mut self, id: JointId) -> Result<Joint> {
        if id.index() + 1 != self.joints.len() {
            return Err(ArmatureError::NotTailJoint(id));
        }
        if !self.joints[id.index()].children.is_empty() {
            return Err(ArmatureError::JointHasChildren(id));
        }
        let joint = self
            .joints
            .pop()
            .ok_or(ArmatureError::JointNotFound(id))?;
        if let Some(p) = joint.parent {
            self.joints[p.index()].children.retain(|c| *c != id);
        }
        Ok(joint)
    }

    pub fn get(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.index())
    }

    pub fn contains(&self, id: JointId) -> bool {
        id.index() < self.joints.len()
    }

    /// Look up a joint by name
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.joints
            .iter()
            .position(|j| j.name == name)
            .map(JointId::from_index)
    }

    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.joints[id.index()].parent
    }

    pub fn local(&self, id: JointId) -> &Transform {
        &self.joints[id.index()].local
    }

    /// Mutable access to a local transform. World transforms are stale until
    /// [`propagate`](Self::propagate) is called.
    pub fn local_mut(&mut self, id: JointId) -> &mut Transform {
        &mut self.joints[id.index()].local
    }

    /// Replace a local transform and refresh the joint's subtree.
    pub fn set_local(&mut self, id: JointId, local: Transform) {
        self.joints[id.index()].local = local;
        self.propagate(id);
    }

    pub fn set_local_position(&mut self, id: JointId, position: Vec3) {
        self.joints[id.index()].local.position = position;
        self.propagate(id);
    }

    pub fn world(&self, id: JointId) -> &Transform {
        &self.joints[id.index()].world
    }

    pub fn world_position(&self, id: JointId) -> Vec3 {
        self.joints[id.index()].world.position
    }

    /// World rotation of the joint's parent, identity for roots.
    pub fn parent_world_rotation(&self, id: JointId) -> Quat {
        match self.joints[id.index()].parent {
            Some(p) => self.joints[p.index()].world.rotation,
            None => Quat::IDENTITY,
        }
    }

    /// Set a joint's world rotation, re-deriving its local rotation by
    /// removing the parent's world rotation, then refresh its subtree.
    pub fn set_world_rotation(&mut self, id: JointId, rotation: Quat) {
        let parent_rotation = self.parent_world_rotation(id);
        self.joints[id.index()].local.rotation = (parent_rotation.inverse() * rotation).normalize();
        self.propagate(id);
    }

    /// Recompute world transforms for `id` and every joint below it.
    pub fn propagate(&mut self, id: JointId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.refresh_world(current);
            stack.extend(self.joints[current.index()].children.iter().copied());
        }
    }

    /// Recompute every world transform.
    pub fn update_world(&mut self) {
        for i in 0..self.joints.len() {
            self.refresh_world(JointId::from_index(i));
        }
    }

    /// Overwrite local transforms from `(joint, transform)` pairs, then refresh
    /// world transforms. Joints unknown to this skeleton are skipped.
    pub fn apply_locals<'a, I>(&mut self, locals: I)
    where
        I: IntoIterator<Item = (&'a JointId, &'a Transform)>,
    {
        let mut skipped = 0usize;
        for (id, local) in locals {
            match self.joints.get_mut(id.index()) {
                Some(joint) => joint.local = *local,
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::trace!("apply_locals skipped {} unknown joints", skipped);
        }
        self.update_world();
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, &Joint)> {
        self.joints
            .iter()
            .enumerate()
            .map(|(i, j)| (JointId::from_index(i), j))
    }

    fn refresh_world(&mut self, id: JointId) {
        let joint = &self.joints[id.index()];
        let world = match joint.parent {
            Some(p) => self.joints[p.index()].world.mul_transform(&joint.local),
            None => joint.local,
        };
        self.joints[id.index()].world = world;
    }
}
