//! Joint chains driven by the iterative solvers

use armature_core::{ArmatureError, JointId, Result, Skeleton, Transform};
use glam::Vec3;

/// Smallest chain an iterative solver can work with: one bone
pub const MIN_CHAIN_JOINTS: usize = 2;

/// Ordered joints from root to end-effector. Each joint is the parent of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IkChain {
    joints: Vec<JointId>,
}

impl IkChain {
    /// Create `joint_count` new joints in `skeleton`, the root at its parent's
    /// origin and every following joint `bone_length` along its parent's X axis.
    pub fn build(
        skeleton: &mut Skeleton,
        parent: Option<JointId>,
        joint_count: usize,
        bone_length: f32,
    ) -> Result<Self> {
        if joint_count < MIN_CHAIN_JOINTS {
            return Err(ArmatureError::InvalidChain(format!(
                "a chain needs at least {} joints, got {}",
                MIN_CHAIN_JOINTS, joint_count
            )));
        }

        let mut joints = Vec::with_capacity(joint_count);
        let mut current = parent;
        for i in 0..joint_count {
            let offset = if i == 0 {
                Vec3::ZERO
            } else {
                Vec3::new(bone_length, 0.0, 0.0)
            };
            let id = skeleton.add_joint(
                format!("ik joint {}", i),
                current,
                Transform::from_position(offset),
            )?;
            joints.push(id);
            current = Some(id);
        }

        log::debug!("Built IK chain of {} joints (bone length {})", joint_count, bone_length);
        Ok(Self { joints })
    }

    /// Wrap existing joints, checking that each one is the parent of the next.
    pub fn from_joints(skeleton: &Skeleton, joints: Vec<JointId>) -> Result<Self> {
        if joints.len() < MIN_CHAIN_JOINTS {
            return Err(ArmatureError::InvalidChain(format!(
                "a chain needs at least {} joints, got {}",
                MIN_CHAIN_JOINTS,
                joints.len()
            )));
        }
        if let Some(missing) = joints.iter().find(|j| !skeleton.contains(**j)) {
            return Err(ArmatureError::JointNotFound(*missing));
        }
        for pair in joints.windows(2) {
            if skeleton.parent(pair[1]) != Some(pair[0]) {
                return Err(ArmatureError::InvalidChain(format!(
                    "joint {} is not the parent of joint {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self { joints })
    }

    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn root(&self) -> JointId {
        self.joints[0]
    }

    pub fn end_effector(&self) -> JointId {
        self.joints[self.joints.len() - 1]
    }

    pub fn world_positions(&self, skeleton: &Skeleton) -> Vec<Vec3> {
        self.joints
            .iter()
            .map(|j| skeleton.world_position(*j))
            .collect()
    }

    /// Distance between each joint and the next, from the current world positions
    pub fn bone_lengths(&self, skeleton: &Skeleton) -> Vec<f32> {
        self.joints
            .windows(2)
            .map(|pair| {
                skeleton
                    .world_position(pair[0])
                    .distance(skeleton.world_position(pair[1]))
            })
            .collect()
    }

    /// Total length of the chain when fully stretched
    pub fn reach(&self, skeleton: &Skeleton) -> f32 {
        self.bone_lengths(skeleton).iter().sum()
    }

    /// Append a joint one unit along the end-effector's X axis.
    pub fn add_joint(&mut self, skeleton: &mut Skeleton) -> Result<JointId> {
        let id = skeleton.add_joint(
            format!("ik joint {}", self.joints.len()),
            Some(self.end_effector()),
            Transform::from_position(Vec3::X),
        )?;
        self.joints.push(id);
        log::debug!("IK chain grew to {} joints", self.joints.len());
        Ok(id)
    }

    /// Remove the end-effector from the chain and the skeleton.
    pub fn remove_joint(&mut self, skeleton: &mut Skeleton) -> Result<JointId> {
        if self.joints.len() <= MIN_CHAIN_JOINTS {
            return Err(ArmatureError::InvalidChain(format!(
                "cannot shrink a chain below {} joints",
                MIN_CHAIN_JOINTS
            )));
        }
        let end = self.end_effector();
        skeleton.pop_joint(end)?;
        self.joints.pop();
        log::debug!("IK chain shrank to {} joints", self.joints.len());
        Ok(end)
    }

    /// Move joint `index` along the line from its parent so the bone has
    /// length `distance`. The root has no bone and cannot be moved this way.
    pub fn set_joint_distance(
        &mut self,
        skeleton: &mut Skeleton,
        index: usize,
        distance: f32,
    ) -> Result<()> {
        if index == 0 || index >= self.joints.len() {
            return Err(ArmatureError::InvalidChain(format!(
                "joint index {} has no bone (chain of {})",
                index,
                self.joints.len()
            )));
        }
        let joint = self.joints[index];
        let direction = skeleton.local(joint).position.normalize_or(Vec3::X);
        skeleton.set_local_position(joint, direction * distance);
        Ok(())
    }
}
