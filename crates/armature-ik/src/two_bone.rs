//! Analytical two-bone IK in the XY plane
//!
//! Solves a root/mid/end arm with the law of cosines. Angles are applied as
//! relative rotations about Z, so repeated updates accumulate until
//! [`TwoBoneIk::reset_rotations`] is called.

use armature_core::{JointId, Result, Skeleton, Transform};
use glam::{Quat, Vec2, Vec3};

/// Slack allowed on the law-of-cosines argument before the target counts as unreachable
const COS_TOLERANCE: f32 = 1e-6;

/// Result of one two-bone update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TwoBoneOutcome {
    /// Rotations applied: `angle1` at the root, `angle2` at the mid joint (radians)
    Solved { angle1: f32, angle2: f32 },
    /// Target outside the annulus the arm can reach; pose left as is
    Unreachable,
}

/// Elbow angle for a target at `target` relative to the root.
///
/// `None` when the law-of-cosines argument falls outside `[-1, 1]`, or when
/// either bone has zero length.
pub fn solve_for_angle2(target: Vec2, d1: f32, d2: f32) -> Option<f32> {
    if d1 == 0.0 || d2 == 0.0 {
        return None;
    }
    let cos_angle2 = (target.length_squared() - d1 * d1 - d2 * d2) / (2.0 * d1 * d2);
    if !(-1.0 - COS_TOLERANCE..=1.0 + COS_TOLERANCE).contains(&cos_angle2) {
        return None;
    }
    Some(cos_angle2.clamp(-1.0, 1.0).acos())
}

/// Shoulder angle that places the end on `target` given the elbow angle.
pub fn solve_for_angle1(angle2: f32, target: Vec2, d1: f32, d2: f32) -> f32 {
    let (sin2, cos2) = angle2.sin_cos();
    let reach = d1 + d2 * cos2;
    let y = target.y * reach - target.x * d2 * sin2;
    let x = target.x * reach + target.y * d2 * sin2;
    y.atan2(x)
}

/// A three-joint arm solved analytically each update.
#[derive(Debug, Clone)]
pub struct TwoBoneIk {
    pub root: JointId,
    pub mid: JointId,
    pub end: JointId,
    /// Upper bone length (root to mid)
    pub d1: f32,
    /// Lower bone length (mid to end)
    pub d2: f32,
    /// Target relative to the root, in the root's parent frame (z ignored)
    pub target: Vec2,
}

impl TwoBoneIk {
    pub fn new(root: JointId, mid: JointId, end: JointId, d1: f32, d2: f32) -> Self {
        Self {
            root,
            mid,
            end,
            d1,
            d2,
            target: Vec2::ZERO,
        }
    }

    /// Add a root/mid/end arm to `skeleton` under `parent`.
    pub fn build(skeleton: &mut Skeleton, parent: Option<JointId>, d1: f32, d2: f32) -> Result<Self> {
        let root = skeleton.add_joint("arm root", parent, Transform::IDENTITY)?;
        let mid = skeleton.add_joint(
            "arm mid",
            Some(root),
            Transform::from_position(Vec3::new(d1, 0.0, 0.0)),
        )?;
        let end = skeleton.add_joint(
            "arm end",
            Some(mid),
            Transform::from_position(Vec3::new(d2, 0.0, 0.0)),
        )?;
        Ok(Self::new(root, mid, end, d1, d2))
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Re-place the bones at the current lengths, solve, and rotate the root
    /// and mid joints by the solved angles.
    pub fn update(&mut self, skeleton: &mut Skeleton) -> TwoBoneOutcome {
        skeleton.set_local_position(self.mid, Vec3::new(self.d1, 0.0, 0.0));
        skeleton.set_local_position(self.end, Vec3::new(self.d2, 0.0, 0.0));

        let Some(angle2) = solve_for_angle2(self.target, self.d1, self.d2) else {
            log::trace!(
                "Two-bone target {:?} out of reach (d1 = {}, d2 = {})",
                self.target,
                self.d1,
                self.d2
            );
            return TwoBoneOutcome::Unreachable;
        };
        let angle1 = solve_for_angle1(angle2, self.target, self.d1, self.d2);

        rotate_z(skeleton, self.root, angle1);
        rotate_z(skeleton, self.mid, angle2);
        TwoBoneOutcome::Solved { angle1, angle2 }
    }

    /// Clear the accumulated root and mid rotations.
    pub fn reset_rotations(&self, skeleton: &mut Skeleton) {
        skeleton.local_mut(self.root).rotation = Quat::IDENTITY;
        skeleton.local_mut(self.mid).rotation = Quat::IDENTITY;
        skeleton.propagate(self.root);
    }
}

fn rotate_z(skeleton: &mut Skeleton, joint: JointId, angle: f32) {
    let local = skeleton.local_mut(joint);
    local.rotation = (local.rotation * Quat::from_rotation_z(angle)).normalize();
    skeleton.propagate(joint);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn straight_arm_at_full_reach() {
        assert!(solve_for_angle2(Vec2::new(6.0, 0.0), 3.0, 3.0).unwrap().abs() < 1e-5);
        let angle1 = solve_for_angle1(0.0, Vec2::new(6.0, 0.0), 3.0, 3.0);
        assert!(angle1.abs() < 1e-5);
    }

    #[test]
    fn target_at_root_folds_arm() {
        // (0 - 9 - 9) / 18 = -1
        let angle2 = solve_for_angle2(Vec2::ZERO, 3.0, 3.0).unwrap();
        assert!((angle2 - PI).abs() < 1e-5);
    }

    #[test]
    fn out_of_reach_is_none() {
        assert!(solve_for_angle2(Vec2::new(7.0, 0.0), 3.0, 3.0).is_none());
        assert!(solve_for_angle2(Vec2::new(0.5, 0.0), 3.0, 1.0).is_none());
        assert!(solve_for_angle2(Vec2::new(1.0, 0.0), 0.0, 3.0).is_none());
    }

    #[test]
    fn update_places_end_on_target() {
        let mut skel = Skeleton::new();
        let mut arm = TwoBoneIk::build(&mut skel, None, 3.0, 3.0).unwrap();
        arm.set_target(Vec2::new(3.0, 3.0));
        match arm.update(&mut skel) {
            TwoBoneOutcome::Solved { angle1, angle2 } => {
                assert!(angle1.abs() < 1e-5);
                assert!((angle2 - FRAC_PI_2).abs() < 1e-5);
            }
            TwoBoneOutcome::Unreachable => panic!("target should be reachable"),
        }
        assert!((skel.world_position(arm.end) - Vec3::new(3.0, 3.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn general_target_is_reached_from_rest() {
        let mut skel = Skeleton::new();
        let mut arm = TwoBoneIk::build(&mut skel, None, 3.0, 2.0).unwrap();
        arm.set_target(Vec2::new(-1.5, 3.2));
        assert!(matches!(arm.update(&mut skel), TwoBoneOutcome::Solved { .. }));
        assert!((skel.world_position(arm.end) - Vec3::new(-1.5, 3.2, 0.0)).length() < 1e-4);
    }

    #[test]
    fn rotations_accumulate_until_reset() {
        let mut skel = Skeleton::new();
        let mut arm = TwoBoneIk::build(&mut skel, None, 3.0, 3.0).unwrap();
        arm.set_target(Vec2::new(3.0, 3.0));
        arm.update(&mut skel);
        arm.update(&mut skel);
        // Elbow now bent twice: 180 degrees, folding the end back onto the root
        assert!(skel.world_position(arm.end).length() < 1e-4);

        arm.reset_rotations(&mut skel);
        arm.update(&mut skel);
        assert!((skel.world_position(arm.end) - Vec3::new(3.0, 3.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn unreachable_leaves_pose() {
        let mut skel = Skeleton::new();
        let mut arm = TwoBoneIk::build(&mut skel, None, 3.0, 3.0).unwrap();
        arm.set_target(Vec2::new(10.0, 0.0));
        assert_eq!(arm.update(&mut skel), TwoBoneOutcome::Unreachable);
        assert!((skel.world_position(arm.end) - Vec3::new(6.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn bone_lengths_are_live() {
        let mut skel = Skeleton::new();
        let mut arm = TwoBoneIk::build(&mut skel, None, 3.0, 3.0).unwrap();
        arm.d2 = 1.0;
        arm.set_target(Vec2::new(4.0, 0.0));
        arm.update(&mut skel);
        assert!((skel.world_position(arm.end) - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
    }
}
