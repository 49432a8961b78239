//! Pose combination primitives for blend trees
//!
//! Provides two-way interpolation between poses (1D blending) and three-way
//! barycentric combination (2D blending). Both build a fresh pose and leave
//! their inputs untouched.

use crate::pose::Pose;
use armature_core::Transform;
use glam::Quat;

/// Interpolate two poses.
///
/// The result holds the union of both key sets. Joints present in only one
/// pose are carried over unchanged. Joints present in both get lerped
/// position and scale and a shortest-arc slerped rotation.
/// `t` of 0.0 = fully `a`, 1.0 = fully `b`.
pub fn lerp_pose(a: &Pose, b: &Pose, t: f32) -> Pose {
    let mut out = Pose::with_capacity(a.len().max(b.len()));

    for (joint, ta) in a {
        let blended = match b.get(*joint) {
            Some(tb) => Transform::lerp(ta, tb, t),
            None => *ta,
        };
        out.insert(*joint, blended);
    }

    for (joint, tb) in b {
        if !a.contains(*joint) {
            out.insert(*joint, *tb);
        }
    }

    out
}

/// Combine three poses with barycentric weights `[wa, wb, wc]`.
///
/// Weights are expected to sum to 1 and are not re-normalized. When any
/// weight is exactly 1 that pose is returned verbatim. Otherwise every joint
/// of `a` is blended; a joint missing from `b` or `c` contributes an identity
/// transform with its weight zeroed for that joint only. Rotations are summed
/// component-wise (after aligning to `a`'s hemisphere) and re-normalized,
/// which approximates a true multi-way slerp when the rotations are close.
///
/// Joints that appear only in `b` or `c` are not part of the output.
pub fn barycentric_pose(a: &Pose, b: &Pose, c: &Pose, weights: [f32; 3]) -> Pose {
    let [wa, wb, wc] = weights;
    if wa == 1.0 {
        return a.clone();
    }
    if wb == 1.0 {
        return b.clone();
    }
    if wc == 1.0 {
        return c.clone();
    }

    let mut out = Pose::with_capacity(a.len());

    for (joint, ta) in a {
        let (tb, wb) = match b.get(*joint) {
            Some(t) => (*t, wb),
            None => (Transform::IDENTITY, 0.0),
        };
        let (tc, wc) = match c.get(*joint) {
            Some(t) => (*t, wc),
            None => (Transform::IDENTITY, 0.0),
        };

        let position = ta.position * wa + tb.position * wb + tc.position * wc;

        // Scale: weighted average over the contributing terms
        let weight_sum = wa + wb + wc;
        let scale = if weight_sum > 0.0 {
            (ta.scale * wa + tb.scale * wb + tc.scale * wc) / weight_sum
        } else {
            ta.scale
        };

        let rb = same_hemisphere(ta.rotation, tb.rotation);
        let rc = same_hemisphere(ta.rotation, tc.rotation);
        let summed = ta.rotation * wa + rb * wb + rc * wc;
        let rotation = if summed.length_squared() > 1e-12 {
            summed.normalize()
        } else {
            ta.rotation
        };

        out.insert(
            *joint,
            Transform {
                position,
                rotation,
                scale,
            },
        );
    }

    out
}

fn same_hemisphere(reference: Quat, q: Quat) -> Quat {
    if reference.dot(q) < 0.0 {
        -q
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armature_core::JointId;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn joint(i: u32) -> JointId {
        JointId::from_raw(i)
    }

    fn pose_a() -> Pose {
        [
            (joint(0), Transform::from_position(Vec3::new(1.0, 2.0, 3.0))),
            (joint(1), Transform::from_position(Vec3::new(0.0, 1.0, 0.0))),
        ]
        .into_iter()
        .collect()
    }

    fn pose_b() -> Pose {
        [
            (
                joint(0),
                Transform::from_position(Vec3::new(10.0, 20.0, 30.0))
                    .with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
            ),
            (joint(2), Transform::from_position(Vec3::new(5.0, 5.0, 5.0))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn lerp_weight_zero_returns_a() {
        let a = pose_a();
        let out = lerp_pose(&a, &pose_b(), 0.0);
        let t = out.get(joint(0)).unwrap();
        assert!((t.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
        assert!(t.rotation.dot(Quat::IDENTITY).abs() > 0.9999);
    }

    #[test]
    fn lerp_weight_one_returns_b() {
        let b = pose_b();
        let out = lerp_pose(&pose_a(), &b, 1.0);
        let t = out.get(joint(0)).unwrap();
        assert!((t.position - Vec3::new(10.0, 20.0, 30.0)).length() < 1e-4);
        assert!(t.rotation.dot(Quat::from_rotation_y(FRAC_PI_2)).abs() > 0.9999);
    }

    #[test]
    fn lerp_midpoint_interpolates() {
        let out = lerp_pose(&pose_a(), &pose_b(), 0.5);
        let t = out.get(joint(0)).unwrap();
        assert!((t.position - Vec3::new(5.5, 11.0, 16.5)).length() < 1e-4);
        let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
        assert!(t.rotation.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn lerp_keeps_union_and_leaves_inputs_untouched() {
        let a = pose_a();
        let b = pose_b();
        let out = lerp_pose(&a, &b, 0.3);
        assert_eq!(out.len(), 3);
        // Joint 1 only in A, joint 2 only in B: carried unchanged
        assert_eq!(out.get(joint(1)), a.get(joint(1)));
        assert_eq!(out.get(joint(2)), b.get(joint(2)));
        assert_eq!(a, pose_a());
        assert_eq!(b, pose_b());
    }

    #[test]
    fn barycentric_unit_weight_returns_pose_verbatim() {
        let a = pose_a();
        let out = barycentric_pose(&a, &pose_b(), &Pose::new(), [1.0, 0.0, 0.0]);
        assert_eq!(out, a);
        let out_c = barycentric_pose(&a, &pose_b(), &pose_b(), [0.0, 0.0, 1.0]);
        assert_eq!(out_c, pose_b());
    }

    #[test]
    fn barycentric_blends_positions() {
        let make = |x: f32| -> Pose {
            [(joint(0), Transform::from_position(Vec3::new(x, 0.0, 0.0)))]
                .into_iter()
                .collect()
        };
        let out = barycentric_pose(&make(0.0), &make(3.0), &make(6.0), [0.5, 0.25, 0.25]);
        let t = out.get(joint(0)).unwrap();
        assert!((t.position.x - 2.25).abs() < 1e-5);
        assert!((t.rotation.length() - 1.0).abs() < 1e-5);
        assert!((t.scale - Vec3::ONE).length() < 1e-5);
    }

    #[test]
    fn barycentric_missing_joint_zeroes_only_that_joint() {
        let a: Pose = [
            (joint(0), Transform::from_position(Vec3::new(2.0, 0.0, 0.0))),
            (joint(1), Transform::from_position(Vec3::new(2.0, 0.0, 0.0))),
        ]
        .into_iter()
        .collect();
        // B lacks joint 0 but has joint 1
        let b: Pose = [(joint(1), Transform::from_position(Vec3::new(4.0, 0.0, 0.0)))]
            .into_iter()
            .collect();
        let c = a.clone();
        let out = barycentric_pose(&a, &b, &c, [0.5, 0.25, 0.25]);
        // Joint 0: B's term is dropped, weights are not re-normalized
        assert!((out.get(joint(0)).unwrap().position.x - 1.5).abs() < 1e-5);
        // Joint 1: B still contributes
        assert!((out.get(joint(1)).unwrap().position.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn barycentric_ignores_joints_absent_from_a() {
        let out = barycentric_pose(&pose_a(), &pose_b(), &pose_b(), [0.4, 0.3, 0.3]);
        assert!(!out.contains(joint(2)));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn barycentric_rotation_is_normalized_across_hemispheres() {
        let q = Quat::from_rotation_z(0.3);
        let a: Pose = [(joint(0), Transform::from_rotation(q))].into_iter().collect();
        let b: Pose = [(joint(0), Transform::from_rotation(-q))].into_iter().collect();
        let out = barycentric_pose(&a, &b, &a, [0.4, 0.4, 0.2]);
        let r = out.get(joint(0)).unwrap().rotation;
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(r.dot(q).abs() > 0.9999);
    }
}
