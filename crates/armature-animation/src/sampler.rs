//! Skeletal keyframe sampling with quaternion slerp for rotation tracks

use crate::clip::{Interpolation, JointProperty, JointTrack};
use armature_core::slerp_shortest;
use glam::Quat;

/// Sample a joint track at a given time.
///
/// Returns the interpolated value (3 floats for translation/scale, 4 for
/// rotation). Times outside the keyframe range clamp to the first or last key.
pub fn sample_joint_track(track: &JointTrack, time: f64) -> Vec<f32> {
    let keyframes = &track.keyframes;
    let is_rotation = track.property == JointProperty::Rotation;
    let components = track.property.components();

    if keyframes.is_empty() {
        return match track.property {
            JointProperty::Rotation => vec![0.0, 0.0, 0.0, 1.0],
            JointProperty::Scale => vec![1.0; 3],
            JointProperty::Translation => vec![0.0; 3],
        };
    }

    if time <= keyframes[0].time {
        return padded(&keyframes[0].value, components);
    }

    let last = &keyframes[keyframes.len() - 1];
    if time >= last.time {
        return padded(&last.value, components);
    }

    // First keyframe strictly after `time`; bounds above guarantee 1..len
    let idx = keyframes.partition_point(|kf| kf.time <= time);
    let prev = &keyframes[idx - 1];
    let next = &keyframes[idx];

    let span = next.time - prev.time;
    if span <= 0.0 {
        return padded(&prev.value, components);
    }
    let t = ((time - prev.time) / span) as f32;

    match track.interpolation {
        Interpolation::Step => padded(&prev.value, components),
        Interpolation::Linear if is_rotation => quat_slerp(&prev.value, &next.value, t),
        Interpolation::Linear => lerp_components(&prev.value, &next.value, t, components),
    }
}

/// Component-wise linear interpolation
fn lerp_components(a: &[f32], b: &[f32], t: f32, count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| {
            let av = a.get(i).copied().unwrap_or(0.0);
            let bv = b.get(i).copied().unwrap_or(0.0);
            av + (bv - av) * t
        })
        .collect()
}

fn padded(value: &[f32], count: usize) -> Vec<f32> {
    (0..count).map(|i| value.get(i).copied().unwrap_or(0.0)).collect()
}

/// Shortest-path slerp over xyzw slices. The result is normalized.
pub fn quat_slerp(a: &[f32], b: &[f32], t: f32) -> Vec<f32> {
    if a.len() < 4 || b.len() < 4 {
        return vec![0.0, 0.0, 0.0, 1.0];
    }
    let qa = Quat::from_xyzw(a[0], a[1], a[2], a[3]);
    let qb = Quat::from_xyzw(b[0], b[1], b[2], b[3]);
    if qa.length_squared() < 1e-12 || qb.length_squared() < 1e-12 {
        return vec![0.0, 0.0, 0.0, 1.0];
    }
    slerp_shortest(qa.normalize(), qb.normalize(), t).to_array().to_vec()
}
