//! Blend trees loaded from TOML driving a skeleton through the animator

use armature_animation::loader::{load_blend_tree_from_file, load_blend_tree_from_str};
use armature_animation::{Animator, BlendOutcome, ClipLibrary, PlaybackState};
use armature_core::{Quat, Skeleton, Transform, Vec2, Vec3};
use std::f32::consts::FRAC_PI_4;
use std::io::Write;

/// Four directional clips at the corners of a square plus an idle in the middle.
/// Each clip moves joint 1 to a fixed offset so blends are easy to predict.
const LOCOMOTION: &str = r#"
[[clips]]
name = "idle"
[[clips.tracks]]
joint = 1
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [0.0, 1.0, 0.0]
[[clips.tracks.keyframes]]
time = 1.0
value = [0.0, 1.0, 0.0]

[[clips]]
name = "walk_sw"
[[clips.tracks]]
joint = 1
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [-1.0, 0.0, -1.0]

[[clips]]
name = "walk_se"
[[clips.tracks]]
joint = 1
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [1.0, 0.0, -1.0]

[[clips]]
name = "walk_ne"
[[clips.tracks]]
joint = 1
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [1.0, 0.0, 1.0]

[[clips]]
name = "walk_nw"
[[clips.tracks]]
joint = 1
property = "Translation"
[[clips.tracks.keyframes]]
time = 0.0
value = [-1.0, 0.0, 1.0]

[tree]
kind = "blend_2d"
parameter = [1.0, 1.0]

[[tree.children]]
kind = "clip"
clip = "walk_sw"
position = [-1.0, -1.0]

[[tree.children]]
kind = "clip"
clip = "walk_se"
position = [1.0, -1.0]

[[tree.children]]
kind = "clip"
clip = "walk_ne"
position = [1.0, 1.0]

[[tree.children]]
kind = "clip"
clip = "walk_nw"
position = [-1.0, 1.0]

[[tree.children]]
kind = "clip"
clip = "idle"
position = [0.0, 0.0]
"#;

fn skeleton() -> Skeleton {
    let mut skel = Skeleton::new();
    let hips = skel.add_joint("hips", None, Transform::IDENTITY).unwrap();
    skel.add_joint("foot", Some(hips), Transform::from_position(Vec3::new(0.0, -1.0, 0.0)))
        .unwrap();
    skel
}

fn load() -> (ClipLibrary, Animator) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(LOCOMOTION.as_bytes()).unwrap();
    let mut library = ClipLibrary::new();
    let root = load_blend_tree_from_file(file.path(), &mut library).unwrap();
    (library, Animator::new(root).with_playback(PlaybackState::new(1.0, true)))
}

#[test]
fn tree_loads_and_triangulates() {
    let (library, mut animator) = load();
    assert_eq!(library.clip_count(), 5);
    let blend = animator.root.as_blend_2d_mut().unwrap();
    // Square with a center point: four triangles fanned around the center
    assert_eq!(blend.triangles().len(), 4);
    assert_eq!(animator.root.duration(), 1.0);
}

#[test]
fn corner_parameter_plays_that_clip() {
    let (_library, mut animator) = load();
    let mut skel = skeleton();
    assert_eq!(animator.tick(0.25, &mut skel), BlendOutcome::Blended);
    let foot = skel.find("foot").unwrap();
    assert!((skel.world_position(foot) - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-5);
}

#[test]
fn interior_parameter_mixes_with_idle() {
    let (_library, mut animator) = load();
    let mut skel = skeleton();
    animator
        .root
        .as_blend_2d_mut()
        .unwrap()
        .set_parameter(Vec2::new(0.5, 0.0));
    assert_eq!(animator.tick(0.1, &mut skel), BlendOutcome::Blended);

    // Halfway from the idle (center) to the east edge: half idle, a quarter
    // each of the two east clips
    let foot = skel.find("foot").unwrap();
    let expected = Vec3::new(0.5, 0.5, 0.0);
    assert!((skel.world_position(foot) - expected).length() < 1e-4);
}

#[test]
fn leaving_the_blend_space_holds_the_last_pose() {
    let (_library, mut animator) = load();
    let mut skel = skeleton();
    animator.tick(0.1, &mut skel);
    let foot = skel.find("foot").unwrap();
    let held = skel.world_position(foot);

    animator
        .root
        .as_blend_2d_mut()
        .unwrap()
        .set_parameter(Vec2::new(4.0, 4.0));
    assert_eq!(animator.tick(0.1, &mut skel), BlendOutcome::OutsideBlendSpace);
    assert!((skel.world_position(foot) - held).length() < 1e-6);
}

#[test]
fn playback_wraps_over_the_longest_clip() {
    let (_library, mut animator) = load();
    let mut skel = skeleton();
    for _ in 0..5 {
        animator.tick(0.3, &mut skel);
    }
    assert!((animator.playback.time - 0.5).abs() < 1e-9);
}

/// A clip that only turns joint 1 about Z, a quarter turn over one second
const WAVE: &str = r#"
[[clips]]
name = "wave"
[[clips.tracks]]
joint = 1
property = "Rotation"
[[clips.tracks.keyframes]]
time = 0.0
value = [0.0, 0.0, 0.0, 1.0]
[[clips.tracks.keyframes]]
time = 1.0
value = [0.0, 0.0, 0.70710677, 0.70710677]

[tree]
kind = "clip"
clip = "wave"
"#;

#[test]
fn rotation_only_clip_keeps_bind_offsets() {
    let mut skel = Skeleton::new();
    let shoulder = skel.add_joint("shoulder", None, Transform::IDENTITY).unwrap();
    let arm = skel
        .add_joint("arm", Some(shoulder), Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
        .unwrap();

    let mut library = ClipLibrary::for_skeleton(&skel);
    let root = load_blend_tree_from_str(WAVE, &mut library).unwrap();
    let mut animator = Animator::new(root);
    assert_eq!(animator.tick(0.5, &mut skel), BlendOutcome::Sampled);

    assert!((skel.world_position(arm) - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    let rotation = skel.local(arm).rotation;
    assert!(rotation.angle_between(Quat::from_rotation_z(FRAC_PI_4)) < 1e-4);
}
