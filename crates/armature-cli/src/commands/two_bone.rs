//! Two-bone IK command

use anyhow::{Context, Result};
use armature_core::Skeleton;
use armature_ik::config::load_rig_from_file;
use armature_ik::{TwoBoneIk, TwoBoneOutcome};
use glam::Vec2;
use std::path::Path;

pub fn run(rig: &str, target: [f32; 2]) -> Result<()> {
    let config = load_rig_from_file(Path::new(rig)).with_context(|| format!("Failed to load rig {}", rig))?;

    let mut skeleton = Skeleton::new();
    let mut arm = TwoBoneIk::build(&mut skeleton, None, config.two_bone.d1, config.two_bone.d2)?;
    arm.set_target(Vec2::from(target));
    log::debug!("Two-bone arm d1 = {}, d2 = {}, target {:?}", arm.d1, arm.d2, arm.target);

    match arm.update(&mut skeleton) {
        TwoBoneOutcome::Solved { angle1, angle2 } => {
            let end = skeleton.world_position(arm.end);
            println!(
                "Solved: angle1 = {:.2} deg, angle2 = {:.2} deg",
                angle1.to_degrees(),
                angle2.to_degrees()
            );
            println!("  end effector: ({:.4}, {:.4})", end.x, end.y);
        }
        TwoBoneOutcome::Unreachable => {
            println!(
                "Target ({}, {}) is out of reach for bones {} and {}",
                target[0], target[1], arm.d1, arm.d2
            );
        }
    }

    Ok(())
}
