//! Iterative IK command

use anyhow::{Context, Result};
use armature_core::Skeleton;
use armature_ik::config::load_rig_from_file;
use armature_ik::{make_solver, IkChain, SolverKind, SolverState};
use glam::Vec3;
use std::path::Path;

pub fn run(rig: &str, solver: Option<&str>, target: Option<[f32; 3]>, ticks: usize) -> Result<()> {
    let config = load_rig_from_file(Path::new(rig)).with_context(|| format!("Failed to load rig {}", rig))?;

    let kind = match solver {
        Some(name) => name.parse::<SolverKind>()?,
        None => config.ik.solver,
    };
    let Some(target) = target.or(config.target) else {
        anyhow::bail!("No target given; pass --target or set `target` in {}", rig);
    };
    let target = Vec3::from(target);
    log::debug!("Solving {} with the {} solver", rig, kind);

    let mut skeleton = Skeleton::new();
    let chain = IkChain::build(&mut skeleton, None, config.ik.joint_count, config.ik.bone_length)?;
    println!(
        "{} chain: {} joints, reach {:.3}, target ({:.3}, {:.3}, {:.3})",
        kind,
        chain.len(),
        chain.reach(&skeleton),
        target.x,
        target.y,
        target.z
    );

    let mut solver = make_solver(kind, chain, &config.ik);
    solver.set_target(target);

    for tick in 1..=ticks {
        let state = solver.update(&mut skeleton);
        let end = skeleton.world_position(solver.chain().end_effector());
        println!(
            "[{:>3}] {} end=({:.4}, {:.4}, {:.4}) distance={:.4}",
            tick,
            state,
            end.x,
            end.y,
            end.z,
            end.distance(target)
        );
        if state != SolverState::Processing {
            log::info!("{} solver settled as {} after {} updates", kind, state, tick);
            break;
        }
    }

    for (i, position) in solver.chain().world_positions(&skeleton).iter().enumerate() {
        println!("  joint {}: ({:.4}, {:.4}, {:.4})", i, position.x, position.y, position.z);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rig_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn runs_solver_from_rig() {
        let rig = rig_file("target = [0.5, 1.5, 0.0]\n[ik]\njoint_count = 3\n");
        let path = rig.path().to_string_lossy().into_owned();
        assert!(run(&path, None, None, 10).is_ok());
        assert!(run(&path, Some("fabrik"), Some([1.0, 1.0, 0.0]), 10).is_ok());
    }

    #[test]
    fn rejects_unknown_solver_and_missing_target() {
        let rig = rig_file("[ik]\njoint_count = 3\n");
        let path = rig.path().to_string_lossy().into_owned();
        assert!(run(&path, Some("jacobian"), Some([1.0, 1.0, 0.0]), 10).is_err());
        assert!(run(&path, None, None, 10).is_err());
    }
}
