//! Blend tree playback command

use anyhow::{bail, Context, Result};
use armature_animation::loader::load_blend_tree_from_file;
use armature_animation::{Animator, BlendNode, ClipLibrary, NodeKind, PlaybackState};
use armature_core::Skeleton;
use glam::Vec2;
use std::path::Path;

pub struct BlendArgs {
    pub file: String,
    pub param: Option<Vec<f32>>,
    pub dt: f64,
    pub ticks: usize,
    pub looping: bool,
}

pub fn run(args: BlendArgs) -> Result<()> {
    let mut library = ClipLibrary::new();
    let mut root = load_blend_tree_from_file(Path::new(&args.file), &mut library)
        .with_context(|| format!("Failed to load blend tree {}", args.file))?;

    if let Some(param) = &args.param {
        apply_parameter(&mut root, param)?;
        log::debug!("Blend parameter overridden to {:?}", param);
    }

    println!(
        "Loaded {} ({} clips, {} nodes, duration {:.3}s)",
        args.file,
        library.clip_count(),
        root.node_count(),
        root.duration()
    );

    // Clips address joints by index; the pose is reported as local transforms
    let mut skeleton = Skeleton::new();
    let mut animator = Animator::new(root).with_playback(PlaybackState::new(1.0, args.looping));

    for tick in 1..=args.ticks {
        let outcome = animator.tick(args.dt, &mut skeleton);
        println!("[{:>3}] t={:.3} {:?}", tick, animator.playback.time, outcome);
        let pose = animator.root.pose();
        for joint in pose.sorted_joints() {
            if let Some(local) = pose.get(joint) {
                let p = local.position;
                println!("      joint {}: ({:.4}, {:.4}, {:.4})", joint, p.x, p.y, p.z);
            }
        }
        if !animator.playback.playing {
            log::info!("Playback finished after {} ticks", tick);
            println!("Playback finished");
            break;
        }
    }

    Ok(())
}

fn apply_parameter(root: &mut BlendNode, param: &[f32]) -> Result<()> {
    match (root.kind_mut(), param) {
        (NodeKind::Blend1D(node), [x]) => node.set_parameter(*x),
        (NodeKind::Blend2D(node), [x, y]) => node.set_parameter(Vec2::new(*x, *y)),
        (NodeKind::Blend1D(_), _) => bail!("1D blend root takes a single parameter value"),
        (NodeKind::Blend2D(_), _) => bail!("2D blend root takes an x,y parameter"),
        (NodeKind::Leaf(_), _) => bail!("Root node is a clip; it has no blend parameter"),
    }
    Ok(())
}
