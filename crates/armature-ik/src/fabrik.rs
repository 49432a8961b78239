//! Forward And Backward Reaching Inverse Kinematics

use crate::chain::IkChain;
use crate::config::IkSettings;
use crate::solver::{IkContext, IkSolver};
use crate::state::SolverState;
use crate::util::shortest_arc;
use armature_core::Skeleton;
use glam::Vec3;

/// Pin the end-effector to `target` and walk back toward the root, keeping
/// each bone at its length.
pub fn forward_pass(positions: &mut [Vec3], lengths: &[f32], target: Vec3) {
    let Some(last) = positions.len().checked_sub(1) else {
        return;
    };
    positions[last] = target;
    for i in (0..last).rev() {
        let direction = (positions[i] - positions[i + 1]).normalize_or(Vec3::X);
        positions[i] = positions[i + 1] + direction * lengths[i];
    }
}

/// Pin the root back to `root` and walk out to the end-effector, keeping each
/// bone at its length.
pub fn backward_pass(positions: &mut [Vec3], lengths: &[f32], root: Vec3) {
    if positions.is_empty() {
        return;
    }
    positions[0] = root;
    for i in 0..positions.len() - 1 {
        let direction = (positions[i + 1] - positions[i]).normalize_or(Vec3::X);
        positions[i + 1] = positions[i] + direction * lengths[i];
    }
}

/// Solves on working positions, then rotates joints to follow them.
#[derive(Debug, Clone)]
pub struct Fabrik {
    ctx: IkContext,
    positions: Vec<Vec3>,
    lengths: Vec<f32>,
}

impl Fabrik {
    pub fn new(chain: IkChain, settings: &IkSettings) -> Self {
        Self {
            ctx: IkContext::new(chain, settings),
            positions: Vec::new(),
            lengths: Vec::new(),
        }
    }

    /// Working positions from the last update
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Bone lengths from the last update
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    /// Re-read positions and bone lengths so joint edits take effect.
    fn refresh(&mut self, skeleton: &Skeleton) {
        self.positions = self.ctx.chain.world_positions(skeleton);
        self.lengths = self.ctx.chain.bone_lengths(skeleton);
    }
}

impl IkSolver for Fabrik {
    fn name(&self) -> &'static str {
        "fabrik"
    }

    fn context(&self) -> &IkContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut IkContext {
        &mut self.ctx
    }

    /// One forward/backward iteration, then re-orient every joint toward its
    /// solved position. Convergence is checked once, after all joints moved.
    fn update(&mut self, skeleton: &mut Skeleton) -> SolverState {
        self.refresh(skeleton);
        if !self.ctx.run.is_processing() {
            return self.ctx.run.state();
        }

        let root = self.positions[0];
        forward_pass(&mut self.positions, &self.lengths, self.ctx.target);
        backward_pass(&mut self.positions, &self.lengths, root);

        let joints = self.ctx.chain.joints();
        for (i, pair) in joints.windows(2).enumerate() {
            let (joint, next) = (pair[0], pair[1]);
            let current = skeleton.world_position(next) - skeleton.world_position(joint);
            let desired = self.positions[i + 1] - self.positions[i];
            let swing = shortest_arc(current, desired);
            let rotation = skeleton.world(joint).rotation;
            skeleton.set_world_rotation(joint, swing * rotation);
        }

        if self.ctx.reached(skeleton) {
            self.ctx.run.succeed()
        } else {
            self.ctx.run.miss()
        }
    }
}
