//! Cyclic Coordinate Descent

use crate::chain::IkChain;
use crate::config::IkSettings;
use crate::solver::{IkContext, IkSolver};
use crate::state::SolverState;
use crate::util::shortest_arc;
use armature_core::Skeleton;

/// Rotates each joint, end to root, so the end-effector swings toward the target.
#[derive(Debug, Clone)]
pub struct Ccd {
    ctx: IkContext,
}

impl Ccd {
    pub fn new(chain: IkChain, settings: &IkSettings) -> Self {
        Self {
            ctx: IkContext::new(chain, settings),
        }
    }
}

impl IkSolver for Ccd {
    fn name(&self) -> &'static str {
        "ccd"
    }

    fn context(&self) -> &IkContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut IkContext {
        &mut self.ctx
    }

    /// One pass over the chain. Stops early with `Success` as soon as the
    /// end-effector is within the threshold.
    fn update(&mut self, skeleton: &mut Skeleton) -> SolverState {
        if !self.ctx.run.is_processing() {
            return self.ctx.run.state();
        }

        let joints = self.ctx.chain.joints();
        let end = self.ctx.chain.end_effector();
        let target = self.ctx.target;

        for &joint in joints[..joints.len() - 1].iter().rev() {
            let pivot = skeleton.world_position(joint);
            let swing = shortest_arc(skeleton.world_position(end) - pivot, target - pivot);

            // Express the world-space swing in the parent's frame, then apply
            // it on top of the local rotation
            let parent = skeleton.parent_world_rotation(joint);
            let local_swing = parent.inverse() * swing * parent;
            let local = skeleton.local_mut(joint);
            local.rotation = (local_swing * local.rotation).normalize();
            skeleton.propagate(joint);

            if self.ctx.reached(skeleton) {
                return self.ctx.run.succeed();
            }
        }

        self.ctx.run.miss()
    }
}
