//! The iterative solver interface and the state every chain solver shares

use crate::chain::IkChain;
use crate::config::{IkSettings, SolverKind};
use crate::state::{SolverRun, SolverState};
use crate::{Ccd, Fabrik};
use armature_core::{JointId, Result, Skeleton};
use glam::Vec3;

/// Chain, target, threshold and run-state of one iterative solver.
#[derive(Debug, Clone)]
pub struct IkContext {
    pub chain: IkChain,
    pub target: Vec3,
    pub distance_threshold: f32,
    pub run: SolverRun,
}

impl IkContext {
    pub fn new(chain: IkChain, settings: &IkSettings) -> Self {
        Self {
            chain,
            target: Vec3::ZERO,
            distance_threshold: settings.distance_threshold,
            run: SolverRun::new(settings.max_iterations),
        }
    }

    /// Whether the end-effector is within the distance threshold of the target
    pub fn reached(&self, skeleton: &Skeleton) -> bool {
        skeleton
            .world_position(self.chain.end_effector())
            .distance(self.target)
            < self.distance_threshold
    }
}

/// An iterative chain solver advanced once per tick.
///
/// Implementors supply one pass of their algorithm in [`update`](Self::update);
/// target assignment and chain edits are shared and re-arm the solver.
pub trait IkSolver: Send {
    fn name(&self) -> &'static str;

    fn context(&self) -> &IkContext;

    fn context_mut(&mut self) -> &mut IkContext;

    /// Run one pass if processing, writing rotations into `skeleton`.
    fn update(&mut self, skeleton: &mut Skeleton) -> SolverState;

    fn state(&self) -> SolverState {
        self.context().run.state()
    }

    fn chain(&self) -> &IkChain {
        &self.context().chain
    }

    fn target(&self) -> Vec3 {
        self.context().target
    }

    fn set_target(&mut self, target: Vec3) {
        let ctx = self.context_mut();
        ctx.target = target;
        ctx.run.arm();
    }

    fn set_distance_threshold(&mut self, threshold: f32) {
        self.context_mut().distance_threshold = threshold;
    }

    fn set_max_iterations(&mut self, max_iterations: u32) {
        self.context_mut().run.set_max_iterations(max_iterations);
    }

    fn add_joint(&mut self, skeleton: &mut Skeleton) -> Result<JointId> {
        let ctx = self.context_mut();
        let id = ctx.chain.add_joint(skeleton)?;
        ctx.run.arm();
        Ok(id)
    }

    fn remove_joint(&mut self, skeleton: &mut Skeleton) -> Result<JointId> {
        let ctx = self.context_mut();
        let id = ctx.chain.remove_joint(skeleton)?;
        ctx.run.arm();
        Ok(id)
    }

    fn set_joint_distance(&mut self, skeleton: &mut Skeleton, index: usize, distance: f32) -> Result<()> {
        let ctx = self.context_mut();
        ctx.chain.set_joint_distance(skeleton, index, distance)?;
        ctx.run.arm();
        Ok(())
    }
}

/// Create the solver selected in a rig configuration.
pub fn make_solver(kind: SolverKind, chain: IkChain, settings: &IkSettings) -> Box<dyn IkSolver> {
    match kind {
        SolverKind::Ccd => Box::new(Ccd::new(chain, settings)),
        SolverKind::Fabrik => Box::new(Fabrik::new(chain, settings)),
    }
}
