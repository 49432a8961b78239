//! Inverse kinematics for Armature
//!
//! - `TwoBoneIk`: closed-form law-of-cosines arm in the XY plane
//! - `Ccd` and `Fabrik`: iterative chain solvers advanced one pass per tick,
//!   tracked by a `SolverState` run-state machine
//! - TOML rig configuration for chains and solver settings

pub mod ccd;
pub mod chain;
pub mod config;
pub mod fabrik;
pub mod solver;
pub mod state;
pub mod two_bone;
pub mod util;

pub use ccd::Ccd;
pub use chain::IkChain;
pub use config::{IkSettings, RigConfig, SolverKind, TwoBoneSettings};
pub use fabrik::Fabrik;
pub use solver::{make_solver, IkContext, IkSolver};
pub use state::{SolverRun, SolverState};
pub use two_bone::{TwoBoneIk, TwoBoneOutcome};
