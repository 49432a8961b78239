//! Run-state machine shared by the iterative solvers

use std::fmt;

/// Where an iterative solver is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverState {
    /// Never armed
    #[default]
    Idle,
    /// Armed; each update runs one pass
    Processing,
    /// End-effector came within the distance threshold
    Success,
    /// Iteration budget ran out
    Failure,
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SolverState::Idle => "idle",
            SolverState::Processing => "processing",
            SolverState::Success => "success",
            SolverState::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Solver state plus the remaining pass budget.
///
/// The budget resets to `max_iterations` on success and on failure. Arming
/// does not touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRun {
    state: SolverState,
    remaining: u32,
    max_iterations: u32,
}

impl SolverRun {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            state: SolverState::Idle,
            remaining: max_iterations,
            max_iterations,
        }
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn is_processing(&self) -> bool {
        self.state == SolverState::Processing
    }

    /// Start (or restart) solving on the next update
    pub fn arm(&mut self) {
        if self.state != SolverState::Processing {
            log::debug!("IK solver armed ({} -> processing)", self.state);
        }
        self.state = SolverState::Processing;
    }

    pub fn succeed(&mut self) -> SolverState {
        log::debug!(
            "IK solver converged with {} of {} passes left",
            self.remaining,
            self.max_iterations
        );
        self.state = SolverState::Success;
        self.remaining = self.max_iterations;
        self.state
    }

    /// Book a pass that did not converge: spend one unit of budget, or fail
    /// when none is left.
    pub fn miss(&mut self) -> SolverState {
        if self.remaining > 0 {
            self.remaining -= 1;
            log::trace!("IK pass missed, {} passes left", self.remaining);
        } else {
            log::debug!("IK solver gave up after {} extra passes", self.max_iterations);
            self.state = SolverState::Failure;
            self.remaining = self.max_iterations;
        }
        self.state
    }

    /// Change the budget; the remaining count starts over.
    pub fn set_max_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations;
        self.remaining = max_iterations;
    }
}
