use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Program, VarId};

mod enumeration;
#[cfg(feature = "milp")]
mod milp;

#[doc(inline)]
pub use enumeration::EnumerationSolver;

#[doc(inline)]
#[cfg(feature = "milp")]
pub use milp::MilpSolver;

/// Capability to solve a [`Program`].
///
/// Implementations may parallelize internally and must stop on their own once the time limit of
/// [`SolveLimits`] has passed, reporting the best assignment found so far as
/// [`SolveStatus::Feasible`] or [`SolveStatus::TimeoutNoSolution`] if there is none.
pub trait SolverAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn solve(&self, program: &Program, limits: &SolveLimits) -> SolveOutcome;
}

/// Resources granted to a [`SolverAdapter`]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveLimits {
    /// Wall-clock budget in seconds
    pub time_limit_secs: u64,
    /// Number of worker threads the solver may use
    pub n_workers: usize,
}

impl SolveLimits {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            time_limit_secs: 3 * 60,
            n_workers: 4,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Assignment proven optimal
    Optimal,
    /// Assignment satisfies every constraint, optimality not proven
    Feasible,
    /// No assignment satisfies every constraint
    Infeasible,
    /// Time limit reached before any feasible assignment was found
    TimeoutNoSolution,
    /// The solver failed or could not handle the program
    Error,
}

impl SolveStatus {
    /// Whether an outcome with this status carries an assignment
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::TimeoutNoSolution => "TIMEOUT_NO_SOLUTION",
            SolveStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Value of every variable of a [`Program`], indexed by [`VarId`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: VarId) -> i64 {
        self.values[var.index()]
    }

    /// Whether a binary variable is set to 1
    pub fn is_set(&self, var: VarId) -> bool {
        self.value(var) >= 1
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Verdict of a [`SolverAdapter`]. The assignment is present iff the status [has a solution](SolveStatus::has_solution).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    /// Reason of an [`SolveStatus::Error`]
    pub diagnostic: Option<String>,
}

impl SolveOutcome {
    pub fn solved(status: SolveStatus, assignment: Assignment) -> Self {
        debug_assert!(status.has_solution());
        Self {
            status,
            assignment: Some(assignment),
            diagnostic: None,
        }
    }

    pub fn unsolved(status: SolveStatus) -> Self {
        debug_assert!(!status.has_solution());
        Self {
            status,
            assignment: None,
            diagnostic: None,
        }
    }

    pub fn error(diagnostic: impl Into<String>) -> Self {
        Self {
            status: SolveStatus::Error,
            assignment: None,
            diagnostic: Some(diagnostic.into()),
        }
    }
}
