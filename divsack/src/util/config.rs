use serde::{Deserialize, Serialize};

use crate::solver::SolveLimits;
use crate::util::FixedPoint;

/// Strategy used to select the group
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Single greedy pass, capacity constraints only
    Greedy,
    /// Single greedy pass followed by an all-or-nothing check of the diversity constraints
    GreedyWithPostCheck,
    /// Formulate an integer program and hand it to a [`SolverAdapter`](crate::solver::SolverAdapter)
    #[default]
    ExactOptimization,
}

/// Linearization of the single-item concentration limit (`max(value) / total <= r`)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinearizationMode {
    /// Pin the globally highest-value item into the group and bound only its share.
    /// Infeasible whenever every feasible group has to exclude that item.
    #[default]
    ForceMax,
    /// Auxiliary variable equal to the maximum of `value * included`, bounded by the share.
    /// Requires solver support for max-equality constraints.
    MaxEquality,
    /// Bound `value * included` of every candidate individually.
    MaxAll,
}

/// Configuration of the selection pipeline, missing fields take their default
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub strategy: SelectionStrategy,
    /// Only used by [`SelectionStrategy::ExactOptimization`]
    pub linearization: LinearizationMode,
    /// Scale of the fractional limits in the integer program
    pub fixed_point: FixedPoint,
    /// Resources handed to the solver
    pub solve_limits: SolveLimits,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            strategy: SelectionStrategy::ExactOptimization,
            linearization: LinearizationMode::ForceMax,
            fixed_point: FixedPoint::default(),
            solve_limits: SolveLimits::default(),
        }
    }
}
