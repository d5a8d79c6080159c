#[cfg(not(feature = "milp"))]
use log::warn;
use serde::{Deserialize, Serialize};

use divsack::solver::{EnumerationSolver, SolverAdapter};
use divsack::util::SelectionConfig;

/// Configuration of the `divsack` binary
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct DivsackConfig {
    /// Configuration of the selection pipeline
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Backend handed the program when the strategy is exact optimization
    #[serde(default)]
    pub solver_backend: SolverBackend,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Parallel branch-and-bound shipped with the library
    #[default]
    Enumeration,
    /// `good_lp` with `microlp`, requires the `milp` feature
    Milp,
}

impl SolverBackend {
    /// Instantiates the backend, `None` if it is not compiled in
    pub fn create(&self) -> Option<Box<dyn SolverAdapter>> {
        match self {
            SolverBackend::Enumeration => Some(Box::new(EnumerationSolver::default())),
            #[cfg(feature = "milp")]
            SolverBackend::Milp => Some(Box::new(divsack::solver::MilpSolver)),
            #[cfg(not(feature = "milp"))]
            SolverBackend::Milp => {
                warn!("[CONFIG] milp backend requested, but divsack was built without the milp feature");
                None
            }
        }
    }
}
