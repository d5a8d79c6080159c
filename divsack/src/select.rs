use std::time::Instant;

use anyhow::Result;
use itertools::Itertools;
use log::{info, warn};

use crate::assemble::assemble;
use crate::entities::{Group, Instance, Parameters};
use crate::eval::{ValidationResult, score};
use crate::greedy::{GreedySelector, GreedyVariant};
use crate::model::Formulator;
use crate::solver::{SolveStatus, SolverAdapter};
use crate::util::{SelectionConfig, SelectionStrategy};

/// Outcome of [`select`]: the chosen group and its freshly computed validation
#[derive(Debug, Clone)]
pub struct Selection {
    pub strategy: SelectionStrategy,
    /// Status reported by the solver, `None` for the greedy strategies or when no solver was available
    pub status: Option<SolveStatus>,
    pub group: Group,
    pub validation: ValidationResult,
}

/// Selects a group of items from the instance with the strategy of the config.
///
/// [`SelectionStrategy::ExactOptimization`] needs a `solver`. Without one, the selection degrades
/// to an empty group. So does any solver outcome without an assignment.
///
/// Errors only when the program cannot be formulated, i.e. when amounts overflow the
/// coefficients of the program or a share limit is not represented by the configured
/// [`FixedPoint`](crate::util::FixedPoint).
pub fn select(
    instance: &Instance,
    params: &Parameters,
    config: &SelectionConfig,
    solver: Option<&dyn SolverAdapter>,
) -> Result<Selection> {
    let start = Instant::now();

    let (group, status) = match config.strategy {
        SelectionStrategy::Greedy => {
            let selector = GreedySelector::new(GreedyVariant::CapacityOnly);
            (selector.select(instance, params), None)
        }
        SelectionStrategy::GreedyWithPostCheck => {
            let selector = GreedySelector::new(GreedyVariant::PostCheck);
            (selector.select(instance, params), None)
        }
        SelectionStrategy::ExactOptimization => match solver {
            None => {
                warn!("[SELECT] solver unavailable, returning an empty selection");
                (Group::new(), None)
            }
            Some(solver) => {
                let formulation = Formulator::new(config.linearization, config.fixed_point)
                    .formulate(instance, params)?;
                let outcome = solver.solve(&formulation.program, &config.solve_limits);
                match outcome.status {
                    SolveStatus::Error => warn!(
                        "[SELECT] solver {} failed: {}",
                        solver.name(),
                        outcome.diagnostic.as_deref().unwrap_or("no diagnostic")
                    ),
                    SolveStatus::Infeasible | SolveStatus::TimeoutNoSolution => info!(
                        "[SELECT] solver {} returned {}, no items selected",
                        solver.name(),
                        outcome.status
                    ),
                    SolveStatus::Optimal | SolveStatus::Feasible => {}
                }
                (
                    assemble(instance, &formulation, &outcome),
                    Some(outcome.status),
                )
            }
        },
    };

    let validation = score(&group, params);
    if !validation.valid {
        info!(
            "[SELECT] selected group breaks: {}",
            validation.violations.iter().join(", ")
        );
    }
    info!(
        "[SELECT] {:?} selected {} of {} items (value {}) in {:.3}ms",
        config.strategy,
        group.len(),
        instance.len(),
        validation.total_value,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(Selection {
        strategy: config.strategy,
        status,
        group,
        validation,
    })
}
