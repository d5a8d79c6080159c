use log::debug;

use crate::entities::{Group, Instance};
use crate::model::Formulation;
use crate::solver::SolveOutcome;
use crate::util::assertions;

/// Maps a solver outcome back onto the items of the instance.
///
/// An outcome with an assignment yields the items whose decision variable is set, in instance order.
/// Any other outcome yields an empty group.
pub fn assemble(instance: &Instance, formulation: &Formulation, outcome: &SolveOutcome) -> Group {
    let Some(assignment) = outcome
        .assignment
        .as_ref()
        .filter(|_| outcome.status.has_solution())
    else {
        debug!("[ASSEMBLE] no assignment for status {}", outcome.status);
        return Group::new();
    };
    debug_assert!(assertions::assignment_within_bounds(
        &formulation.program,
        assignment
    ));

    let group = instance
        .items
        .iter()
        .zip(&formulation.decisions)
        .filter(|(_, var)| assignment.is_set(**var))
        .map(|(item, _)| item.clone())
        .collect::<Group>();

    debug_assert!(assertions::group_in_instance_order(&group));
    group
}
