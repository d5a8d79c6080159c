use itertools::Itertools;

use crate::entities::{Group, Item, Parameters};
use crate::model::Program;
use crate::solver::Assignment;

//Various checks to verify correctness of the state of the system
//Used in debug_assert!() blocks

pub fn instance_item_ids_correct(items: &[Item]) -> bool {
    items.iter().enumerate().all(|(i, item)| item.id == i)
}

/// Running weight and volume stay within capacity for every prefix of the group
pub fn group_prefixes_within_capacity(group: &Group, params: &Parameters) -> bool {
    group
        .iter()
        .scan((0u64, 0u64), |(w, v), item| {
            *w = w.saturating_add(item.weight);
            *v = v.saturating_add(item.volume);
            Some((*w, *v))
        })
        .all(|(w, v)| w <= params.max_weight && v <= params.max_volume)
}

/// Items of the group appear at most once and in increasing id order
pub fn group_in_instance_order(group: &Group) -> bool {
    group.item_ids().tuple_windows().all(|(a, b)| a < b)
}

/// Every variable of the assignment lies within its bounds
pub fn assignment_within_bounds(program: &Program, assignment: &Assignment) -> bool {
    assignment.len() == program.n_variables()
        && program
            .variables()
            .iter()
            .enumerate()
            .all(|(i, var)| (var.lower..=var.upper).contains(&assignment.values()[i]))
}
