use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, info};

use crate::entities::{Group, Instance, Item, Parameters};
use crate::eval::exceeds_share;
use crate::util::assertions;

/// Admission order of the greedy pass:
/// descending by value, then by weight, then by volume.
/// The sort is stable, remaining ties keep their input order.
pub fn greedy_order(instance: &Instance) -> Vec<usize> {
    (0..instance.len())
        .sorted_by_key(|&i| {
            let item = instance.item(i);
            Reverse((item.value, item.weight, item.volume))
        })
        .collect_vec()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreedyVariant {
    /// Capacity constraints only, the admitted group is returned as is
    CapacityOnly,
    /// After the pass, the whole group is discarded if it breaks the value floor
    /// or any concentration limit
    PostCheck,
}

/// Single forward pass admitting every item that keeps the running weight and volume within capacity.
///
/// Neither variant is complete: an early admission can crowd out later items that would have
/// formed a valid group of higher value. The post-check only detects a violation of the final
/// aggregate and then discards everything; it never repairs the group.
#[derive(Debug, Clone, Copy)]
pub struct GreedySelector {
    pub variant: GreedyVariant,
}

impl GreedySelector {
    pub fn new(variant: GreedyVariant) -> Self {
        Self { variant }
    }

    /// Sorts the instance with [`greedy_order`] and runs the pass
    pub fn select(&self, instance: &Instance, params: &Parameters) -> Group {
        let ordered = greedy_order(instance)
            .into_iter()
            .map(|i| instance.item(i));
        self.select_ordered(ordered, params)
    }

    /// Runs the pass over items in the order given
    pub fn select_ordered<'a>(
        &self,
        items: impl IntoIterator<Item = &'a Item>,
        params: &Parameters,
    ) -> Group {
        let mut group = Group::new();
        let (mut weight, mut volume, mut total) = (0u64, 0u64, 0u64);
        let mut man_totals: HashMap<&str, u64> = HashMap::new();
        let mut type_totals: HashMap<&str, u64> = HashMap::new();

        for item in items {
            let next_weight = weight.saturating_add(item.weight);
            let next_volume = volume.saturating_add(item.volume);
            if next_weight > params.max_weight || next_volume > params.max_volume {
                debug!(
                    "[GREEDY] rejecting item {} (weight {next_weight}/{}, volume {next_volume}/{})",
                    item.id, params.max_weight, params.max_volume
                );
                continue;
            }
            (weight, volume) = (next_weight, next_volume);
            total = total.saturating_add(item.value);
            let man_total = man_totals.entry(item.manufacturer.as_str()).or_default();
            *man_total = man_total.saturating_add(item.value);
            let type_total = type_totals.entry(item.product_type.as_str()).or_default();
            *type_total = type_total.saturating_add(item.value);
            debug!("[GREEDY] admitting item {} (value {})", item.id, item.value);
            group.push(item.clone());
        }
        debug_assert!(assertions::group_prefixes_within_capacity(&group, params));

        if self.variant == GreedyVariant::PostCheck {
            let max_item_value = group.iter().map(|i| i.value).max().unwrap_or(0);
            let rejection = if total < params.min_value {
                Some("total value below floor")
            } else if params
                .high_value_max
                .is_some_and(|r| exceeds_share(max_item_value, total, r))
            {
                Some("single item share above limit")
            } else if params
                .high_man_max
                .is_some_and(|r| man_totals.values().any(|&v| exceeds_share(v, total, r)))
            {
                Some("manufacturer share above limit")
            } else if params
                .high_type_max
                .is_some_and(|r| type_totals.values().any(|&v| exceeds_share(v, total, r)))
            {
                Some("product type share above limit")
            } else {
                None
            };

            if let Some(reason) = rejection {
                info!(
                    "[GREEDY] discarding group of {} items with value {total}: {reason}",
                    group.len()
                );
                return Group::new();
            }
        }

        info!(
            "[GREEDY] admitted {} items, value {total}, weight {weight}/{}, volume {volume}/{}",
            group.len(),
            params.max_weight,
            params.max_volume
        );
        group
    }
}
