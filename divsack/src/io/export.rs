use crate::entities::Parameters;
use crate::io::ext_repr::{ExtChosenItem, ExtSelection};
use crate::select::Selection;

/// Exports a selection out of the library.
/// Only the shares and labels relevant to the limits set in `params` are included.
pub fn export(selection: &Selection, params: &Parameters) -> ExtSelection {
    let v = &selection.validation;
    let with_labels = params.has_concentration_limits();
    let chosen = selection
        .group
        .iter()
        .map(|item| ExtChosenItem {
            manufacturer: with_labels.then(|| item.manufacturer.clone()),
            product_type: with_labels.then(|| item.product_type.clone()),
            value: item.value,
            volume: item.volume,
            weight: item.weight,
        })
        .collect();

    ExtSelection {
        strategy: selection.strategy,
        status: selection.status,
        valid: v.valid,
        total_value: v.total_value,
        total_weight: v.total_weight,
        total_volume: v.total_volume,
        max_item_value_share: params.high_value_max.map(|_| v.max_item_value_share),
        max_manufacturer_share: params.high_man_max.map(|_| v.max_manufacturer_share),
        max_type_share: params.high_type_max.map(|_| v.max_type_share),
        violations: v.violations.iter().map(|v| v.to_string()).collect(),
        chosen,
    }
}
