use anyhow::{Context, Result};

use crate::entities::{Instance, Item, Parameters};
use crate::io::ext_repr::{ExtItem, ExtParameters};

/// Items receive their position in `ext_items` as id
pub fn import_instance(ext_items: &[ExtItem]) -> Instance {
    let items = ext_items
        .iter()
        .enumerate()
        .map(|(id, ext)| {
            Item::new(
                id,
                ext.value,
                ext.weight,
                ext.volume,
                ext.manufacturer.as_str(),
                ext.product_type.as_str(),
            )
        })
        .collect();
    Instance::new(items)
}

pub fn import_parameters(ext_params: &ExtParameters) -> Result<Parameters> {
    Parameters::try_new(
        ext_params.max_weight,
        ext_params.max_volume,
        ext_params.min_value,
        ext_params.high_value_max,
        ext_params.high_man_max,
        ext_params.high_type_max,
    )
    .context("invalid parameters")
}
