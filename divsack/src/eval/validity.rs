use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::entities::{Group, Parameters};

/// Aggregate metrics of a [`Group`] and its verdict against a set of [`Parameters`].
/// Derived on demand, never stored alongside the group.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub total_weight: u64,
    pub total_volume: u64,
    pub total_value: u64,
    /// Share of the total value held by the single highest-value item
    pub max_item_value_share: f64,
    /// Highest share of the total value held by one manufacturer
    pub max_manufacturer_share: f64,
    /// Highest share of the total value held by one product type
    pub max_type_share: f64,
    pub valid: bool,
    /// Every limit the group breaks, empty iff `valid`
    pub violations: Vec<Violation>,
}

/// A limit of [`Parameters`] broken by a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Weight,
    Volume,
    MinValue,
    ItemConcentration,
    ManufacturerConcentration(String),
    TypeConcentration(String),
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::Weight => write!(f, "total weight above capacity"),
            Violation::Volume => write!(f, "total volume above capacity"),
            Violation::MinValue => write!(f, "total value below floor"),
            Violation::ItemConcentration => write!(f, "single item share above limit"),
            Violation::ManufacturerConcentration(m) => {
                write!(f, "manufacturer {m:?} share above limit")
            }
            Violation::TypeConcentration(t) => write!(f, "product type {t:?} share above limit"),
        }
    }
}

/// Share of `total` held by `part`, `0` for an empty total
pub fn share(part: u64, total: u64) -> f64 {
    match total {
        0 => 0.0,
        total => part as f64 / total as f64,
    }
}

/// Whether `part` holds more than the `fraction` share of `total`.
/// Decided on the same share that [`ValidationResult`] reports.
pub fn exceeds_share(part: u64, total: u64, fraction: f64) -> bool {
    share(part, total) > fraction
}

/// Scores a group against parameters.
///
/// Pure and deterministic. Share limits are compared against the true ratio. The integer rows of
/// the [`Formulator`](crate::model::Formulator) decide the same thing for every limit the
/// configured [`FixedPoint`](crate::util::FixedPoint) represents.
pub fn score(group: &Group, params: &Parameters) -> ValidationResult {
    let total_weight = group.total_weight();
    let total_volume = group.total_volume();
    let total_value = group.total_value();
    let max_item_value = group.iter().map(|i| i.value).max().unwrap_or(0);

    //value per distinct key, ordered so violations are reported deterministically
    let mut man_values: BTreeMap<&str, u64> = BTreeMap::new();
    let mut type_values: BTreeMap<&str, u64> = BTreeMap::new();
    for item in group {
        let m = man_values.entry(item.manufacturer.as_str()).or_default();
        *m = m.saturating_add(item.value);
        let t = type_values.entry(item.product_type.as_str()).or_default();
        *t = t.saturating_add(item.value);
    }
    let max_man_value = man_values.values().copied().max().unwrap_or(0);
    let max_type_value = type_values.values().copied().max().unwrap_or(0);

    let mut violations = vec![];
    if total_weight > params.max_weight {
        violations.push(Violation::Weight);
    }
    if total_volume > params.max_volume {
        violations.push(Violation::Volume);
    }
    if total_value < params.min_value {
        violations.push(Violation::MinValue);
    }
    if let Some(r) = params.high_value_max {
        if exceeds_share(max_item_value, total_value, r) {
            violations.push(Violation::ItemConcentration);
        }
    }
    if let Some(r) = params.high_man_max {
        violations.extend(
            man_values
                .iter()
                .filter(|(_, v)| exceeds_share(**v, total_value, r))
                .map(|(m, _)| Violation::ManufacturerConcentration(m.to_string())),
        );
    }
    if let Some(r) = params.high_type_max {
        violations.extend(
            type_values
                .iter()
                .filter(|(_, v)| exceeds_share(**v, total_value, r))
                .map(|(t, _)| Violation::TypeConcentration(t.to_string())),
        );
    }

    ValidationResult {
        total_weight,
        total_volume,
        total_value,
        max_item_value_share: share(max_item_value, total_value),
        max_manufacturer_share: share(max_man_value, total_value),
        max_type_share: share(max_type_value, total_value),
        valid: violations.is_empty(),
        violations,
    }
}
