use serde::{Deserialize, Serialize};

use crate::solver::SolveStatus;
use crate::util::SelectionStrategy;

/// External representation of an [`Item`](crate::entities::Item).
/// Its position in the list of items is its identity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtItem {
    pub value: u64,
    pub weight: u64,
    pub volume: u64,
    pub manufacturer: String,
    pub product_type: String,
}

/// External representation of [`Parameters`](crate::entities::Parameters).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtParameters {
    pub max_weight: u64,
    pub max_volume: u64,
    /// Floor on the total value, no floor if absent or 0
    #[serde(default)]
    pub min_value: u64,
    /// No limit if absent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub high_value_max: Option<f64>,
    /// No limit if absent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub high_man_max: Option<f64>,
    /// No limit if absent
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub high_type_max: Option<f64>,
}

/// A chosen item as reported, keys in alphabetical order.
/// The labels are only present when a concentration limit was set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtChosenItem {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product_type: Option<String>,
    pub value: u64,
    pub volume: u64,
    pub weight: u64,
}

/// External representation of a [`Selection`](crate::select::Selection).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSelection {
    pub strategy: SelectionStrategy,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<SolveStatus>,
    pub valid: bool,
    pub total_value: u64,
    pub total_weight: u64,
    pub total_volume: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_item_value_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_manufacturer_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_type_share: Option<f64>,
    /// Descriptions of every broken limit
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub violations: Vec<String>,
    pub chosen: Vec<ExtChosenItem>,
}
