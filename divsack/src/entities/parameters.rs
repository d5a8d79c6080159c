use anyhow::{Result, ensure};

/// Limits a [`Group`](crate::entities::Group) has to respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub max_weight: u64,
    pub max_volume: u64,
    /// Floor on the total selected value, `0` means no floor
    pub min_value: u64,
    /// Max share of the total value held by the single highest-value item, `None` means no limit
    pub high_value_max: Option<f64>,
    /// Max share of the total value held by any one manufacturer, `None` means no limit
    pub high_man_max: Option<f64>,
    /// Max share of the total value held by any one product type, `None` means no limit
    pub high_type_max: Option<f64>,
}

impl Parameters {
    /// Parameters with only capacity limits
    pub fn capacity_only(max_weight: u64, max_volume: u64) -> Self {
        Self {
            max_weight,
            max_volume,
            min_value: 0,
            high_value_max: None,
            high_man_max: None,
            high_type_max: None,
        }
    }

    pub fn try_new(
        max_weight: u64,
        max_volume: u64,
        min_value: u64,
        high_value_max: Option<f64>,
        high_man_max: Option<f64>,
        high_type_max: Option<f64>,
    ) -> Result<Self> {
        for (name, limit) in [
            ("high_value_max", high_value_max),
            ("high_man_max", high_man_max),
            ("high_type_max", high_type_max),
        ] {
            if let Some(r) = limit {
                ensure!(
                    r > 0.0 && r <= 1.0,
                    "{name} should be a fraction in (0, 1], got {r}"
                );
            }
        }
        Ok(Self {
            max_weight,
            max_volume,
            min_value,
            high_value_max,
            high_man_max,
            high_type_max,
        })
    }

    /// True if any of the value-share limits is defined
    pub fn has_concentration_limits(&self) -> bool {
        self.high_value_max.is_some() || self.high_man_max.is_some() || self.high_type_max.is_some()
    }
}
