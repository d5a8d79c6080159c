use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::entities::Parameters;

/// Fixed-point representation of the fractional limits in the integer program.
///
/// A fraction `r` is represented by `units(r) = round(r * scale)`, and "`part / total <= r`" is
/// encoded as the integer row `part * scale <= units(r) * total`.
/// Only fractions that are a whole number of units are accepted, so the rows decide exactly
/// what [`score`](crate::eval::score) decides.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "FixedPointRepr")]
pub struct FixedPoint {
    scale: u32,
}

#[derive(Deserialize)]
struct FixedPointRepr {
    scale: u32,
}

impl TryFrom<FixedPointRepr> for FixedPoint {
    type Error = anyhow::Error;

    fn try_from(repr: FixedPointRepr) -> Result<Self> {
        FixedPoint::try_new(repr.scale)
    }
}

impl FixedPoint {
    pub const DEFAULT_SCALE: u32 = 1000;

    pub fn try_new(scale: u32) -> Result<Self> {
        ensure!(scale > 0, "fixed-point scale must be positive");
        Ok(Self { scale })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Fixed-point units of a fraction
    pub fn units(&self, fraction: f64) -> u64 {
        debug_assert!(fraction.is_finite() && fraction >= 0.0);
        (fraction * self.scale as f64).round() as u64
    }

    /// Whether `fraction` is exactly a whole number of units.
    /// `units / scale` is correctly rounded, as is the parsing of a decimal limit,
    /// so e.g. `0.7` is represented at scale 1000 and `0.6666` is not.
    pub fn represents(&self, fraction: f64) -> bool {
        self.units(fraction) as f64 / self.scale as f64 == fraction
    }

    /// Ensures every fractional limit of `params` is represented at this scale
    pub fn check_limits(&self, params: &Parameters) -> Result<()> {
        for (name, limit) in [
            ("high_value_max", params.high_value_max),
            ("high_man_max", params.high_man_max),
            ("high_type_max", params.high_type_max),
        ] {
            if let Some(r) = limit {
                ensure!(
                    self.represents(r),
                    "{name} = {r} is not a multiple of 1/{}, increase the fixed-point scale",
                    self.scale
                );
            }
        }
        Ok(())
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
        }
    }
}
