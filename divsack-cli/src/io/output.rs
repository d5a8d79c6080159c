use std::fmt::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use divsack::io::ext_repr::{ExtItem, ExtParameters, ExtSelection};

use crate::config::DivsackConfig;

/// Contents of the solution file
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SelectOutput {
    pub items: Vec<ExtItem>,
    pub parameters: ExtParameters,
    pub solution: ExtSelection,
    pub config: DivsackConfig,
}

/// Renders the human-readable report of a selection.
///
/// The total value is only listed when `params` set a value floor or a concentration limit,
/// the shares only for the limits that are set. The chosen items are printed as a JSON array
/// indented by four spaces.
pub fn format_report(selection: &ExtSelection, params: &ExtParameters) -> Result<String> {
    let mut report = String::new();
    if let Some(status) = selection.status {
        writeln!(report, "Resp Status: {status}")?;
    }
    let verdict = match selection.valid {
        true => "Valid",
        false => "Invalid",
    };
    writeln!(report, "{verdict} Parameters")?;
    let value_limited = params.min_value > 0
        || params.high_value_max.is_some()
        || params.high_man_max.is_some()
        || params.high_type_max.is_some();
    if value_limited {
        writeln!(report, "Value: {}", selection.total_value)?;
    }
    writeln!(report, "Weight: {}", selection.total_weight)?;
    writeln!(report, "Volume: {}", selection.total_volume)?;
    if let Some(share) = selection.max_item_value_share {
        writeln!(report, "Max Percent of total: {}", format_share(share))?;
    }
    if let Some(share) = selection.max_manufacturer_share {
        writeln!(report, "Man Types: {}", format_share(share))?;
    }
    if let Some(share) = selection.max_type_share {
        writeln!(report, "Prod Types: {}", format_share(share))?;
    }
    writeln!(report)?;
    writeln!(report, "Chosen:")?;

    let mut chosen = vec![];
    let mut ser =
        serde_json::Serializer::with_formatter(&mut chosen, PrettyFormatter::with_indent(b"    "));
    selection.chosen.serialize(&mut ser)?;
    writeln!(report, "{}", String::from_utf8(chosen)?)?;
    Ok(report)
}

/// Six decimals at most, without trailing zeros
pub fn format_share(share: f64) -> String {
    let s = format!("{share:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
