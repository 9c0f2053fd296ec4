use serde::{Deserialize, Serialize};

use super::rows::Row;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Raw sample counts.
    #[default]
    Absolute,
    /// Fractions of the grand total across all rows.
    Percent,
}

/// Rescales rows for display.
///
/// Percent mode divides every value and every row total by the sum of all row
/// totals (one shared denominator, not per row). With nothing counted the rows
/// are returned unchanged.
pub fn normalize(mut rows: Vec<Row>, mode: ScaleMode) -> Vec<Row> {
    if mode == ScaleMode::Absolute {
        return rows;
    }

    let grand_total: f64 = rows.iter().map(|r| r.total).sum();
    if grand_total == 0.0 {
        return rows;
    }

    for row in &mut rows {
        for (_, value) in &mut row.counts {
            *value /= grand_total;
        }
        row.total /= grand_total;
    }
    rows
}
