use tracing::{debug, warn};

use super::intervals::IntervalSet;

/// Where a value landed relative to an interval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Bucket(usize),
    /// No value (null datapoint).
    Missing,
    BelowRange,
    /// Past the last interval; reported as out of range.
    AboveRange,
}

impl Placement {
    pub fn index(self) -> Option<usize> {
        match self {
            Placement::Bucket(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_out_of_range(self) -> bool {
        matches!(self, Placement::BelowRange | Placement::AboveRange)
    }
}

/// Finds the interval holding `value`.
///
/// Intervals are closed on both ends and scanned in ascending order, so a value
/// sitting exactly on a shared boundary goes to the lower bucket:
/// with `[[0, 10], [10, 20]]`, `10` lands in bucket 0. Stacking relies on this.
pub fn classify(value: Option<f64>, intervals: &IntervalSet) -> Placement {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        debug!("Unexpected value is null");
        return Placement::Missing;
    };

    if value < intervals.first().low {
        return Placement::BelowRange;
    }

    if let Some(i) = intervals.iter().position(|iv| iv.contains(value)) {
        return Placement::Bucket(i);
    }

    warn!("Unexpected {} greater than {}", value, intervals.last().high);
    Placement::AboveRange
}
