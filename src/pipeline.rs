//! Samples + panel configuration → wind rose rows.
//!
//! Stateless: every call rebuilds intervals, matrix and rows from scratch.

use serde::Serialize;
use tracing::debug;

use crate::binning::{normalize, project, DropStats, HistogramMatrix, IntervalSet, Partition, Row, ScaleMode};
use crate::config::PanelConfig;
use crate::error::Result;
use crate::models::Sample;

/// Everything the renderer needs to draw one wind rose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindroseChart {
    pub rows: Vec<Row>,
    /// Speed bucket labels in stacking/legend order.
    pub labels: Vec<String>,
    pub unit: String,
    pub scale: ScaleMode,
    #[serde(skip)]
    pub direction_intervals: IntervalSet,
    #[serde(skip)]
    pub speed_intervals: IntervalSet,
    pub dropped: DropStats,
}

impl WindroseChart {
    /// Sum of row totals: the sample count in absolute mode, ~1.0 in percent mode.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }
}

pub fn compute(samples: &[Sample], speed_max: f64, cfg: &PanelConfig) -> Result<WindroseChart> {
    let direction_intervals = IntervalSet::generate(0.0, 360.0, Partition::count(cfg.slices))?;

    let step = cfg.resolve_step(speed_max);
    let speed_intervals = IntervalSet::generate(cfg.start, speed_max, Partition::step(step))?;
    debug!(
        "speed_max={} step={} direction buckets={} speed buckets={}",
        speed_max,
        step,
        direction_intervals.len(),
        speed_intervals.len()
    );

    let matrix = HistogramMatrix::aggregate(samples, &direction_intervals, &speed_intervals)?;
    if matrix.dropped.total() > 0 {
        debug!(
            "{} samples dropped ({} missing, {} out of range)",
            matrix.dropped.total(),
            matrix.dropped.missing,
            matrix.dropped.out_of_range
        );
    }

    let rows = normalize(project(&matrix, &direction_intervals, &speed_intervals), cfg.scale);

    Ok(WindroseChart {
        rows,
        labels: speed_intervals.labels(),
        unit: cfg.unit.clone(),
        scale: cfg.scale,
        direction_intervals,
        speed_intervals,
        dropped: matrix.dropped,
    })
}
