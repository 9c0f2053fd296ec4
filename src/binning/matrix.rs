use serde::Serialize;

use super::classify::{classify, Placement};
use super::intervals::IntervalSet;
use crate::error::{Result, WindroseError};
use crate::models::Sample;

/// Upper bound on direction × speed cells in one matrix.
pub const MAX_CELLS: usize = 1 << 22;

/// Samples that did not make it into the matrix, by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropStats {
    /// Direction or speed was null.
    pub missing: u64,
    /// Direction or speed fell outside the bucket coverage.
    pub out_of_range: u64,
}

impl DropStats {
    pub fn total(&self) -> u64 {
        self.missing + self.out_of_range
    }
}

/// Direction × speed count matrix, row-major by direction bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramMatrix {
    directions: usize,
    speeds: usize,
    cells: Vec<u64>,
    pub dropped: DropStats,
}

impl HistogramMatrix {
    pub fn zeros(directions: usize, speeds: usize) -> Result<Self> {
        let cells = directions
            .checked_mul(speeds)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or(WindroseError::MatrixTooLarge { directions, speeds, limit: MAX_CELLS })?;
        Ok(Self {
            directions,
            speeds,
            cells: vec![0; cells],
            dropped: DropStats::default(),
        })
    }

    /// Counts every sample whose direction and speed both land in a bucket.
    /// The result does not depend on sample order.
    pub fn aggregate(
        samples: &[Sample],
        direction_intervals: &IntervalSet,
        speed_intervals: &IntervalSet,
    ) -> Result<Self> {
        let mut matrix = Self::zeros(direction_intervals.len(), speed_intervals.len())?;

        for sample in samples {
            if sample.speed.is_none() {
                matrix.dropped.missing += 1;
                continue;
            }
            let dir = classify(sample.direction, direction_intervals);
            let speed = classify(sample.speed, speed_intervals);

            match (dir, speed) {
                (Placement::Bucket(j), Placement::Bucket(k)) => matrix.increment(j, k),
                (d, s) if d.is_out_of_range() || s.is_out_of_range() => matrix.dropped.out_of_range += 1,
                _ => matrix.dropped.missing += 1,
            }
        }

        Ok(matrix)
    }

    fn increment(&mut self, direction: usize, speed: usize) {
        self.cells[direction * self.speeds + speed] += 1;
    }

    pub fn directions(&self) -> usize {
        self.directions
    }

    pub fn speeds(&self) -> usize {
        self.speeds
    }

    pub fn get(&self, direction: usize, speed: usize) -> u64 {
        self.cells[direction * self.speeds + speed]
    }

    /// Counts for one direction bucket, in speed bucket order.
    pub fn row(&self, direction: usize) -> &[u64] {
        let start = direction * self.speeds;
        &self.cells[start..start + self.speeds]
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }
}
