use serde::ser::{Serialize, SerializeMap, Serializer};

use super::intervals::IntervalSet;
use super::matrix::HistogramMatrix;

/// One direction bucket's values, keyed by speed bucket label.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub angle_start: f64,
    /// `(label, value)` pairs in speed bucket order.
    pub counts: Vec<(String, f64)>,
    pub total: f64,
}

impl Row {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.counts.iter().find(|(l, _)| l == label).map(|&(_, v)| v)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.counts.iter().map(|&(_, v)| v)
    }
}

/// Flat renderer form: `{"angle": 0, "0 - 10": 3, "10 - 20": 1, "total": 4}`,
/// label keys in stacking order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 2))?;
        map.serialize_entry("angle", &self.angle_start)?;
        for (label, value) in &self.counts {
            map.serialize_entry(label, value)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// One row per direction bucket, in direction order.
pub fn project(matrix: &HistogramMatrix, direction_intervals: &IntervalSet, speed_intervals: &IntervalSet) -> Vec<Row> {
    let labels = speed_intervals.labels();

    direction_intervals
        .iter()
        .enumerate()
        .map(|(d, dir)| {
            let counts: Vec<(String, f64)> = labels
                .iter()
                .zip(matrix.row(d))
                .map(|(label, &count)| (label.clone(), count as f64))
                .collect();
            let total = counts.iter().map(|&(_, v)| v).sum();
            Row { angle_start: dir.low, counts, total }
        })
        .collect()
}
