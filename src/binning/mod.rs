//! Wind rose binning
//!
//! - `intervals`: contiguous interval generation over a range
//! - `classify`: value → bucket index, lower bucket wins on shared boundaries
//! - `matrix`: direction × speed count matrix
//! - `rows`: per-direction rows keyed by speed label
//! - `scale`: absolute / percent scaling

pub mod classify;
pub mod intervals;
pub mod matrix;
pub mod rows;
pub mod scale;

pub use classify::{classify, Placement};
pub use intervals::{Interval, IntervalSet, Partition, MAX_INTERVALS};
pub use matrix::{DropStats, HistogramMatrix, MAX_CELLS};
pub use rows::{project, Row};
pub use scale::{normalize, ScaleMode};
