use std::fmt;
use std::ops::Index;

use crate::error::{Result, WindroseError};

/// Upper bound on the intervals one `generate` call may produce.
pub const MAX_INTERVALS: usize = 4096;

fn check_count(start: f64, end: f64, count: f64) -> Result<()> {
    if !count.is_finite() || count > MAX_INTERVALS as f64 {
        return Err(WindroseError::invalid_range(
            start,
            end,
            format!("{} intervals exceed the limit of {}", count, MAX_INTERVALS),
        ));
    }
    Ok(())
}

/// Closed range `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Legend/column label, e.g. `"0 - 10"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.low, self.high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// How the range is split: by number of intervals or by interval width.
/// When both are given the count wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Partition {
    pub count: Option<usize>,
    pub step: Option<f64>,
}

impl Partition {
    pub fn count(count: usize) -> Self {
        Self { count: Some(count), step: None }
    }

    pub fn step(step: f64) -> Self {
        Self { count: None, step: Some(step) }
    }
}

/// Ordered, contiguous, non-empty sequence of intervals.
/// Adjacent intervals share a boundary: `set[i].high == set[i + 1].low`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Builds intervals over `[start, end]`.
    ///
    /// With a count, the range is split evenly and the last interval ends exactly
    /// at `end`. With a step, `count = ceil((end - start) / step)`, so the last
    /// interval may run past `end`. A step over an empty range (`end <= start`)
    /// yields the single interval `[start, start + step]`.
    ///
    /// More than [`MAX_INTERVALS`] intervals is an `InvalidRange`.
    pub fn generate(start: f64, end: f64, partition: Partition) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(WindroseError::invalid_range(start, end, "bounds must be finite"));
        }
        let span = end - start;

        match partition {
            Partition { count: Some(count), .. } => {
                if count == 0 {
                    return Err(WindroseError::invalid_range(start, end, "interval count is zero"));
                }
                check_count(start, end, count as f64)?;
                if !span.is_finite() || span <= 0.0 || span / count as f64 <= 0.0 {
                    return Err(WindroseError::invalid_range(
                        start,
                        end,
                        format!("{} intervals leave no positive width", count),
                    ));
                }
                let bound = |i: usize| if i == count { end } else { start + span * i as f64 / count as f64 };
                let intervals = (0..count).map(|i| Interval::new(bound(i), bound(i + 1))).collect();
                Ok(Self { intervals })
            }
            Partition { count: None, step: Some(step) } => {
                if !step.is_finite() || step <= 0.0 {
                    return Err(WindroseError::invalid_range(
                        start,
                        end,
                        format!("step {} must be finite and positive", step),
                    ));
                }
                let count = if span > 0.0 { (span / step).ceil() } else { 1.0 };
                check_count(start, end, count)?;
                let count = count as usize;
                let intervals = (0..count)
                    .map(|i| Interval::new(start + i as f64 * step, start + (i + 1) as f64 * step))
                    .collect();
                Ok(Self { intervals })
            }
            Partition { count: None, step: None } => {
                Err(WindroseError::invalid_range(start, end, "neither count nor step given"))
            }
        }
    }

    /// Wraps explicit intervals, checking they are non-empty, ordered and contiguous.
    pub fn from_intervals(intervals: Vec<Interval>) -> Result<Self> {
        let (Some(first), Some(last)) = (intervals.first(), intervals.last()) else {
            return Err(WindroseError::invalid_range(f64::NAN, f64::NAN, "interval set is empty"));
        };
        let (start, end) = (first.low, last.high);

        for iv in &intervals {
            if !(iv.low.is_finite() && iv.high.is_finite()) || iv.low > iv.high {
                return Err(WindroseError::invalid_range(start, end, format!("malformed interval {}", iv)));
            }
        }
        if let Some(pair) = intervals.windows(2).find(|w| w[0].high != w[1].low) {
            return Err(WindroseError::invalid_range(
                start,
                end,
                format!("intervals {} and {} are not contiguous", pair[0], pair[1]),
            ));
        }

        Ok(Self { intervals })
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn first(&self) -> &Interval {
        &self.intervals[0]
    }

    pub fn last(&self) -> &Interval {
        &self.intervals[self.intervals.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn labels(&self) -> Vec<String> {
        self.intervals.iter().map(Interval::label).collect()
    }
}

impl Index<usize> for IntervalSet {
    type Output = Interval;

    fn index(&self, index: usize) -> &Interval {
        &self.intervals[index]
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
