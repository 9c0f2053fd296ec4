//! Host data models
//!
//! Series and events as delivered by the dashboard host, deserialized with serde.
//! A data snapshot is a list of series; each datapoint is `[value, timestamp]`
//! where `value` may be `null`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PanelConfig;

/// One `[value, timestamp]` pair. Only the value is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datapoint(pub Option<f64>, pub Option<f64>);

impl Datapoint {
    pub fn value(&self) -> Option<f64> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub target: String,
    #[serde(default)]
    pub datapoints: Vec<Datapoint>,
}

impl Series {
    pub fn new(target: impl Into<String>, values: &[Option<f64>]) -> Self {
        Self {
            target: target.into(),
            datapoints: values.iter().map(|&v| Datapoint(v, None)).collect(),
        }
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.datapoints.iter().map(Datapoint::value).collect()
    }
}

/// A (direction, speed) pair. Direction in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub direction: Option<f64>,
    pub speed: Option<f64>,
}

impl Sample {
    pub fn new(direction: f64, speed: f64) -> Self {
        Self { direction: Some(direction), speed: Some(speed) }
    }
}

/// Samples paired from one data snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingest {
    /// Pairs with a non-null speed, in datapoint order.
    pub samples: Vec<Sample>,
    /// Highest speed seen, 0 when there is none.
    pub speed_max: f64,
    /// Targets that were neither "speed" nor "direction".
    pub unrecognized: Vec<String>,
}

/// Pairs the "direction" and "speed" series by position.
///
/// When a target repeats the last series wins. Pairs without a speed, including
/// those past the end of a shorter speed series, are discarded.
pub fn ingest(series: &[Series]) -> Ingest {
    let mut speeds: Vec<Option<f64>> = Vec::new();
    let mut angles: Vec<Option<f64>> = Vec::new();
    let mut unrecognized = Vec::new();

    for serie in series {
        match serie.target.as_str() {
            "speed" => speeds = serie.values(),
            "direction" => angles = serie.values(),
            other => {
                warn!("unexpected target {}", other);
                unrecognized.push(other.to_string());
            }
        }
    }

    if speeds.len() != angles.len() {
        warn!(
            "speed and direction series differ in length ({} vs {}), unmatched points dropped",
            speeds.len(),
            angles.len()
        );
    }

    let speed_max = speeds.iter().flatten().copied().filter(|v| !v.is_nan()).reduce(f64::max);

    let samples = (0..speeds.len().max(angles.len()))
        .map(|i| Sample {
            direction: angles.get(i).copied().flatten(),
            speed: speeds.get(i).copied().flatten(),
        })
        .filter(|s| s.speed.is_some())
        .collect();

    Ingest {
        samples,
        speed_max: speed_max.unwrap_or(0.0),
        unrecognized,
    }
}

/// Inbound host events, one JSON object per event tagged by `"event"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PanelEvent {
    DataReceived { series: Vec<Series> },
    DataError { message: String },
    ConfigChanged { panel: PanelConfig },
    Resize { width: f64, height: f64 },
    Render,
    Teardown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_by_position_and_drops_null_speed() {
        let series = vec![
            Series::new("direction", &[Some(10.0), Some(20.0), Some(30.0)]),
            Series::new("speed", &[Some(1.0), None, Some(7.5)]),
        ];
        let out = ingest(&series);

        assert_eq!(out.samples, vec![Sample::new(10.0, 1.0), Sample::new(30.0, 7.5)]);
        assert_eq!(out.speed_max, 7.5);
        assert!(out.unrecognized.is_empty());
    }

    #[test]
    fn test_unrecognized_targets_are_reported_not_fatal() {
        let series = vec![
            Series::new("speed", &[Some(2.0)]),
            Series::new("gust", &[Some(9.0)]),
            Series::new("direction", &[Some(90.0)]),
        ];
        let out = ingest(&series);
        assert_eq!(out.unrecognized, vec!["gust".to_string()]);
        assert_eq!(out.samples, vec![Sample::new(90.0, 2.0)]);
        assert_eq!(out.speed_max, 2.0);
    }

    #[test]
    fn test_length_mismatch_keeps_speed_with_missing_direction() {
        let series = vec![
            Series::new("direction", &[Some(10.0)]),
            Series::new("speed", &[Some(1.0), Some(3.0)]),
        ];
        let out = ingest(&series);
        assert_eq!(out.samples.len(), 2);
        assert_eq!(out.samples[1], Sample { direction: None, speed: Some(3.0) });
    }

    #[test]
    fn test_no_speeds() {
        let out = ingest(&[Series::new("direction", &[Some(10.0)])]);
        assert!(out.samples.is_empty());
        assert_eq!(out.speed_max, 0.0);
    }

    #[test]
    fn test_event_json() {
        let raw = r#"{"event":"data-received","series":[{"target":"speed","datapoints":[[3.5,1700000000000],[null,1700000060000]]}]}"#;
        let event: PanelEvent = serde_json::from_str(raw).unwrap();
        let PanelEvent::DataReceived { series } = event else {
            panic!("wrong variant");
        };
        assert_eq!(series[0].values(), vec![Some(3.5), None]);

        let resize: PanelEvent = serde_json::from_str(r#"{"event":"resize","width":800,"height":600}"#).unwrap();
        assert_eq!(resize, PanelEvent::Resize { width: 800.0, height: 600.0 });

        let cfg: PanelEvent = serde_json::from_str(r#"{"event":"config-changed","panel":{"slices":8,"step":""}}"#).unwrap();
        let PanelEvent::ConfigChanged { panel } = cfg else {
            panic!("wrong variant");
        };
        assert_eq!(panel.slices, 8);
        assert_eq!(panel.unit, "m/s");
    }
}
