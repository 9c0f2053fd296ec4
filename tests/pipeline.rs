use windrose_panel::binning::{classify, normalize, project, HistogramMatrix, IntervalSet, Partition, ScaleMode};
use windrose_panel::config::{PanelConfig, StepSetting};
use windrose_panel::models::{ingest, Sample, Series};
use windrose_panel::pipeline::compute;
use windrose_panel::WindroseError;

fn quadrant_samples() -> Vec<Sample> {
    vec![
        Sample::new(0.0, 5.0),
        Sample::new(90.0, 5.0),
        Sample::new(180.0, 15.0),
        Sample::new(270.0, 15.0),
    ]
}

#[test]
fn quadrant_scenario_step_by_step() {
    let dirs = IntervalSet::generate(0.0, 360.0, Partition::count(4)).unwrap();
    let speeds = IntervalSet::generate(0.0, 20.0, Partition::step(10.0)).unwrap();

    // 90 and 270 sit on shared boundaries and go to the lower bucket.
    let placed: Vec<(usize, usize)> = quadrant_samples()
        .iter()
        .map(|s| {
            (
                classify(s.direction, &dirs).index().unwrap(),
                classify(s.speed, &speeds).index().unwrap(),
            )
        })
        .collect();
    assert_eq!(placed, vec![(0, 0), (0, 0), (1, 1), (2, 1)]);

    let matrix = HistogramMatrix::aggregate(&quadrant_samples(), &dirs, &speeds).unwrap();
    assert_eq!(matrix.total(), 4);

    let rows = project(&matrix, &dirs, &speeds);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows.iter().map(|r| r.total).sum::<f64>(), 4.0);

    let percent = normalize(rows, ScaleMode::Percent);
    let sum: f64 = percent.iter().map(|r| r.total).sum();
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn off_boundary_quadrants_give_one_count_each() {
    let samples: Vec<Sample> = [(10.0, 5.0), (100.0, 5.0), (190.0, 15.0), (280.0, 15.0)]
        .iter()
        .map(|&(d, s)| Sample::new(d, s))
        .collect();
    let cfg = PanelConfig {
        slices: 4,
        step: StepSetting::Fixed(10.0),
        scale: ScaleMode::Percent,
        ..PanelConfig::default()
    };
    let chart = compute(&samples, 20.0, &cfg).unwrap();

    assert_eq!(chart.rows[0].get("0 - 10"), Some(0.25));
    assert_eq!(chart.rows[1].get("0 - 10"), Some(0.25));
    assert_eq!(chart.rows[2].get("10 - 20"), Some(0.25));
    assert_eq!(chart.rows[3].get("10 - 20"), Some(0.25));
    assert!(chart.rows.iter().all(|r| r.total == 0.25));
}

#[test]
fn matrix_total_matches_classified_samples() {
    let dirs = IntervalSet::generate(0.0, 360.0, Partition::count(16)).unwrap();
    let speeds = IntervalSet::generate(2.0, 12.0, Partition::step(2.5)).unwrap();

    let samples: Vec<Sample> = (0..400)
        .map(|i| Sample {
            direction: if i % 23 == 0 { None } else { Some((i * 13 % 400) as f64) },
            speed: if i % 17 == 0 { None } else { Some((i % 31) as f64 * 0.5) },
        })
        .collect();

    let expected = samples
        .iter()
        .filter(|s| {
            s.speed.is_some()
                && classify(s.direction, &dirs).index().is_some()
                && classify(s.speed, &speeds).index().is_some()
        })
        .count() as u64;

    let matrix = HistogramMatrix::aggregate(&samples, &dirs, &speeds).unwrap();
    assert_eq!(matrix.total(), expected);
    assert!(matrix.total() < samples.len() as u64);
    assert_eq!(matrix.total() + matrix.dropped.total(), samples.len() as u64);
}

#[test]
fn host_snapshot_to_chart() {
    let series: Vec<Series> = serde_json::from_str(
        r#"[
            {"target": "direction", "datapoints": [[350, 1], [10, 2], [185, 3], [190, 4]]},
            {"target": "speed", "datapoints": [[3.0, 1], [null, 2], [11.5, 3], [4.0, 4]]},
            {"target": "temperature", "datapoints": [[21.0, 1]]}
        ]"#,
    )
    .unwrap();

    let snapshot = ingest(&series);
    assert_eq!(snapshot.samples.len(), 3);
    assert_eq!(snapshot.speed_max, 11.5);
    assert_eq!(snapshot.unrecognized, vec!["temperature".to_string()]);

    let cfg = PanelConfig { slices: 8, ..PanelConfig::default() };
    let chart = compute(&snapshot.samples, snapshot.speed_max, &cfg).unwrap();

    // auto step ceil(11.5 / 8) = 2 → 0 - 2 ... 10 - 12
    assert_eq!(chart.labels.first().map(String::as_str), Some("0 - 2"));
    assert_eq!(chart.labels.len(), 6);
    assert_eq!(chart.grand_total(), 3.0);
    assert_eq!(chart.rows[7].get("2 - 4"), Some(1.0));
    assert_eq!(chart.rows[4].total, 2.0);
}

#[test]
fn collapsed_range_is_reported_not_panicking() {
    let cfg = PanelConfig::default();
    let snapshot = ingest(&[Series::new("speed", &[None, None]), Series::new("direction", &[Some(1.0), Some(2.0)])]);
    assert!(snapshot.samples.is_empty());
    assert!(matches!(
        compute(&snapshot.samples, snapshot.speed_max, &cfg),
        Err(WindroseError::InvalidRange { .. })
    ));
}

#[test]
fn outlier_speed_is_reported_not_panicking() {
    let cfg = PanelConfig { step: StepSetting::Fixed(1.0), ..PanelConfig::default() };
    let snapshot = ingest(&[
        Series::new("direction", &[Some(90.0), Some(180.0)]),
        Series::new("speed", &[Some(4.0), Some(1e300)]),
    ]);
    assert_eq!(snapshot.speed_max, 1e300);
    assert!(matches!(
        compute(&snapshot.samples, snapshot.speed_max, &cfg),
        Err(WindroseError::InvalidRange { .. })
    ));
}
