//! Polar geometry for drawing a wind rose.
//!
//! Turns a [`WindroseChart`] and a panel size into stacked arc segments, radial
//! ticks, compass labels and legend entries. Angles are radians clockwise from
//! north; radii are pixels from the center.

use serde::Serialize;
use std::f64::consts::PI;

use crate::binning::ScaleMode;
use crate::pipeline::WindroseChart;

pub const PALETTE: [&str; 8] = [
    "#4242f4", "#42c5f4", "#42f4ce", "#42f456", "#adf442", "#f4e242", "#f4a142", "#f44242",
];

const MARGIN_TOP: f64 = 40.0;
const MARGIN_RIGHT: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_LEFT: f64 = 40.0;

const PAD_ANGLE: f64 = 0.01;
const RADIAL_TICK_COUNT: usize = 5;
const COMPASS_DIVISIONS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcSegment {
    pub label: String,
    pub color: &'static str,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Stacked value range covered by this segment.
    pub y0: f64,
    pub y1: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialTick {
    pub value: f64,
    pub radius: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompassLabel {
    pub degrees: f64,
    pub radians: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub text: String,
    pub color: &'static str,
    /// Offset of the swatch from the chart center.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Angular width of one direction bucket.
    pub band_width: f64,
    pub pad_angle: f64,
    pub y_max: f64,
    pub arcs: Vec<ArcSegment>,
    pub radial_ticks: Vec<RadialTick>,
    pub compass: Vec<CompassLabel>,
    pub legend: Vec<LegendEntry>,
}

/// Linear `[0, y_max] → [0, outer]`. A zero domain maps everything to 0.
#[derive(Debug, Clone, Copy)]
struct RadiusScale {
    y_max: f64,
    outer: f64,
}

impl RadiusScale {
    fn radius(&self, value: f64) -> f64 {
        if self.y_max > 0.0 {
            value / self.y_max * self.outer
        } else {
            0.0
        }
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees / 360.0 * 2.0 * PI
}

/// Color for the label at `index` in legend order; cycles past the palette.
pub fn label_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

impl Layout {
    pub fn build(chart: &WindroseChart, width: f64, height: f64) -> Self {
        let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
        let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;
        let outer_radius = (chart_width.min(chart_height) / 2.0).max(0.0);
        let inner_radius = 0.0;

        let band_width = if chart.rows.is_empty() { 0.0 } else { 2.0 * PI / chart.rows.len() as f64 };
        let y_max = chart.rows.iter().map(|r| r.total).fold(0.0, f64::max);
        let scale = RadiusScale { y_max, outer: outer_radius };

        let mut arcs = Vec::with_capacity(chart.rows.len() * chart.labels.len());
        for row in &chart.rows {
            let start_angle = degrees_to_radians(row.angle_start);
            let mut y0 = 0.0;
            for (k, (label, value)) in row.counts.iter().enumerate() {
                let y1 = y0 + value;
                arcs.push(ArcSegment {
                    label: label.clone(),
                    color: label_color(k),
                    start_angle,
                    end_angle: start_angle + band_width,
                    y0,
                    y1,
                    inner_radius: scale.radius(y0),
                    outer_radius: scale.radius(y1),
                });
                y0 = y1;
            }
        }

        let ticks = nice_ticks(0.0, y_max, RADIAL_TICK_COUNT);
        let radial_ticks = ticks
            .values
            .iter()
            .skip(1)
            .map(|&value| RadialTick {
                value,
                radius: scale.radius(value),
                text: format_tick(value, ticks.step, chart.scale),
            })
            .collect();

        let compass = (0..COMPASS_DIVISIONS)
            .map(|i| {
                let degrees = i as f64 * 360.0 / COMPASS_DIVISIONS as f64;
                CompassLabel { degrees, radians: degrees_to_radians(degrees) }
            })
            .collect();

        let n = chart.labels.len() as f64;
        let legend = chart
            .labels
            .iter()
            .enumerate()
            .rev()
            .enumerate()
            .map(|(i, (k, label))| LegendEntry {
                label: label.clone(),
                text: format!("{} {}", label, chart.unit),
                color: label_color(k),
                x: outer_radius + 30.0,
                y: -outer_radius + 40.0 + (i as f64 - n / 2.0) * 20.0,
            })
            .collect();

        Self {
            width,
            height,
            inner_radius,
            outer_radius,
            band_width,
            pad_angle: PAD_ANGLE,
            y_max,
            arcs,
            radial_ticks,
            compass,
            legend,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    pub values: Vec<f64>,
    /// Spacing between ticks; 0 when there are none.
    pub step: f64,
}

/// Round-number ticks over `[start, stop]`: roughly `count` of them, spaced by
/// 1, 2 or 5 times a power of ten.
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Ticks {
    let empty = Ticks { values: Vec::new(), step: 0.0 };
    if count == 0 || !start.is_finite() || !stop.is_finite() || stop <= start {
        return empty;
    }

    let raw_step = (stop - start) / count as f64;
    let power = raw_step.log10().floor();
    let error = raw_step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Small steps divide by an integer increment to keep decimals exact.
    let (values, step) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round();
        let mut i2 = (stop * inc).round();
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        let values = (i1 as i64..=i2 as i64).map(|i| i as f64 / inc).collect();
        (values, 1.0 / inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        let values = (i1 as i64..=i2 as i64).map(|i| i as f64 * inc).collect();
        (values, inc)
    };

    Ticks { values, step }
}

/// Tick text with just enough decimals for the tick spacing.
pub fn format_tick(value: f64, step: f64, scale: ScaleMode) -> String {
    let decimals = |s: f64| -> usize {
        if s > 0.0 && s.is_finite() {
            (-s.log10().floor()).max(0.0) as usize
        } else {
            0
        }
    };
    match scale {
        ScaleMode::Percent => format!("{:.*}%", decimals(step * 100.0), value * 100.0),
        ScaleMode::Absolute => format!("{:.*}", decimals(step), value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PanelConfig, StepSetting};
    use crate::models::Sample;
    use crate::pipeline::compute;

    fn chart(scale: ScaleMode) -> WindroseChart {
        let cfg = PanelConfig {
            slices: 4,
            step: StepSetting::Fixed(10.0),
            scale,
            ..PanelConfig::default()
        };
        let samples = [
            Sample::new(0.0, 5.0),
            Sample::new(0.0, 15.0),
            Sample::new(0.0, 15.0),
            Sample::new(100.0, 5.0),
        ];
        compute(&samples, 20.0, &cfg).unwrap()
    }

    #[test]
    fn test_radius_and_band_width() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 600.0, 400.0);
        // min(600 - 120, 400 - 80) / 2
        assert_eq!(layout.outer_radius, 160.0);
        assert!((layout.band_width - PI / 2.0).abs() < 1e-12);
        assert_eq!(layout.y_max, 3.0);
    }

    #[test]
    fn test_tiny_panel_clamps_radius() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 50.0, 50.0);
        assert_eq!(layout.outer_radius, 0.0);
    }

    #[test]
    fn test_arcs_stack_in_label_order() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 600.0, 400.0);
        assert_eq!(layout.arcs.len(), 8);

        let north: Vec<&ArcSegment> = layout.arcs.iter().filter(|a| a.start_angle == 0.0).collect();
        assert_eq!(north[0].label, "0 - 10");
        assert_eq!((north[0].y0, north[0].y1), (0.0, 1.0));
        assert_eq!((north[1].y0, north[1].y1), (1.0, 3.0));
        assert_eq!(north[1].outer_radius, 160.0);
        assert_eq!(north[0].color, PALETTE[0]);
        assert_eq!(north[1].color, PALETTE[1]);

        let east = layout.arcs.iter().find(|a| a.label == "0 - 10" && a.start_angle > 0.0).unwrap();
        assert!((east.start_angle - PI / 2.0).abs() < 1e-12);
        assert!((east.end_angle - PI).abs() < 1e-12);
    }

    #[test]
    fn test_legend_is_reversed_with_unit() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 600.0, 400.0);
        let texts: Vec<&str> = layout.legend.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["10 - 20 m/s", "0 - 10 m/s"]);
        assert_eq!(layout.legend[0].color, PALETTE[1]);
        assert_eq!(layout.legend[0].y, -160.0 + 40.0 - 20.0);
    }

    #[test]
    fn test_compass_labels() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 600.0, 400.0);
        let degrees: Vec<f64> = layout.compass.iter().map(|c| c.degrees).collect();
        assert_eq!(degrees, vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]);
    }

    #[test]
    fn test_radial_ticks_skip_zero() {
        let layout = Layout::build(&chart(ScaleMode::Absolute), 600.0, 400.0);
        let texts: Vec<&str> = layout.radial_ticks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["0.5", "1.0", "1.5", "2.0", "2.5", "3.0"]);
    }

    #[test]
    fn test_percent_ticks() {
        let layout = Layout::build(&chart(ScaleMode::Percent), 600.0, 400.0);
        let texts: Vec<&str> = layout.radial_ticks.iter().map(|t| t.text.as_str()).collect();
        // y_max = 0.75
        assert_eq!(texts, vec!["20%", "40%", "60%"]);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5).values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 100.0, 5).step, 20.0);
        assert_eq!(nice_ticks(0.0, 1.0, 5).values, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!(nice_ticks(0.0, 0.0, 5).values.is_empty());
    }

    #[test]
    fn test_empty_chart_has_no_radii() {
        let cfg = PanelConfig { slices: 4, step: StepSetting::Fixed(10.0), ..PanelConfig::default() };
        let empty = compute(&[], 20.0, &cfg).unwrap();
        let layout = Layout::build(&empty, 600.0, 400.0);
        assert!(layout.arcs.iter().all(|a| a.outer_radius == 0.0));
        assert!(layout.radial_ticks.is_empty());
    }
}
