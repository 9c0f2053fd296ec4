//! Panel controller
//!
//! Holds the latest data snapshot, panel config and size, and turns host
//! events into render frames. Each render runs the whole pipeline again.

use serde::Serialize;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::common::debounce::Debouncer;
use crate::config::{AppConfig, PanelConfig};
use crate::layout::Layout;
use crate::models::{ingest, Sample, Series};
use crate::pipeline::{compute, WindroseChart};
use crate::report::summary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub chart: WindroseChart,
    pub layout: Layout,
}

/// What the renderer should draw next. A failed computation yields a
/// placeholder, never the previous chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "frame", rename_all = "kebab-case")]
pub enum RenderFrame {
    Chart(Box<ChartFrame>),
    Placeholder { reason: String },
}

/// Receives every frame the panel renders.
pub trait RenderSink {
    fn publish(&self, frame: &RenderFrame);
}

pub struct WindrosePanel {
    config: PanelConfig,
    samples: Vec<Sample>,
    speed_max: f64,
    width: f64,
    height: f64,
    resize: Debouncer,
}

impl WindrosePanel {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            config: cfg.panel.clone(),
            samples: Vec::new(),
            speed_max: 0.0,
            width: cfg.render.width,
            height: cfg.render.height,
            resize: Debouncer::new(Duration::from_millis(cfg.render.debounce_ms)),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Replaces the snapshot and renders it.
    pub fn on_data_received(&mut self, series: &[Series]) -> RenderFrame {
        let snapshot = ingest(series);
        if !snapshot.unrecognized.is_empty() {
            warn!("ignored {} unrecognized series", snapshot.unrecognized.len());
        }
        debug!("snapshot: {} samples, speed max {}", snapshot.samples.len(), snapshot.speed_max);

        self.samples = snapshot.samples;
        self.speed_max = snapshot.speed_max;
        self.render()
    }

    pub fn on_data_error(&self, message: &str) {
        error!("data-error {}", message);
    }

    /// Applies a new panel config and renders. An invalid config is rejected and
    /// the current one kept.
    pub fn on_config_changed(&mut self, panel: PanelConfig) -> Option<RenderFrame> {
        if let Err(e) = panel.validate() {
            warn!("rejected panel config: {}", e);
            return None;
        }
        info!("panel config updated (slices: {}, scale: {:?})", panel.slices, panel.scale);
        self.config = panel;
        Some(self.render())
    }

    /// Stores the new size; the render waits for the resize burst to settle.
    pub fn on_resize(&mut self, width: f64, height: f64, now: Instant) {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            warn!("ignored resize to {}x{}", width, height);
            return;
        }
        self.width = width;
        self.height = height;
        self.resize.trigger(now);
    }

    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Renders if a pending resize has settled by `now`.
    pub fn poll_resize(&mut self, now: Instant) -> Option<RenderFrame> {
        self.resize.fire_if_due(now).then(|| self.render())
    }

    pub fn render(&mut self) -> RenderFrame {
        // Any render covers a pending resize.
        self.resize.cancel();

        match compute(&self.samples, self.speed_max, &self.config) {
            Ok(chart) => {
                debug!("\n{}", summary(&chart));
                let layout = Layout::build(&chart, self.width, self.height);
                RenderFrame::Chart(Box::new(ChartFrame { chart, layout }))
            }
            Err(e) => {
                error!("render failed: {}", e);
                RenderFrame::Placeholder { reason: e.to_string() }
            }
        }
    }
}
