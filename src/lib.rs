// src/lib.rs

pub mod binning;
pub mod common;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod panel;
pub mod pipeline;
pub mod publisher;
pub mod report;

pub use crate::error::{Result, WindroseError};

use crate::config::AppConfig;
use crate::models::PanelEvent;
use crate::panel::{RenderSink, WindrosePanel};

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Main event loop for one wind rose panel.
/// Consumes host events, renders on data/config/render events right away and on
/// resize once the burst settles, and hands every frame to `sink`.
/// Returns on `teardown` or when the event channel closes.
pub async fn run_panel<S: RenderSink>(cfg: &AppConfig, mut events: mpsc::Receiver<PanelEvent>, sink: &S) {
    let mut panel = WindrosePanel::new(cfg);

    info!(
        "✅ Wind rose panel ready (slices: {}, unit: {}, debounce: {}ms)",
        cfg.panel.slices, cfg.panel.unit, cfg.render.debounce_ms
    );

    loop {
        let deadline = panel.resize_deadline();

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    info!("Event channel closed.");
                    break;
                };

                match event {
                    PanelEvent::DataReceived { series } => {
                        sink.publish(&panel.on_data_received(&series));
                    }
                    PanelEvent::DataError { message } => {
                        panel.on_data_error(&message);
                    }
                    PanelEvent::ConfigChanged { panel: panel_cfg } => {
                        if let Some(frame) = panel.on_config_changed(panel_cfg) {
                            sink.publish(&frame);
                        }
                    }
                    PanelEvent::Resize { width, height } => {
                        debug!("resize to {}x{}", width, height);
                        panel.on_resize(width, height, Instant::now());
                    }
                    PanelEvent::Render => {
                        sink.publish(&panel.render());
                    }
                    PanelEvent::Teardown => {
                        info!("Panel teardown.");
                        break;
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(frame) = panel.poll_resize(Instant::now()) {
                    sink.publish(&frame);
                }
            }
        }
    }
}
