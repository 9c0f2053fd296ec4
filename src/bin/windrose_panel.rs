use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use windrose_panel::config::AppConfig;
use windrose_panel::models::PanelEvent;
use windrose_panel::publisher::RenderPublisher;
use windrose_panel::run_panel;

/// Formats log timestamps in the system's local timezone instead of UTC.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

#[tokio::main]
async fn main() {
    // Log level from RUST_LOG, "info" when unset. Logs go to stderr; stdin carries events.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(LocalTimer)
        .with_writer(std::io::stderr)
        .init();

    // Fail fast: no panel without a valid config.
    let cfg = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Critical Error: Failed to load configuration: {}", e);
            return;
        }
    };

    let publisher = RenderPublisher::new(&cfg.publisher);
    let (tx, rx) = mpsc::channel::<PanelEvent>(256);

    // Host events arrive as newline-delimited JSON on stdin.
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match serde_json::from_str::<PanelEvent>(&line) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("skipping malformed event: {}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("⚠️ Failed to read events from stdin: {}", e);
                    break;
                }
            }
        }
    });

    info!("🚀 Starting wind rose panel...");
    run_panel(&cfg, rx, &publisher).await;
}
