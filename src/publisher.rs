//! WebSocket fan-out of render frames.
//!
//! Renderers only ever need the newest frame, so frames go through a
//! `watch` channel: a renderer that connects late, or falls behind, gets
//! the current frame and never a backlog.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::Message;

use crate::config::PublisherConfig;
use crate::panel::{RenderFrame, RenderSink};

/// Latest encoded frame, `None` until the first render.
pub type FrameFeed = watch::Receiver<Option<String>>;

/// Publishes every render frame as a JSON text message to connected renderers.
pub struct RenderPublisher {
    latest: watch::Sender<Option<String>>,
    enabled: bool,
}

impl RenderPublisher {
    /// Must be called inside a tokio runtime when enabled: binding and serving run on a spawned task.
    pub fn new(cfg: &PublisherConfig) -> Self {
        let publisher = Self::detached(cfg.enabled);

        if cfg.enabled {
            let feed = publisher.feed();
            let addr = format!("127.0.0.1:{}", cfg.port);
            tokio::spawn(async move {
                match TcpListener::bind(&addr).await {
                    Ok(listener) => {
                        info!("📡 [Publisher] Serving render frames on ws://{}", addr);
                        serve(listener, feed).await;
                    }
                    Err(e) => error!("❌ [Publisher] Cannot listen on {}: {}", addr, e),
                }
            });
        } else {
            info!("📡 [Publisher] Disabled by config.");
        }

        publisher
    }

    /// A publisher with no listener attached. Pair it with [`serve`] to expose it.
    pub fn detached(enabled: bool) -> Self {
        let (latest, _) = watch::channel(None);
        Self { latest, enabled }
    }

    /// Frame feed for [`serve`] or for an in-process renderer.
    pub fn feed(&self) -> FrameFeed {
        self.latest.subscribe()
    }

    pub fn latest(&self) -> Option<String> {
        self.latest.borrow().clone()
    }
}

impl RenderSink for RenderPublisher {
    fn publish(&self, frame: &RenderFrame) {
        if !self.enabled {
            return;
        }
        match serde_json::to_string(frame) {
            // Kept even with nobody connected, for the next renderer to join.
            Ok(json) => {
                self.latest.send_replace(Some(json));
            }
            Err(e) => error!("failed to encode render frame: {}", e),
        }
    }
}

/// Accepts renderers on `listener` until it fails, one task per connection.
pub async fn serve(listener: TcpListener, feed: FrameFeed) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("renderer connected from {}", peer);
                tokio::spawn(stream_frames(stream, feed.clone()));
            }
            Err(e) => {
                error!("❌ [Publisher] accept failed: {}", e);
                break;
            }
        }
    }
}

async fn stream_frames(stream: TcpStream, mut feed: FrameFeed) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("renderer handshake failed: {}", e);
            return;
        }
    };
    let (mut outgoing, mut incoming) = ws.split();

    let mut pending = feed.borrow_and_update().clone();
    loop {
        if let Some(json) = pending.take() {
            if outgoing.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }

        tokio::select! {
            changed = feed.changed() => {
                if changed.is_err() {
                    break;
                }
                pending = feed.borrow_and_update().clone();
            }
            msg = incoming.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Renderers have nothing to say; pings are answered by the library.
                Some(Ok(_)) => {}
            },
        }
    }
    debug!("renderer disconnected");
}
