//! # Observer Channel
//!
//! `GET /ws` upgrades to a WebSocket and registers the socket as an observer:
//! the engine sends `init` on registration, then one `delta` per accepted
//! record. Messages are forwarded as JSON text frames in broadcast order.
//! When either side closes, the observer is disconnected.

use super::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use thoughtline_core::{LineageError, ObserverSink, SyncMessage};
use tokio::sync::mpsc;

// =============================================================================
// SINK
// =============================================================================

/// Observer sink backed by an unbounded tokio channel.
///
/// Delivery never blocks the ingesting task; the socket task drains the
/// channel at its own pace.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub mpsc::UnboundedSender<SyncMessage>);

impl ObserverSink for ChannelSink {
    fn deliver(&self, message: &SyncMessage) -> Result<(), LineageError> {
        self.0
            .send(message.clone())
            .map_err(|_| LineageError::ObserverClosed)
    }
}

// =============================================================================
// HANDLER
// =============================================================================

/// Upgrade to the observer channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| observe(socket, state))
}

async fn observe(socket: WebSocket, state: AppState) {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let id = match state.engine.write().await.connect(Box::new(ChannelSink(tx))) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Observer registration failed: {}", e);
            return;
        }
    };
    tracing::info!(observer = id.0, "observer connected");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match message.encode() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Dropping unencodable sync message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound frames carry no meaning; only a close ends the session.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            if matches!(frame, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.engine.write().await.disconnect(id);
    tracing::info!(observer = id.0, "observer disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use thoughtline_core::Snapshot;

    #[test]
    fn channel_sink_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = ChannelSink(tx);
        let init = SyncMessage::Init(Snapshot::default());

        assert!(sink.deliver(&init).is_ok());
        drop(rx);
        assert!(matches!(
            sink.deliver(&init),
            Err(LineageError::ObserverClosed)
        ));
    }
}
