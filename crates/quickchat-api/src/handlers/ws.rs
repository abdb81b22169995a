//! WebSocket upgrade handler and per-socket pump.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{Sink, SinkExt, StreamExt};
use tracing::{debug, info, warn};

use quickchat_core::Identity;
use quickchat_core::error::AppError;
use quickchat_realtime::{HandshakeParams, OutboundFrame, run_heartbeat};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws?userId={id}&token={jwt} — WebSocket upgrade
///
/// The handshake is authenticated before upgrading; a rejected credential
/// never opens a socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(params): Query<HandshakeParams>,
) -> Result<Response, ApiError> {
    let identity = state.realtime.authenticator.authenticate(&params)?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, identity, socket)))
}

/// Drives one established socket until either side closes it.
async fn handle_ws_connection(state: AppState, identity: Option<Identity>, socket: WebSocket) {
    let engine = Arc::clone(&state.realtime);
    let gateway = Arc::clone(&engine.gateway);

    let (handle, mut outbound_rx) = gateway.open(identity).await;
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        identity = ?handle.identity().map(Identity::as_str),
        "WebSocket connection established"
    );

    let heartbeat_config = engine.heartbeat_config();
    // A peer that cannot take a frame within the pong window is gone.
    let write_timeout = heartbeat_config.ping_timeout;
    let heartbeat = tokio::spawn(run_heartbeat(
        Arc::clone(&gateway),
        Arc::clone(&handle),
        heartbeat_config,
    ));

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            biased;

            frame = outbound_rx.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = send_frame(&mut ws_tx, frame, write_timeout).await {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket write failed");
                    break;
                }
            }

            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    gateway.handle_inbound(&handle, text.as_str()).await;
                }
                Some(Ok(Message::Pong(_))) => handle.record_pong(),
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by the transport.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },

            _ = handle.closed() => {
                // Flush anything queued before the close (e.g. a superseded notice).
                while let Ok(frame) = outbound_rx.try_recv() {
                    if send_frame(&mut ws_tx, frame, write_timeout).await.is_err() {
                        break;
                    }
                }
                let _ =
                    tokio::time::timeout(write_timeout, ws_tx.send(Message::Close(None))).await;
                break;
            }
        }
    }

    gateway.close(&handle).await;
    heartbeat.abort();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

/// Writes one frame, giving up after `timeout`.
async fn send_frame<S>(
    ws_tx: &mut S,
    frame: OutboundFrame,
    timeout: Duration,
) -> Result<(), AppError>
where
    S: Sink<Message, Error = axum::Error> + Unpin,
{
    let message = match frame {
        OutboundFrame::Text(text) => Message::Text(text.to_string().into()),
        OutboundFrame::Ping => Message::Ping(Bytes::new()),
    };

    match tokio::time::timeout(timeout, ws_tx.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::transport_closed(format!("WebSocket write failed: {e}"))),
        Err(_) => Err(AppError::transport_closed(format!(
            "WebSocket write stalled for {}ms",
            timeout.as_millis()
        ))),
    }
}
