//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Identity},
    ui::state::AppState,
};

use super::dispatch::{Session, dispatch};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub token: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // 認証は接続ごとに 1 回だけ
    let identity = match state.identity_provider.verify(&query.token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Rejected WebSocket upgrade: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let connection_id = ConnectionId::generate();
    tracing::info!(
        "Connection '{}' authenticated as '{}' ({})",
        connection_id,
        identity.display_name,
        identity.user_id.as_str()
    );
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, identity)))
}

/// Spawns a task that forwards frames queued by the MessagePusher to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    identity: Identity,
) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // The pusher loop has to run before the greeting can be flushed
    let mut send_task = pusher_loop(rx, sender);

    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id, identity.clone(), tx)
        .await
    {
        tracing::error!("Failed to set up connection '{}': {}", connection_id, e);
        send_task.abort();
        return;
    }

    let session = Session {
        connection_id,
        identity,
    };
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&state_clone, &session, text.as_str()).await,
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", session.connection_id);
                    break;
                }
                // Ping/pong is handled by axum
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Exactly one teardown per socket
    state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await;
}
