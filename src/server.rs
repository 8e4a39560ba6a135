//! WebSocket transport: one query session per socket.
//!
//! Protocol: the client sends `{"query": "..."}` as the opening text frame;
//! the server streams `{step_number, step}` and `{step_number, result}`
//! events while the session runs, then `{"status": "done"}`. A message
//! without a usable query yields `{"error": "Query not provided"}` without
//! invoking the loop.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::agent::ResearchAgent;
use crate::events::SessionEvent;

pub struct AppState {
    pub agent: Arc<ResearchAgent>,
}

/// Builds the transport router: `GET /ws/query` plus a permissive CORS
/// layer for browser clients.
pub fn router(agent: Arc<ResearchAgent>) -> Router {
    let state = Arc::new(AppState { agent });
    Router::new()
        .route("/ws/query", get(ws_query))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct QueryRequest {
    #[serde(default)]
    query: Option<String>,
}

async fn ws_query(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

type WsSink = SplitSink<WebSocket, Message>;

async fn send_event(ws_tx: &mut WsSink, event: &SessionEvent) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    ws_tx.send(Message::Text(payload)).await
}

/// Runs one query session over the socket.
async fn handle_session(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Wait for the opening message carrying the query.
    let query = loop {
        match ws_rx.next().await {
            Some(Ok(Message::Text(text))) => {
                let request: QueryRequest = serde_json::from_str(&text).unwrap_or_default();
                break request.query.filter(|q| !q.trim().is_empty());
            }
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
            // Ignore pings and binary frames while waiting for the query.
            Some(Ok(_)) => continue,
        }
    };

    let Some(query) = query else {
        let _ = send_event(&mut ws_tx, &SessionEvent::failed("Query not provided")).await;
        let _ = ws_tx.close().await;
        return;
    };

    tracing::info!(%session_id, query = %query, "processing query");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let agent = Arc::clone(&state.agent);
    let task_query = query.clone();
    let session = tokio::spawn(async move { agent.process_query(&task_query, Some(&tx)).await });

    // Forward events until the session drops its sender. A client that goes
    // away mid-session cancels the loop from outside.
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    if send_event(&mut ws_tx, &event).await.is_err() {
                        tracing::warn!(%session_id, "websocket send failed, aborting session");
                        session.abort();
                        return;
                    }
                }
                None => break,
            },
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    tracing::info!(%session_id, "client left mid-session");
                    session.abort();
                    return;
                }
                // Any further client frames are ignored during the session.
                Some(Ok(_)) => {}
            },
        }
    }

    match session.await {
        Ok(report) => {
            tracing::info!(%session_id, results = report.results.len(), "session finished");
            let _ = send_event(&mut ws_tx, &SessionEvent::done()).await;
        }
        Err(err) => {
            tracing::error!(%session_id, error = %err, "session task failed");
            let _ = send_event(&mut ws_tx, &SessionEvent::failed(err.to_string())).await;
        }
    }
    let _ = ws_tx.close().await;
}
