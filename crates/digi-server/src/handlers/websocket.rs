//! Live search over a websocket.
//!
//! Each connection owns one [`SearchField`]. Input messages are debounced
//! and answered with `results` messages; key messages are answered with a
//! `focus` message when they map to a focus change. Closing the socket
//! tears the field down.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use digi_search::{FocusAction, KeyInput, SearchField, SearchUpdate, handle_key};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Message sent by the browser.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientMessage {
    /// Current value of the search input.
    Input { value: String },
    Key(KeyInput),
}

/// Message sent to the browser.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ServerMessage {
    Results(SearchUpdate),
    Focus { action: FocusAction },
}

/// Handle GET /ws/search.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (mut field, mut updates) =
        SearchField::new(Arc::clone(&state.catalog), state.matcher, state.debounce);

    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                if !send(&mut socket, &ServerMessage::Results(update)).await {
                    break;
                }
            }
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                let reply = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(message) => dispatch(&mut field, message),
                    Err(e) => {
                        tracing::debug!(error = %e, "ignoring malformed search message");
                        None
                    }
                };
                if let Some(reply) = reply
                    && !send(&mut socket, &reply).await
                {
                    break;
                }
            }
        }
    }

    field.teardown();
    tracing::debug!("search socket closed");
}

/// Apply a client message; returns the immediate reply, if any.
fn dispatch(field: &mut SearchField, message: ClientMessage) -> Option<ServerMessage> {
    match message {
        ClientMessage::Input { value } => {
            field.on_input(&value);
            None
        }
        ClientMessage::Key(input) => handle_key(&input).map(|action| ServerMessage::Focus { action }),
    }
}

/// Send a message; false once the socket is gone.
async fn send(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode search message");
            true
        }
    }
}
