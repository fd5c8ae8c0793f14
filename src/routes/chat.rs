use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use tokio::sync::mpsc;

use crate::{
    services::chat_service::{ChatMessage, ChatService},
    utils::time::now,
    AppState,
};

#[axum::debug_handler]
pub async fn chat_socket(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let chat = state.chat_service.clone();
    ws.on_upgrade(move |socket| run_session(socket, chat))
}

async fn send(socket: &mut WebSocket, message: &ChatMessage) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(error = %err, "failed to encode chat message");
            return false;
        }
    };
    socket.send(Message::Text(text)).await.is_ok()
}

async fn run_session(mut socket: WebSocket, chat: ChatService) {
    tracing::info!("chat client connected");
    if !send(&mut socket, &ChatMessage::welcome()).await {
        return;
    }

    // Delayed replies are produced by timer tasks and written here, so the
    // socket has a single writer.
    let (tx, mut rx) = mpsc::channel::<ChatMessage>(16);
    loop {
        tokio::select! {
            frame = socket.recv() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = chat.reply_to(&text) {
                        let tx = tx.clone();
                        let delay = chat.reply_delay();
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let _ = tx.send(ChatMessage { timestamp: now(), ..reply }).await;
                        });
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "chat socket error");
                    break;
                }
            },
            Some(reply) = rx.recv() => {
                if !send(&mut socket, &reply).await {
                    break;
                }
            }
        }
    }
    tracing::info!("chat client disconnected");
}
