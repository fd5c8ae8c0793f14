mod common;

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use recruitment_portal::{
    config::Config,
    services::chat_service::{ACK_MESSAGE, WELCOME_MESSAGE},
};
use serde_json::Value as JsonValue;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use common::*;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(config: Config) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = app(config);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{}/ws", addr)
}

async fn connect(url: &str) -> Socket {
    let (socket, _) = connect_async(url).await.unwrap();
    socket
}

/// Next text frame as JSON, skipping control frames.
async fn next_json(socket: &mut Socket) -> JsonValue {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("no frame within 5s")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn assert_silent(socket: &mut Socket, window: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(window, socket.next()).await {
        panic!("unexpected frame {}", text);
    }
}

#[tokio::test]
async fn welcome_then_one_ack_per_json_frame() {
    let dir = tempfile::tempdir().unwrap();
    let url = spawn_server(test_config(dir.path())).await;
    let mut socket = connect(&url).await;

    let welcome = next_json(&mut socket).await;
    assert_eq!(welcome["type"], "system");
    assert_eq!(welcome["message"], WELCOME_MESSAGE);
    assert!(welcome["timestamp"].is_string());

    socket
        .send(Message::Text("this is not json".into()))
        .await
        .unwrap();
    socket
        .send(Message::Text(r#"{"message":"Is the depot hiring?"}"#.into()))
        .await
        .unwrap();
    socket
        .send(Message::Text(r#"{"message":"And the signal box?"}"#.into()))
        .await
        .unwrap();

    for _ in 0..2 {
        let reply = next_json(&mut socket).await;
        assert_eq!(reply["type"], "agent");
        assert_eq!(reply["message"], ACK_MESSAGE);
    }
    assert_silent(&mut socket, Duration::from_millis(300)).await;

    socket.close(None).await.unwrap();
}

#[tokio::test]
async fn acknowledgement_waits_for_the_configured_delay() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        chat_reply_delay_ms: 200,
        ..test_config(dir.path())
    };
    let url = spawn_server(config).await;
    let mut socket = connect(&url).await;
    next_json(&mut socket).await;

    let sent = Instant::now();
    socket
        .send(Message::Text(r#"{"message":"hello"}"#.into()))
        .await
        .unwrap();
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "agent");
    assert!(sent.elapsed() >= Duration::from_millis(200));
}
