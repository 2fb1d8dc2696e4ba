#![allow(dead_code)]

use boardsync::config::Config;
use boardsync::messages::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn ws_url(&self) -> String {
        format!("{}/ws", self.base_url)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_assets(std::env::temp_dir()).await
}

pub async fn spawn_test_server_with_assets(asset_dir: PathBuf) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let config = Config {
            asset_dir,
            ..Config::default()
        };
        let app = boardsync::app(&config);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

pub async fn connect(server: &TestServer) -> WsStream {
    let (ws, _) = connect_async(&server.ws_url()).await.expect("Failed to connect");
    ws
}

/// Connects and consumes the private snapshot, returning the assigned slot.
pub async fn join(server: &TestServer) -> (WsStream, usize) {
    let mut ws = connect(server).await;
    let ServerMessage::GameState {
        your_player_index, ..
    } = recv(&mut ws).await
    else {
        panic!("Expected GameState snapshot");
    };
    (ws, your_player_index)
}

pub fn client_msg(msg: &ClientMessage) -> Message {
    let json = serde_json::to_string(msg).unwrap();
    Message::Text(json.into())
}

pub fn select_msg(token: &str) -> Message {
    client_msg(&ClientMessage::PlayerSelected {
        token: token.to_string(),
    })
}

pub fn roll_msg(result: u8) -> Message {
    client_msg(&ClientMessage::DiceRolled { result })
}

pub async fn send(ws: &mut WsStream, msg: Message) {
    ws.send(msg).await.unwrap();
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

/// Asserts nothing arrives within a short window.
pub async fn assert_silent(ws: &mut WsStream) {
    let result = tokio::time::timeout(Duration::from_millis(150), ws.next()).await;
    assert!(result.is_err(), "Expected no message, got {:?}", result);
}
