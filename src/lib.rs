mod assets;
pub mod config;
pub mod game;

pub use game::{messages, state};

use assets::StaticAssets;
use axum::{
    Router,
    extract::{ConnectInfo, State, WebSocketUpgrade, ws::WebSocket},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use config::Config;
use game::CoordinatorHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

async fn health() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    coordinator: CoordinatorHandle,
    assets: Arc<StaticAssets>,
    outbox_capacity: usize,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, remote, state))
}

async fn handle_socket(socket: WebSocket, remote: SocketAddr, state: AppState) {
    game::run_connection(socket, remote, state.coordinator, state.outbox_capacity).await;
}

async fn static_handler(method: Method, uri: Uri, State(state): State<AppState>) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    state.assets.respond(uri.path()).await
}

/// Builds the router and starts a fresh coordinator. Must be called inside a
/// Tokio runtime. Serve it with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app(config: &Config) -> Router {
    let state = AppState {
        coordinator: CoordinatorHandle::spawn(),
        assets: Arc::new(StaticAssets::new(config.asset_dir.clone())),
        outbox_capacity: config.outbox_capacity,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}
