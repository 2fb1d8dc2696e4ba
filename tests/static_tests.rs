mod common;

use common::*;
use std::path::PathBuf;

fn board_assets() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("boardsync-assets-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("videos")).unwrap();
    std::fs::write(dir.join("index.html"), "<title>Board</title>").unwrap();
    std::fs::write(dir.join("script.js"), "console.log('board');").unwrap();
    std::fs::write(dir.join("videos/intro.webm"), [0x1a, 0x45, 0xdf, 0xa3]).unwrap();
    dir
}

#[tokio::test]
async fn health_endpoint_responds() {
    let server = spawn_test_server().await;

    let response = reqwest::get(&server.http_url("/health")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn index_is_served_at_root() {
    let server = spawn_test_server_with_assets(board_assets()).await;

    let response = reqwest::get(&server.http_url("/")).await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    assert_eq!(response.text().await.unwrap(), "<title>Board</title>");
}

#[tokio::test]
async fn script_and_video_get_their_content_types() {
    let server = spawn_test_server_with_assets(board_assets()).await;

    let script = reqwest::get(&server.http_url("/script.js")).await.unwrap();
    let video = reqwest::get(&server.http_url("/videos/intro.webm"))
        .await
        .unwrap();

    assert_eq!(
        script.headers()["content-type"],
        "application/javascript; charset=utf-8"
    );
    assert_eq!(video.headers()["content-type"], "video/webm");
    assert_eq!(video.bytes().await.unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let server = spawn_test_server_with_assets(board_assets()).await;

    let response = reqwest::get(&server.http_url("/models/missing.glb"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert!(response.text().await.unwrap().starts_with("Not Found"));
}

#[tokio::test]
async fn assets_and_websocket_share_listener() {
    let server = spawn_test_server_with_assets(board_assets()).await;

    let (_ws, slot) = join(&server).await;
    let response = reqwest::get(&server.http_url("/script.js")).await.unwrap();

    assert_eq!(slot, 0);
    assert_eq!(response.status(), 200);
}
