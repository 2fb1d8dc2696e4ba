use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const INDEX_FILE: &str = "index.html";
const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Serves the board's files (pages, scripts, models, videos) from a directory.
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path onto a file under the root. `/` maps to the index
    /// page; anything that would climb out of the root yields `None`.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode(request_path)?;
        let relative = decoded.trim_start_matches('/');
        if relative.is_empty() {
            return Some(self.root.join(INDEX_FILE));
        }

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }

    pub async fn respond(&self, request_path: &str) -> Response {
        let Some(file) = self.resolve(request_path) else {
            return not_found(request_path);
        };

        match tokio::fs::read(&file).await {
            Ok(bytes) => {
                debug!(path = %file.display(), size = bytes.len(), "Serving asset");
                (
                    [(header::CONTENT_TYPE, HeaderValue::from_static(content_type_for(&file)))],
                    bytes,
                )
                    .into_response()
            }
            Err(_) => not_found(request_path),
        }
    }
}

fn not_found(request_path: &str) -> Response {
    debug!(request_path, "404 - Not found");
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("Not Found: {request_path}"),
    )
        .into_response()
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("glb" | "gltf") => "application/octet-stream",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Decodes `%XX` escapes. Returns `None` for malformed escapes or non-UTF-8 output.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
