// src/reload/server.rs

//! HTTP live-reload transport.
//!
//! Serves the reload root as static files, injects a tiny client script into
//! HTML pages, and pushes `reload` server-sent events whenever
//! [`ReloadTransport::notify`] is called.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use crate::reload::ReloadTransport;

pub const EVENTS_PATH: &str = "/__assetdag/events";
pub const CLIENT_PATH: &str = "/__assetdag/client.js";

const CLIENT_JS: &str = r#"(function () {
  var source = new EventSource("/__assetdag/events");
  source.addEventListener("reload", function () {
    window.location.reload();
  });
})();
"#;

#[derive(Debug)]
pub struct LiveReloadServer {
    addr: String,
    tx: broadcast::Sender<()>,
    bound: OnceLock<SocketAddr>,
}

#[derive(Clone)]
struct ServerState {
    root: PathBuf,
    tx: broadcast::Sender<()>,
}

impl LiveReloadServer {
    pub fn new(host: &str, port: u16) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            addr: format!("{host}:{port}"),
            tx,
            bound: OnceLock::new(),
        }
    }

    /// Address actually bound, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.bound.get().copied()
    }
}

impl ReloadTransport for LiveReloadServer {
    fn start(&self, root: &Path) -> Result<()> {
        let listener = std::net::TcpListener::bind(&self.addr)
            .with_context(|| format!("binding live-reload server to {}", self.addr))?;
        listener.set_nonblocking(true)?;
        let local = listener.local_addr()?;
        let listener = tokio::net::TcpListener::from_std(listener)?;

        let app = router(ServerState {
            root: root.to_path_buf(),
            tx: self.tx.clone(),
        });

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                warn!(error = %err, "live-reload server stopped");
            }
        });

        let _ = self.bound.set(local);
        info!("live reload server listening on http://{local}");
        Ok(())
    }

    fn notify(&self) {
        // No connected browsers is fine.
        let receivers = self.tx.send(()).unwrap_or(0);
        debug!(receivers, "pushed reload event");
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(EVENTS_PATH, get(events))
        .route(CLIENT_PATH, get(client_js))
        .fallback(serve_root)
        .with_state(state)
}

async fn events(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.tx.subscribe())
        .filter_map(|msg| msg.ok().map(|()| Ok(Event::default().event("reload").data("reload"))));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn client_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], CLIENT_JS)
}

async fn serve_root(State(state): State<ServerState>, req: Request) -> Response {
    if let Some(page) = html_page(&state.root, req.uri().path()) {
        match tokio::fs::read_to_string(&page).await {
            Ok(html) => return Html(inject_client(&html)).into_response(),
            Err(err) => debug!(page = %page.display(), error = %err, "falling back to static serving"),
        }
    }

    match ServeDir::new(&state.root).oneshot(req).await {
        Ok(res) => res.map(Body::new),
        Err(never) => match never {},
    }
}

/// HTML file a request path resolves to, if any.
fn html_page(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let rel = uri_path.trim_start_matches('/');
    if rel.split('/').any(|seg| seg == "..") {
        return None;
    }

    let mut candidate = root.join(rel);
    if rel.is_empty() || rel.ends_with('/') || candidate.is_dir() {
        candidate = candidate.join("index.html");
    }

    let is_html = candidate
        .extension()
        .is_some_and(|e| e == "html" || e == "htm");
    (is_html && candidate.is_file()).then_some(candidate)
}

/// Insert the client script tag before the last `</body>`, or append it.
pub fn inject_client(html: &str) -> String {
    let tag = format!(r#"<script src="{CLIENT_PATH}"></script>"#);
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..idx]);
            out.push_str(&tag);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{html}{tag}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_tag_lands_before_body_close() {
        let html = "<html><BODY><p>hi</p></BODY></html>";
        assert_eq!(
            inject_client(html),
            r#"<html><BODY><p>hi</p><script src="/__assetdag/client.js"></script></BODY></html>"#
        );
    }

    #[test]
    fn client_tag_is_appended_without_body() {
        assert!(inject_client("<p>fragment</p>").ends_with("</script>"));
    }

    #[test]
    fn directory_requests_resolve_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<body></body>").unwrap();
        std::fs::write(dir.path().join("app.js"), "").unwrap();

        assert_eq!(html_page(dir.path(), "/"), Some(dir.path().join("index.html")));
        assert_eq!(html_page(dir.path(), "/app.js"), None);
        assert_eq!(html_page(dir.path(), "/../secret.html"), None);
    }
}
