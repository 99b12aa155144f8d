// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP + WebSocket surface over a spec folder.
//!
//! REST endpoints move whole document texts; `/ws` broadcasts live-update
//! events to every connected client. Writes performed through the API
//! suppress their own watcher echo so a client never sees its save come
//! back as an external change.

pub mod watch;

use std::collections::HashSet;
use std::path::{Path as FsPath, PathBuf};
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::store::{SpecEntry, SpecFolder, StoreError};

/// Live-update events delivered to websocket clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SpecEvent {
    Connected,
    SpecChanged { name: String, content: String },
    SpecAdded { name: String },
    SpecRemoved { name: String },
}

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct AppState {
    folder: SpecFolder,
    events: broadcast::Sender<SpecEvent>,
    suppressed: Arc<Mutex<HashSet<PathBuf>>>,
}

impl AppState {
    pub fn new(folder: SpecFolder) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            folder,
            events,
            suppressed: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn folder(&self) -> &SpecFolder {
        &self.folder
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SpecEvent> {
        self.events.subscribe()
    }

    /// Fire-and-forget: delivery to zero subscribers is not an error.
    pub fn broadcast(&self, event: SpecEvent) {
        let _ = self.events.send(event);
    }

    /// Marks a path whose next watcher event is our own write echo.
    pub fn suppress_next(&self, path: PathBuf) {
        self.suppressed.lock().expect("suppression lock poisoned").insert(path);
    }

    /// One-shot check-and-clear for a suppressed path.
    pub fn take_suppressed(&self, path: &FsPath) -> bool {
        self.suppressed.lock().expect("suppression lock poisoned").remove(path)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/specs", get(list_specs).post(create_spec))
        .route("/api/specs/{name}", get(read_spec).put(write_spec))
        .route("/ws", get(handle_ws))
        .with_state(state)
}

struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::InvalidName { .. } => StatusCode::BAD_REQUEST,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists { .. } => StatusCode::CONFLICT,
            StoreError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "api: store failure");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn list_specs(State(state): State<AppState>) -> Result<Json<Vec<SpecEntry>>, ApiError> {
    Ok(Json(state.folder().list()?))
}

#[derive(Debug, Serialize)]
struct SpecPayload {
    name: String,
    content: String,
    path: PathBuf,
}

async fn read_spec(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SpecPayload>, ApiError> {
    let content = state.folder().read_text(&name)?;
    let path = state.folder().spec_path(&name)?;
    Ok(Json(SpecPayload { name, content, path }))
}

#[derive(Debug, Deserialize)]
struct WriteSpecBody {
    content: String,
}

async fn write_spec(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<WriteSpecBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let path = state.folder().write(&name, &body.content)?;
    state.suppress_next(path);
    state.broadcast(SpecEvent::SpecChanged {
        name,
        content: body.content,
    });
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
struct CreateSpecBody {
    name: String,
    content: String,
}

async fn create_spec(
    State(state): State<AppState>,
    Json(body): Json<CreateSpecBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let path = state.folder().create(&body.name, &body.content)?;
    state.suppress_next(path.clone());
    state.broadcast(SpecEvent::SpecAdded {
        name: body.name.clone(),
    });
    Ok(Json(serde_json::json!({ "ok": true, "path": path })))
}

async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let mut events = state.subscribe();

    if send_event(&mut socket, &SpecEvent::Connected).await.is_err() {
        return;
    }
    info!("ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    None | Some(Ok(Message::Close(_))) | Some(Err(_)) => break,
                    // The channel is broadcast-only; inbound frames are ignored.
                    Some(Ok(_)) => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut socket, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "ws: client lagging, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!("ws: client disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &SpecEvent) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(event).expect("event serializes to JSON");
    socket.send(Message::Text(payload.into())).await
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use super::{app, AppState, SpecEvent};
    use crate::store::SpecFolder;

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let nanos =
                SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        fn path(&self) -> &std::path::Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn served_state() -> (AppState, TempDir) {
        let tmp = TempDir::new("server-api");
        let folder = SpecFolder::new(tmp.path().join("specs"));
        folder.ensure_root().unwrap();
        (AppState::new(folder), tmp)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn events_serialize_to_tagged_json() {
        let event = SpecEvent::SpecChanged {
            name: "checkout".to_owned(),
            content: "text".to_owned(),
        };
        let json = serde_json::to_value(&event).expect("json");
        assert_eq!(
            json,
            serde_json::json!({ "type": "spec-changed", "name": "checkout", "content": "text" })
        );

        let json = serde_json::to_value(SpecEvent::SpecAdded { name: "x".to_owned() }).expect("json");
        assert_eq!(json, serde_json::json!({ "type": "spec-added", "name": "x" }));

        let json = serde_json::to_value(SpecEvent::Connected).expect("json");
        assert_eq!(json, serde_json::json!({ "type": "connected" }));
    }

    #[test]
    fn suppression_is_one_shot_per_path() {
        let state = AppState::new(SpecFolder::new("specs"));
        let path = PathBuf::from("specs/checkout.md");

        assert!(!state.take_suppressed(&path));
        state.suppress_next(path.clone());
        assert!(state.take_suppressed(&path));
        assert!(!state.take_suppressed(&path));
    }

    #[test]
    fn broadcast_without_subscribers_does_not_panic() {
        let state = AppState::new(SpecFolder::new("specs"));
        state.broadcast(SpecEvent::SpecRemoved { name: "gone".to_owned() });
    }

    #[test]
    fn subscribers_receive_broadcast_events() {
        let state = AppState::new(SpecFolder::new("specs"));
        let mut rx = state.subscribe();
        state.broadcast(SpecEvent::SpecAdded { name: "new".to_owned() });
        assert_eq!(
            rx.try_recv().expect("event"),
            SpecEvent::SpecAdded { name: "new".to_owned() }
        );
    }

    #[tokio::test]
    async fn create_of_existing_spec_is_conflict() {
        let (state, _tmp) = served_state();
        let router = app(state);
        let body = serde_json::json!({ "name": "checkout", "content": "first" });

        let response =
            router.clone().oneshot(json_request("POST", "/api/specs", body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(json_request("POST", "/api/specs", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error = json_body(response).await;
        assert_eq!(error["error"], "spec already exists: checkout");
    }

    #[tokio::test]
    async fn read_of_missing_spec_is_not_found() {
        let (state, _tmp) = served_state();
        let router = app(state);

        let response = router.oneshot(get_request("/api/specs/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error = json_body(response).await;
        assert_eq!(error["error"], "spec not found: nope");
    }

    #[tokio::test]
    async fn write_with_invalid_name_is_bad_request() {
        let (state, _tmp) = served_state();
        let router = app(state);
        let body = serde_json::json!({ "content": "x" });

        let response =
            router.oneshot(json_request("PUT", "/api/specs/.hidden", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn write_then_read_round_trips_and_broadcasts() {
        let (state, _tmp) = served_state();
        let mut rx = state.subscribe();
        let router = app(state);
        let body = serde_json::json!({ "content": "# Checkout\n" });

        let response =
            router.clone().oneshot(json_request("PUT", "/api/specs/checkout", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            rx.try_recv().expect("event"),
            SpecEvent::SpecChanged {
                name: "checkout".to_owned(),
                content: "# Checkout\n".to_owned(),
            }
        );

        let response = router.oneshot(get_request("/api/specs/checkout")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["name"], "checkout");
        assert_eq!(payload["content"], "# Checkout\n");
    }
}
