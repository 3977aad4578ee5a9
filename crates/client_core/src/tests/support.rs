use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use shared::error::ErrorKind;
use tokio::{
    net::TcpListener,
    sync::{Mutex as AsyncMutex, Notify},
};

use crate::{config::ClientSettings, error::ClientError, ErrorSink, PageHost};

#[derive(Debug, Clone)]
pub(crate) struct CapturedRequest {
    pub csrf_token: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

pub(crate) type Captured = Arc<AsyncMutex<Vec<CapturedRequest>>>;

#[derive(Clone)]
struct StubState {
    captured: Captured,
    status: StatusCode,
    reply: String,
    gate: Option<Arc<Notify>>,
}

/// A throw-away storefront answering one path with a canned reply.
pub(crate) struct StubStorefront {
    status: StatusCode,
    reply: String,
    gate: Option<Arc<Notify>>,
}

impl StubStorefront {
    pub fn replying(status: StatusCode, reply: impl Into<String>) -> Self {
        Self {
            status,
            reply: reply.into(),
            gate: None,
        }
    }

    /// Holds every reply until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub async fn spawn(self, path: &str) -> (String, Captured) {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let captured: Captured = Arc::new(AsyncMutex::new(Vec::new()));
        let state = StubState {
            captured: captured.clone(),
            status: self.status,
            reply: self.reply,
            gate: self.gate,
        };
        let app = Router::new()
            .route(path, post(handle_stub))
            .with_state(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), captured)
    }
}

async fn handle_stub(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    state.captured.lock().await.push(CapturedRequest {
        csrf_token: header_text("x-csrftoken"),
        content_type: header_text(header::CONTENT_TYPE.as_str()),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });
    if let Some(gate) = &state.gate {
        gate.notified().await;
    }
    (state.status, state.reply.clone())
}

/// Address nothing listens on.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn settings_for(base_url: &str) -> ClientSettings {
    ClientSettings {
        base_url: base_url.to_string(),
        ..ClientSettings::default()
    }
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    reloads: AtomicUsize,
    navigations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().expect("navigations").clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts").clone()
    }
}

impl PageHost for RecordingHost {
    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate(&self, path: &str) {
        self.navigations
            .lock()
            .expect("navigations")
            .push(path.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().expect("alerts").push(message.to_string());
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    kinds: Mutex<Vec<ErrorKind>>,
}

impl RecordingSink {
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.kinds.lock().expect("kinds").clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, error: &ClientError) {
        self.kinds.lock().expect("kinds").push(error.kind());
    }
}
