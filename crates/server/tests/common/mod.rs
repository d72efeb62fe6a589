#![allow(dead_code)]

use anyhow::Context as _;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::net::TcpListener as StdTcpListener;
use std::process::Child;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_evolution-mcp")
}

/// Pick an unused TCP port on localhost. The port is not reserved.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = StdTcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status.
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub apikey: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    reply: Value,
}

/// In-process stand-in for the Evolution API: records every request and answers with a fixed
/// status and JSON body.
pub struct StubApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl StubApi {
    pub async fn start(status: StatusCode, reply: Value) -> anyhow::Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: requests.clone(),
            status,
            reply,
        };
        let app = Router::new()
            .route("/{*path}", any(record))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.context("bind stub")?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        Ok(Self {
            base_url: format!("http://{addr}"),
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.requests.lock().push(RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or("").to_string(),
        apikey: headers
            .get("apikey")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    (state.status, axum::Json(state.reply.clone()))
}

pub struct CallOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `evolution-mcp call OPERATION [ARGS]` against `api_url`.
pub async fn run_call(
    api_url: &str,
    operation: &str,
    arguments: Option<&str>,
) -> anyhow::Result<CallOutput> {
    let mut cmd = tokio::process::Command::new(bin());
    cmd.env_remove("RUST_LOG")
        .arg("--api-key")
        .arg("test-key")
        .arg("--instance")
        .arg("inst1")
        .arg("--api-url")
        .arg(api_url)
        .arg("--log-level")
        .arg("warn")
        .arg("call")
        .arg(operation);
    if let Some(a) = arguments {
        cmd.arg(a);
    }
    let out = cmd.output().await.context("run evolution-mcp call")?;
    Ok(CallOutput {
        code: out.status.code(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    })
}

pub fn ok_reply() -> Value {
    json!({"key": {"id": "MSG1"}, "status": "PENDING"})
}
