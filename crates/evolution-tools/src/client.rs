//! Remote client capability: send one [`OutboundRequest`], get one response.
//!
//! The dispatcher depends on the [`RemoteClient`] trait only, so tests can substitute a recording
//! client and the real HTTP stack stays at the edge.

use crate::error::RemoteError;
use crate::mapping::OutboundRequest;
use async_trait::async_trait;
use base64::Engine as _;
use mime::Mime;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

/// A successful (2xx) remote response.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: u16,
    /// Parsed JSON, or the raw text when the body is not JSON, or a base64 wrapper for binary
    /// bodies.
    pub body: Value,
}

#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Perform exactly one HTTP exchange.
    ///
    /// # Errors
    ///
    /// [`RemoteError::Status`] for a non-2xx response, [`RemoteError::Transport`] when no response
    /// was received.
    async fn send(&self, request: &OutboundRequest) -> Result<RemoteResponse, RemoteError>;
}

/// `reqwest`-backed client. No timeout and no retries: a call waits for the remote API.
#[derive(Debug, Clone, Default)]
pub struct HttpRemoteClient {
    client: Client,
}

impl HttpRemoteClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn send(&self, request: &OutboundRequest) -> Result<RemoteResponse, RemoteError> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), request.url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(std::string::ToString::to_string);
        let bytes = response.bytes().await.map_err(transport_error)?;

        debug!(
            method = %request.method,
            url = %redact_url(&request.url),
            status = status.as_u16(),
            bytes = bytes.len(),
            "remote call finished"
        );

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(RemoteResponse {
            status: status.as_u16(),
            body: decode_body(&bytes, content_type.as_deref()),
        })
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(sanitize_reqwest_error(&e))
}

/// JSON if it parses, text if it is UTF-8, otherwise a base64 wrapper.
pub(crate) fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Value {
    if let Ok(s) = std::str::from_utf8(bytes) {
        if s.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string()))
    } else {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        let mime_type = content_type
            .and_then(|ct| ct.parse::<Mime>().ok())
            .map(|m| m.essence_str().to_string());
        json!({
            "encoding": "base64",
            "mimeType": mime_type,
            "data": b64
        })
    }
}

/// Drop credentials, query and fragment so a URL is safe to log.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::HttpMethod;
    use axum::{
        Router,
        body::Bytes,
        http::{HeaderMap, Method, StatusCode, Uri},
        routing::any,
    };
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    struct TestServer {
        base_url: String,
        shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
        handle: tokio::task::JoinHandle<std::io::Result<()>>,
    }

    impl TestServer {
        async fn start(app: Router) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            let addr = listener.local_addr().expect("local_addr");
            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let handle = tokio::spawn(async move { server.await });
            Self {
                base_url: format!("http://{addr}"),
                shutdown_tx: Some(shutdown_tx),
                handle,
            }
        }

        async fn stop(mut self) {
            if let Some(tx) = self.shutdown_tx.take() {
                let _ = tx.send(());
            }
            self.handle
                .await
                .expect("server task join")
                .expect("server result");
        }
    }

    fn request(
        base_url: &str,
        method: HttpMethod,
        path: &str,
        query: Vec<(&str, &str)>,
        body: Option<Value>,
    ) -> OutboundRequest {
        OutboundRequest {
            method,
            url: Url::parse(&format!("{base_url}{path}")).expect("url"),
            headers: vec![("apikey".to_string(), "secret".to_string())],
            query: query
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body,
        }
    }

    #[tokio::test]
    async fn send_passes_method_query_headers_and_body() {
        async fn echo_handler(
            method: Method,
            uri: Uri,
            headers: HeaderMap,
            body: Bytes,
        ) -> axum::Json<Value> {
            let apikey = headers
                .get("apikey")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            axum::Json(json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query().unwrap_or(""),
                "apikey": apikey,
                "body": body,
            }))
        }

        let server = TestServer::start(Router::new().route("/{*path}", any(echo_handler))).await;
        let client = HttpRemoteClient::new();

        let req = request(
            &server.base_url,
            HttpMethod::Post,
            "/group/updateGroupSubject/inst1",
            vec![("groupJid", "123@g.us")],
            Some(json!({"subject": "New"})),
        );
        let resp = client.send(&req).await.expect("send");

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["method"], "POST");
        assert_eq!(resp.body["path"], "/group/updateGroupSubject/inst1");
        assert_eq!(resp.body["apikey"], "secret");
        assert_eq!(resp.body["body"], json!({"subject": "New"}));

        let query = resp.body["query"].as_str().unwrap_or_default();
        let qmap: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(qmap.get("groupJid").map(String::as_str), Some("123@g.us"));

        server.stop().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_raw_body() {
        async fn down() -> (StatusCode, &'static str) {
            (StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"down"}"#)
        }

        let server = TestServer::start(Router::new().route("/{*path}", any(down))).await;
        let client = HttpRemoteClient::new();
        let req = request(
            &server.base_url,
            HttpMethod::Get,
            "/chat/fetchPrivacySettings/inst1",
            Vec::new(),
            None,
        );

        let err = client.send(&req).await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Status {
                status: 500,
                body: r#"{"error":"down"}"#.to_string(),
            }
        );

        server.stop().await;
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        drop(listener);

        let client = HttpRemoteClient::new();
        let req = request(
            &format!("http://{addr}"),
            HttpMethod::Get,
            "/instance/connectionState/inst1",
            Vec::new(),
            None,
        );
        let err = client.send(&req).await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)), "{err:?}");
    }

    #[test]
    fn decode_body_prefers_json_then_text_then_base64() {
        assert_eq!(decode_body(br#"{"a":1}"#, None), json!({"a": 1}));
        assert_eq!(decode_body(b"plain", Some("text/plain")), json!("plain"));
        assert_eq!(decode_body(b"", None), Value::Null);

        let v = decode_body(&[0xff, 0xfe, 0x00], Some("image/png; charset=binary"));
        assert_eq!(v["encoding"], "base64");
        assert_eq!(v["mimeType"], "image/png");
        assert_eq!(v["data"], "//4A");
    }

    #[test]
    fn redact_url_drops_credentials_and_query() {
        let u = Url::parse("https://user:pw@host/path?apikey=1#frag").expect("url");
        assert_eq!(redact_url(&u), "https://host/path");
    }
}
