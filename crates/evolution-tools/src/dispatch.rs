//! The dispatcher: lookup -> validate -> map -> call -> format.

use crate::catalog::Operation;
use crate::client::{HttpRemoteClient, RemoteClient, redact_url};
use crate::config::AmbientConfig;
use crate::error::{Error, RemoteError, Result};
use crate::format::{ResultEnvelope, format};
use crate::mapping::{ValidatedArguments, map_request};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs tool invocations. Cheap to clone; every clone shares the same config and client.
///
/// Invocations are independent: the only shared state is the read-only config and the client.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<AmbientConfig>,
    client: Arc<dyn RemoteClient>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: AmbientConfig, client: Arc<dyn RemoteClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Dispatcher backed by a real HTTP client.
    #[must_use]
    pub fn with_http_client(config: AmbientConfig) -> Self {
        Self::new(config, Arc::new(HttpRemoteClient::new()))
    }

    /// Run the tool called `name`.
    ///
    /// # Errors
    ///
    /// Only [`Error::UnknownOperation`]. Validation, configuration and remote failures are
    /// rendered into the returned envelope.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> Result<ResultEnvelope> {
        let op: Operation = name.parse()?;
        Ok(self.invoke(op, &arguments).await)
    }

    /// Run a resolved operation. Never fails; failures are described in the envelope.
    ///
    /// Emits exactly one event per call.
    pub async fn invoke(&self, op: Operation, arguments: &Value) -> ResultEnvelope {
        let args = match op.validate(arguments) {
            Ok(args) => args,
            Err(e) => {
                debug!(operation = %op, error = %e, "tool call rejected");
                return format(op, &ValidatedArguments::default(), &Err(Error::Validation(e)));
            }
        };

        let request = match map_request(op, &args, &self.config) {
            Ok(request) => request,
            Err(e) => {
                warn!(operation = %op, error = %e, "tool call failed");
                return format(op, &args, &Err(e));
            }
        };

        let outcome = self.client.send(&request).await.map_err(Error::from);
        let method = request.method;
        let url = redact_url(&request.url);
        match &outcome {
            Ok(response) => info!(
                operation = %op,
                method = %method,
                url = %url,
                status = response.status,
                "tool call succeeded"
            ),
            Err(e @ Error::Remote(RemoteError::Status { status, .. })) => warn!(
                operation = %op,
                method = %method,
                url = %url,
                status = *status,
                error = %e,
                "tool call failed"
            ),
            Err(e) => warn!(
                operation = %op,
                method = %method,
                url = %url,
                error = %e,
                "tool call failed"
            ),
        }
        format(op, &args, &outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::HttpMethod;
    use crate::testing::{RecordingClient, full_arguments};
    use serde_json::json;

    fn config() -> AmbientConfig {
        AmbientConfig::new(
            Some("k".to_string()),
            Some("inst1".to_string()),
            Some("host:8080".to_string()),
        )
    }

    fn dispatcher(client: &Arc<RecordingClient>) -> Dispatcher {
        Dispatcher::new(config(), client.clone())
    }

    #[tokio::test]
    async fn send_text_issues_one_post_and_embeds_response() {
        let client = Arc::new(RecordingClient::ok(json!({"key": {"id": "MSG1"}})));
        let d = dispatcher(&client);

        let env = d
            .dispatch(
                "send_text",
                json!({"number": "5511999998888", "text": "hello"}),
            )
            .await
            .expect("known tool");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let req = &calls[0];
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.as_str(), "https://host:8080/message/sendText/inst1");
        assert_eq!(req.header("apikey"), Some("k"));
        assert_eq!(
            req.body,
            Some(json!({"number": "5511999998888", "text": "hello"}))
        );

        assert!(!env.is_failure());
        assert!(
            env.content[0]
                .text
                .starts_with("Text message sent (number: 5511999998888).")
        );
        assert!(env.content[0].text.contains("MSG1"));
    }

    #[tokio::test]
    async fn unknown_tool_escapes_without_calling_remote() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let d = dispatcher(&client);

        let err = d
            .dispatch("does_not_exist", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(ref n) if n == "does_not_exist"));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn remote_failure_body_is_relayed_in_envelope() {
        let client = Arc::new(RecordingClient::failing(RemoteError::Status {
            status: 500,
            body: r#"{"error":"down"}"#.to_string(),
        }));
        let d = dispatcher(&client);

        let env = d
            .dispatch("send_text", json!({"number": "1", "text": "hi"}))
            .await
            .expect("no error escapes");

        assert_eq!(client.call_count(), 1);
        assert!(env.is_failure());
        assert_eq!(env.content.len(), 1);
        assert!(env.content[0].text.contains(r#"{"error":"down"}"#));
    }

    #[tokio::test]
    async fn missing_required_field_never_reaches_remote() {
        for op in Operation::ALL {
            let full = full_arguments(op);
            for field in op.def().fields.iter().filter(|f| f.is_required()) {
                let client = Arc::new(RecordingClient::ok(json!({})));
                let d = dispatcher(&client);

                let mut args = full.clone();
                args.as_object_mut().expect("object").remove(field.name);
                let env = d.invoke(op, &args).await;

                assert_eq!(client.call_count(), 0, "{op}.{}", field.name);
                assert!(env.is_failure());
                assert!(
                    env.content[0].text.contains(field.name),
                    "{op}: {}",
                    env.content[0].text
                );
            }
        }
    }

    #[tokio::test]
    async fn edit_of_foreign_message_is_rejected_before_calling() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let d = dispatcher(&client);

        let env = d
            .dispatch(
                "edit_message",
                json!({
                    "number": "1",
                    "text": "fixed",
                    "key": {"remoteJid": "1@s.whatsapp.net", "fromMe": false, "id": "ABC"},
                }),
            )
            .await
            .expect("known tool");

        assert_eq!(client.call_count(), 0);
        assert!(env.content[0].text.contains("key.fromMe"));
    }

    #[tokio::test]
    async fn missing_instance_fails_only_that_call() {
        let client = Arc::new(RecordingClient::ok(json!([{"name": "a"}])));
        let d = Dispatcher::new(
            AmbientConfig::new(Some("k".to_string()), None, None),
            client.clone(),
        );

        let env = d
            .dispatch("find_chats", json!({}))
            .await
            .expect("known tool");
        assert!(env.is_failure());
        assert!(env.content[0].text.starts_with("Cannot run find_chats:"));
        assert_eq!(client.call_count(), 0);

        let env = d
            .dispatch("fetch_instances", json!({}))
            .await
            .expect("known tool");
        assert!(!env.is_failure());
        assert_eq!(client.call_count(), 1);
        assert_eq!(
            client.calls()[0].url.as_str(),
            "https://localhost:8080/instance/fetchInstances"
        );
    }

    #[tokio::test]
    async fn concurrent_invocations_are_independent() {
        let client = Arc::new(RecordingClient::ok(json!({"ok": true})));
        let d = dispatcher(&client);

        let mut handles = Vec::new();
        for i in 0..8 {
            let d = d.clone();
            handles.push(tokio::spawn(async move {
                d.dispatch("send_text", json!({"number": i.to_string(), "text": "x"}))
                    .await
            }));
        }
        for h in handles {
            let env = h.await.expect("join").expect("known tool");
            assert!(!env.is_failure());
        }
        assert_eq!(client.call_count(), 8);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogBuffer {
        fn events(&self) -> Vec<Value> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect()
        }
    }

    #[tokio::test]
    async fn each_call_logs_one_event_with_route_and_status() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let client = Arc::new(RecordingClient::failing(RemoteError::Status {
            status: 500,
            body: "down".to_string(),
        }));
        let d = dispatcher(&client);
        d.dispatch("send_text", json!({"number": "1", "text": "hi"}))
            .await
            .expect("known tool");

        let events = logs.events();
        assert_eq!(events.len(), 1, "{events:?}");
        let fields = &events[0]["fields"];
        assert_eq!(fields["operation"], "send_text");
        assert_eq!(fields["method"], "POST");
        assert_eq!(fields["url"], "https://host:8080/message/sendText/inst1");
        assert_eq!(fields["status"], 500);
    }
}
