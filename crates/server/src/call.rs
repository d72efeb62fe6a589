//! Direct single-operation invocation (`evolution-mcp call`).

use evolution_mcp_tools::Dispatcher;
use serde_json::Value;
use std::process::ExitCode;
use thiserror::Error;

/// Problems that prevent a call from running at all.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("arguments are not valid JSON: {0}")]
    BadArguments(#[from] serde_json::Error),

    #[error(transparent)]
    Dispatch(#[from] evolution_mcp_tools::Error),
}

// Exit statuses besides success.
const EXIT_FAILURE_ENVELOPE: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Run one tool, print its envelope to stdout and map the outcome to an exit status.
pub async fn run(dispatcher: &Dispatcher, operation: &str, arguments: Option<&str>) -> ExitCode {
    match invoke(dispatcher, operation, arguments).await {
        Ok((rendered, failed)) => {
            println!("{rendered}");
            if failed {
                ExitCode::from(EXIT_FAILURE_ENVELOPE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

async fn invoke(
    dispatcher: &Dispatcher,
    operation: &str,
    arguments: Option<&str>,
) -> Result<(String, bool), CallError> {
    let arguments: Value = match arguments {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw)?,
        _ => Value::Object(serde_json::Map::new()),
    };
    let envelope = dispatcher.dispatch(operation, arguments).await?;
    let rendered = serde_json::to_string_pretty(&envelope)?;
    Ok((rendered, envelope.is_failure()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolution_mcp_tools::AmbientConfig;
    use evolution_mcp_tools::testing::RecordingClient;
    use serde_json::json;
    use std::sync::Arc;

    fn dispatcher(client: &Arc<RecordingClient>) -> Dispatcher {
        Dispatcher::new(
            AmbientConfig::new(
                Some("k".to_string()),
                Some("inst1".to_string()),
                Some("host:8080".to_string()),
            ),
            client.clone(),
        )
    }

    #[tokio::test]
    async fn bad_json_is_rejected_before_dispatch() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let err = invoke(&dispatcher(&client), "send_text", Some("{not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::BadArguments(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_tool_is_a_usage_error() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let err = invoke(&dispatcher(&client), "does_not_exist", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown tool: does_not_exist");
    }

    #[tokio::test]
    async fn missing_arguments_default_to_empty_object() {
        let client = Arc::new(RecordingClient::ok(json!([])));
        let (rendered, failed) = invoke(&dispatcher(&client), "find_chats", None)
            .await
            .expect("dispatched");
        assert!(!failed);
        assert!(rendered.contains("Chats fetched"));
        assert_eq!(client.calls()[0].body, Some(json!({})));
    }

    #[tokio::test]
    async fn failure_envelope_is_reported_as_failed() {
        let client = Arc::new(RecordingClient::ok(json!({})));
        let (rendered, failed) = invoke(&dispatcher(&client), "send_text", Some(r#"{"number":"1"}"#))
            .await
            .expect("dispatched");
        assert!(failed);
        assert!(rendered.contains("text: required field is missing"));
    }
}
