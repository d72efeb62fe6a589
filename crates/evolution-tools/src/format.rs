//! Response formatting: every dispatch outcome becomes one [`ResultEnvelope`].

use crate::catalog::{Operation, ResponseKind};
use crate::client::RemoteResponse;
use crate::error::{Error, Result};
use crate::mapping::ValidatedArguments;
use serde::Serialize;
use serde_json::{Map, Value};

/// The base64 field of a media download response.
const MEDIA_PAYLOAD_FIELD: &str = "base64";

/// The payload field of a binary body wrapped by the client (`{"encoding": "base64", ...}`).
const BINARY_DATA_FIELD: &str = "data";

/// Arguments that name what an operation acted on, in preference order.
const SUBJECT_KEYS: &[&str] = &["number", "groupJid", "chat", "remoteJid", "instanceName"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextContent {
    fn new(text: String) -> Self {
        Self { kind: "text", text }
    }
}

/// Uniform result of a dispatch, success or failure.
///
/// Failures are success-shaped on the wire (no error flag); `failed` is kept for local callers
/// such as the `call` subcommand's exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEnvelope {
    pub content: Vec<TextContent>,
    #[serde(skip)]
    failed: bool,
}

impl ResultEnvelope {
    #[must_use]
    pub fn text(text: String) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            failed: false,
        }
    }

    #[must_use]
    pub fn failure(text: String) -> Self {
        Self {
            content: vec![TextContent::new(text)],
            failed: true,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failed
    }
}

/// Render the outcome of one invocation. Never fails.
///
/// `args` are the validated arguments of the call (empty when validation failed).
#[must_use]
pub fn format(
    op: Operation,
    args: &ValidatedArguments,
    outcome: &Result<RemoteResponse>,
) -> ResultEnvelope {
    match outcome {
        Ok(response) => format_success(op, args, response),
        Err(e) => format_failure(op, e),
    }
}

fn format_success(
    op: Operation,
    args: &ValidatedArguments,
    response: &RemoteResponse,
) -> ResultEnvelope {
    let def = op.def();
    let shown = match def.response {
        ResponseKind::Json => response.body.clone(),
        ResponseKind::MediaMetadata => media_metadata(&response.body),
    };
    let headline = match subject(args) {
        Some((key, value)) => format!("{} ({key}: {value})", def.outcome),
        None => def.outcome.to_string(),
    };
    ResultEnvelope::text(format!("{headline}.\n\n{}", pretty(&shown)))
}

fn subject(args: &ValidatedArguments) -> Option<(&'static str, &str)> {
    SUBJECT_KEYS.iter().find_map(|key| {
        args.str(key)
            .filter(|v| !v.is_empty())
            .map(|v| (*key, v))
    })
}

fn format_failure(op: Operation, error: &Error) -> ResultEnvelope {
    let text = match error {
        Error::Validation(e) => {
            let mut text = format!("Invalid arguments for {op}:");
            for v in &e.violations {
                text.push_str("\n- ");
                text.push_str(&v.to_string());
            }
            text
        }
        Error::Config(msg) => format!("Cannot run {op}: {msg}"),
        Error::Remote(e) => format!("Error running {op}: {e}"),
        Error::UnknownOperation(name) => format!("Unknown tool: {name}"),
    };
    ResultEnvelope::failure(text)
}

/// Everything except the media payload, plus the payload's encoded length.
///
/// Covers both the API's `base64` field and the client's wrapper for binary bodies.
fn media_metadata(body: &Value) -> Value {
    match body {
        Value::Object(fields) => {
            let binary = fields.get("encoding").and_then(Value::as_str) == Some("base64");
            let mut meta = Map::new();
            for (key, value) in fields {
                let payload = key == MEDIA_PAYLOAD_FIELD || (binary && key == BINARY_DATA_FIELD);
                if !payload {
                    meta.insert(key.clone(), value.clone());
                } else if let Some(encoded) = value.as_str() {
                    meta.insert(format!("{key}Length"), Value::from(encoded.len()));
                }
            }
            Value::Object(meta)
        }
        Value::String(s) => serde_json::json!({ "responseLength": s.len() }),
        other => other.clone(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, ValidationError, Violation};
    use serde_json::json;

    fn ok(body: Value) -> Result<RemoteResponse> {
        Ok(RemoteResponse { status: 200, body })
    }

    fn no_args() -> ValidatedArguments {
        ValidatedArguments::default()
    }

    #[test]
    fn success_embeds_pretty_response_after_outcome() {
        let env = format(
            Operation::SendText,
            &no_args(),
            &ok(json!({"key": {"id": "ABC"}})),
        );
        assert!(!env.is_failure());
        assert_eq!(env.content.len(), 1);
        assert_eq!(env.content[0].kind, "text");
        assert!(env.content[0].text.starts_with("Text message sent.\n\n"));
        assert!(env.content[0].text.contains("\"id\": \"ABC\""));
    }

    #[test]
    fn media_download_reports_metadata_only() {
        let payload = "A".repeat(4096);
        let env = format(
            Operation::GetBase64FromMedia,
            &no_args(),
            &ok(json!({"mimetype": "image/jpeg", "mediaType": "imageMessage", "base64": payload})),
        );
        let text = &env.content[0].text;
        assert!(text.contains("image/jpeg"));
        assert!(text.contains("\"base64Length\": 4096"));
        assert!(!text.contains(&payload));
    }

    #[test]
    fn binary_media_body_is_not_embedded() {
        let bytes = vec![0xff_u8; 4096];
        let body = crate::client::decode_body(&bytes, Some("image/jpeg"));
        let data = body["data"].as_str().expect("base64 data").to_string();

        let env = format(Operation::GetBase64FromMedia, &no_args(), &ok(body));
        let text = &env.content[0].text;
        assert!(!text.contains(&data));
        assert!(text.contains("\"mimeType\": \"image/jpeg\""), "{text}");
        assert!(text.contains(&format!("\"dataLength\": {}", data.len())), "{text}");
        assert!(text.len() < 512, "{text}");
    }

    #[test]
    fn success_headline_names_the_target() {
        let args = Operation::SendText
            .validate(&json!({"number": "5511999998888", "text": "hi"}))
            .expect("valid");
        let env = format(Operation::SendText, &args, &ok(json!({})));
        assert!(
            env.content[0]
                .text
                .starts_with("Text message sent (number: 5511999998888).\n\n"),
            "{}",
            env.content[0].text
        );

        let args = Operation::LeaveGroup
            .validate(&json!({"groupJid": "123@g.us"}))
            .expect("valid");
        let env = format(Operation::LeaveGroup, &args, &ok(Value::Null));
        assert!(env.content[0].text.starts_with("Left group (groupJid: 123@g.us)."));
    }

    #[test]
    fn remote_failure_keeps_raw_body() {
        let env = format(
            Operation::SendText,
            &no_args(),
            &Err(Error::Remote(RemoteError::Status {
                status: 500,
                body: r#"{"error":"down"}"#.to_string(),
            })),
        );
        assert!(env.is_failure());
        assert_eq!(
            env.content[0].text,
            r#"Error running send_text: API returned 500: {"error":"down"}"#
        );
    }

    #[test]
    fn validation_failure_lists_every_field() {
        let err = ValidationError {
            violations: vec![
                Violation::new("number", "is required"),
                Violation::new("text", "is required"),
            ],
        };
        let env = format(Operation::SendText, &no_args(), &Err(Error::Validation(err)));
        assert_eq!(
            env.content[0].text,
            "Invalid arguments for send_text:\n- number: is required\n- text: is required"
        );
    }

    #[test]
    fn envelope_serializes_without_failure_flag() {
        let env = ResultEnvelope::failure("boom".to_string());
        assert_eq!(
            serde_json::to_value(&env).expect("serialize"),
            json!({"content": [{"type": "text", "text": "boom"}]})
        );
    }
}
