//! Test helpers: a recording [`RemoteClient`] and argument generators.

use crate::catalog::Operation;
use crate::client::{RemoteClient, RemoteResponse};
use crate::error::RemoteError;
use crate::mapping::OutboundRequest;
use crate::schema::{Field, Shape};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};

/// Records every request and answers each with the same canned reply.
#[derive(Debug)]
pub struct RecordingClient {
    calls: Mutex<Vec<OutboundRequest>>,
    reply: Result<RemoteResponse, RemoteError>,
}

impl RecordingClient {
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(RemoteResponse { status: 200, body }),
        }
    }

    #[must_use]
    pub fn failing(error: RemoteError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(error),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RemoteClient for RecordingClient {
    async fn send(&self, request: &OutboundRequest) -> Result<RemoteResponse, RemoteError> {
        self.calls.lock().push(request.clone());
        self.reply.clone()
    }
}

/// Valid arguments for `op` with every field present, optional and defaulted ones included.
#[must_use]
pub fn full_arguments(op: Operation) -> Value {
    Value::Object(full_object(op.def().fields))
}

fn full_object(fields: &[Field]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.name.to_string(), sample(&f.shape)))
        .collect()
}

fn sample(shape: &Shape) -> Value {
    match shape {
        Shape::String => json!("x"),
        Shape::Boolean => json!(true),
        Shape::Number { minimum, integer } => {
            let n = minimum.unwrap_or(1.0);
            if *integer {
                #[allow(clippy::cast_possible_truncation)]
                let n = n as i64;
                json!(n)
            } else {
                json!(n)
            }
        }
        Shape::Enum(choices) => json!(choices.first().copied().unwrap_or_default()),
        Shape::IntEnum(choices) => json!(choices.first().copied().unwrap_or_default()),
        Shape::Array {
            items, min_items, ..
        } => Value::Array(vec![sample(items); min_items.unwrap_or(1).max(1)]),
        Shape::Object(fields) => Value::Object(full_object(fields)),
    }
}
