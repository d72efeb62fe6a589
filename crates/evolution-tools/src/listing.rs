//! Catalog listing: MCP `Tool` descriptors and a content fingerprint.

use crate::catalog::Operation;
use crate::semantics::annotations_for_method;
use rmcp::model::{JsonObject, Tool};
use serde_json::Value;
use sha2::Digest as _;
use std::sync::{Arc, LazyLock};

static TOOLS: LazyLock<Vec<Tool>> = LazyLock::new(build_tools);

/// Every tool in catalog order. Built once; repeated listings return the same descriptors.
#[must_use]
pub fn tools() -> &'static [Tool] {
    &TOOLS
}

fn build_tools() -> Vec<Tool> {
    Operation::ALL
        .into_iter()
        .map(|op| {
            let def = op.def();
            let schema_obj = op
                .input_schema()
                .as_object()
                .cloned()
                .unwrap_or_else(JsonObject::new);
            let mut tool = Tool::new(def.name, def.description, Arc::new(schema_obj));
            tool.annotations = Some(annotations_for_method(def.route.method, def.title));
            tool
        })
        .collect()
}

/// SHA-256 (hex) over the canonical JSON form of the catalog.
#[must_use]
pub fn fingerprint() -> String {
    fingerprint_of(tools())
}

fn fingerprint_of(tools: &[Tool]) -> String {
    let mut entries: Vec<(String, Value)> = tools
        .iter()
        .map(|t| {
            let v = serde_json::json!({
                "name": t.name,
                "description": t.description.as_deref().unwrap_or_default(),
                "inputSchema": Value::Object(t.input_schema.as_ref().clone()),
                "annotations": serde_json::to_value(&t.annotations).unwrap_or(Value::Null),
            });
            (t.name.to_string(), canonicalize_json(&v))
        })
        .collect();

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let v = Value::Array(entries.into_iter().map(|(_k, v)| v).collect());
    let serialized = canonicalize_json(&v).to_string();
    hex::encode(sha2::Sha256::digest(serialized.as_bytes()))
}

fn canonicalize_json(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                if let Some(val) = map.get(&k) {
                    out.insert(k, canonicalize_json(val));
                }
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize_json).collect()),
        other => other.clone(),
    }
}
