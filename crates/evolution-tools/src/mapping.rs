//! Request mapping: validated arguments + ambient config -> one outbound HTTP request.
//!
//! Mapping is pure. The same inputs always produce the same [`OutboundRequest`].

use crate::catalog::{Auth, Operation, Target};
use crate::config::AmbientConfig;
use crate::error::{Error, Result, ValidationError, Violation};
use crate::semantics::HttpMethod;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

pub const API_KEY_HEADER: &str = "apikey";

/// Arguments that passed schema validation, with defaults applied and unknown keys dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedArguments(Map<String, Value>);

impl ValidatedArguments {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// All arguments as a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// All arguments except `keys`, as a JSON object.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Value {
        Value::Object(
            self.0
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Query pairs for `keys`, in the given order. Absent keys are skipped.
    #[must_use]
    pub fn query_pairs(&self, keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .filter_map(|k| self.0.get(*k).map(|v| ((*k).to_string(), value_to_string(v))))
            .collect()
    }

    /// Every argument as a query pair.
    #[must_use]
    pub fn all_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), value_to_string(v)))
            .collect()
    }
}

/// Where the arguments travel: query string and/or JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Payload {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// JSON body. `null` members are removed so absent optionals never reach the wire.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            query: Vec::new(),
            body: Some(prune_nulls(body)),
        }
    }

    #[must_use]
    pub fn query(query: Vec<(String, String)>) -> Self {
        Self { query, body: None }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    /// Endpoint URL without query string.
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Build the outbound request for `op`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the operation needs an ambient value that is not configured or if
/// the base URL is invalid.
pub fn map_request(
    op: Operation,
    args: &ValidatedArguments,
    config: &AmbientConfig,
) -> Result<OutboundRequest> {
    let def = op.def();
    let route = &def.route;

    let mut headers = Vec::new();
    if route.auth == Auth::ApiKey {
        headers.push((API_KEY_HEADER.to_string(), config.api_key()?.to_string()));
    }

    let target = match route.target {
        Target::Global => None,
        Target::Instance => Some(config.instance_id()?),
        Target::Argument(key) => Some(args.str(key).ok_or_else(|| {
            Error::Validation(ValidationError {
                violations: vec![Violation::new(key, "required field is missing")],
            })
        })?),
    };

    let mut url = config.base_url()?;
    {
        let mut segments = url.path_segments_mut().map_err(|()| {
            Error::Config(format!(
                "Invalid API base URL '{}': cannot be used as a base",
                config.api_base_url()
            ))
        })?;
        segments.pop_if_empty().push(route.resource).push(route.action);
        if let Some(t) = target {
            segments.push(t);
        }
    }

    let Payload { query, body } = (def.payload)(args);

    Ok(OutboundRequest {
        method: route.method,
        url,
        headers,
        query,
        body,
    })
}

fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
