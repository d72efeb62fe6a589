//! Declarative input schemas.
//!
//! A schema is static data ([`Field`] / [`Shape`]). The JSON Schema advertised in `tools/list`
//! and the validator applied on `tools/call` are both derived from it.

use crate::error::{ValidationError, Violation};
use serde_json::{Map, Number, Value, json};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub enum Shape {
    String,
    Number { minimum: Option<f64>, integer: bool },
    Boolean,
    /// One of a fixed set of string literals.
    Enum(&'static [&'static str]),
    /// One of a fixed set of integer literals.
    IntEnum(&'static [i64]),
    Array {
        items: &'static Shape,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object(&'static [Field]),
}

impl Shape {
    pub const INTEGER: Shape = Shape::Number {
        minimum: None,
        integer: true,
    };
    pub const NON_NEGATIVE_INTEGER: Shape = Shape::Number {
        minimum: Some(0.0),
        integer: true,
    };
    pub const POSITIVE_INTEGER: Shape = Shape::Number {
        minimum: Some(1.0),
        integer: true,
    };
    pub const NUMBER: Shape = Shape::Number {
        minimum: None,
        integer: false,
    };

    #[must_use]
    pub const fn array(items: &'static Shape) -> Shape {
        Shape::Array {
            items,
            min_items: None,
            max_items: None,
        }
    }

    #[must_use]
    pub const fn non_empty_array(items: &'static Shape) -> Shape {
        Shape::Array {
            items,
            min_items: Some(1),
            max_items: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl DefaultValue {
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(n) => Value::from(n),
            DefaultValue::Str(s) => Value::String(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    /// Filled in when absent. Never overrides a value that is present (even an empty one).
    Default(DefaultValue),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub presence: Presence,
    pub description: &'static str,
}

impl Field {
    #[must_use]
    pub const fn required(name: &'static str, shape: Shape, description: &'static str) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Required,
            description,
        }
    }

    #[must_use]
    pub const fn optional(name: &'static str, shape: Shape, description: &'static str) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Optional,
            description,
        }
    }

    #[must_use]
    pub const fn defaulted(
        name: &'static str,
        shape: Shape,
        default: DefaultValue,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            shape,
            presence: Presence::Default(default),
            description,
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// A field list together with its compiled JSON Schema.
///
/// The `Field` walk handles presence: defaults, `null` as absent, unknown keys, missing required
/// fields. Type and constraint checks (enums, minimums, array bounds) come from `jsonschema`.
pub struct InputSchema {
    fields: &'static [Field],
    constraints: Option<jsonschema::Validator>,
}

impl InputSchema {
    #[must_use]
    pub fn compile(fields: &'static [Field]) -> Self {
        let constraints = match jsonschema::validator_for(&object_schema(fields)) {
            Ok(validator) => Some(validator),
            Err(e) => {
                warn!(error = %e, "input schema does not compile; only presence is checked");
                None
            }
        };
        Self {
            fields,
            constraints,
        }
    }

    /// Check `args`, returning a normalized argument object.
    ///
    /// - `null` (or missing) `args` is treated as `{}`.
    /// - unknown keys are dropped
    /// - `null` field values count as absent
    /// - defaults are applied to absent fields
    /// - integral floats in integer fields become integers
    ///
    /// # Errors
    ///
    /// Returns every violation found (not just the first).
    pub fn validate(&self, args: &Value) -> Result<Map<String, Value>, ValidationError> {
        let empty = Map::new();
        let obj = match args {
            Value::Object(m) => m,
            Value::Null => &empty,
            other => {
                return Err(ValidationError {
                    violations: vec![Violation::new(
                        ROOT_PATH,
                        format!("expected object, got {}", kind_of(other)),
                    )],
                });
            }
        };

        let mut violations = Vec::new();
        let normalized = normalize_object(self.fields, obj, "", &mut violations);

        if let Some(validator) = &self.constraints {
            let instance = Value::Object(normalized.clone());
            for e in validator.iter_errors(&instance) {
                // Missing fields were already reported by the walk, with their full path.
                if matches!(
                    e.kind(),
                    jsonschema::error::ValidationErrorKind::Required { .. }
                ) {
                    continue;
                }
                violations.push(Violation::new(
                    dotted_path(&e.instance_path().to_string()),
                    e.to_string(),
                ));
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError { violations })
        }
    }
}

const ROOT_PATH: &str = "(root)";

fn normalize_object(
    fields: &[Field],
    obj: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };

        match obj.get(field.name).filter(|v| !v.is_null()) {
            Some(value) => {
                out.insert(
                    field.name.to_string(),
                    normalize_value(&field.shape, value, &path, violations),
                );
            }
            None => match field.presence {
                Presence::Required => {
                    violations.push(Violation::new(path, "required field is missing"));
                }
                Presence::Optional => {}
                Presence::Default(d) => {
                    out.insert(field.name.to_string(), d.to_value());
                }
            },
        }
    }
    out
}

/// Values of the wrong type pass through unchanged for the schema check to report.
fn normalize_value(
    shape: &Shape,
    value: &Value,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Value {
    match (shape, value) {
        (Shape::Object(fields), Value::Object(obj)) => {
            Value::Object(normalize_object(fields, obj, path, violations))
        }
        (Shape::Array { items, .. }, Value::Array(arr)) => Value::Array(
            arr.iter()
                .enumerate()
                .map(|(i, item)| normalize_value(items, item, &format!("{path}[{i}]"), violations))
                .collect(),
        ),
        (Shape::Number { integer: true, .. } | Shape::IntEnum(_), Value::Number(n)) => {
            integral(n).map_or_else(|| value.clone(), Value::from)
        }
        _ => value.clone(),
    }
}

/// `2.0` -> `2`. `None` for non-integral floats and for numbers that are already integers.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(n: &Number) -> Option<i64> {
    if n.is_i64() || n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

/// JSON pointer (`/sections/0/rows/1/title`) -> argument path (`sections[0].rows[1].title`).
fn dotted_path(pointer: &str) -> String {
    let mut out = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            out.push('[');
            out.push_str(&segment);
            out.push(']');
        } else {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(&segment);
        }
    }
    if out.is_empty() {
        ROOT_PATH.to_string()
    } else {
        out
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON Schema (object) for a field list.
#[must_use]
pub fn object_schema(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<&str> = Vec::new();

    for field in fields {
        let mut prop = shape_schema(&field.shape);
        if !field.description.is_empty() {
            prop["description"] = json!(field.description);
        }
        if let Presence::Default(d) = field.presence {
            prop["default"] = d.to_value();
        }
        properties.insert(field.name.to_string(), prop);

        if field.is_required() {
            required.push(field.name);
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

fn shape_schema(shape: &Shape) -> Value {
    match shape {
        Shape::String => json!({"type": "string"}),
        Shape::Boolean => json!({"type": "boolean"}),
        Shape::Number { minimum, integer } => {
            let mut s = json!({"type": if *integer { "integer" } else { "number" }});
            if let Some(min) = minimum {
                #[allow(clippy::cast_possible_truncation)]
                let min = if *integer { json!(*min as i64) } else { json!(min) };
                s["minimum"] = min;
            }
            s
        }
        Shape::Enum(choices) => json!({"type": "string", "enum": choices}),
        Shape::IntEnum(choices) => json!({"type": "integer", "enum": choices}),
        Shape::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut s = json!({"type": "array", "items": shape_schema(items)});
            if let Some(min) = min_items {
                s["minItems"] = json!(min);
            }
            if let Some(max) = max_items {
                s["maxItems"] = json!(max);
            }
            s
        }
        Shape::Object(fields) => object_schema(fields),
    }
}
