//! Turns attributes into canonical display values.

use std::fmt;

use hcl::eval::{Context, Evaluate};

use crate::hclext::{Attribute, Value};

/// Display state of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluated {
    NotSet,
    Null,
    Unknown,
    Known(String),
    /// Present, but neither pre-evaluated nor statically evaluable.
    Dynamic,
}

impl fmt::Display for Evaluated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSet => f.write_str("<not set>"),
            Self::Null => f.write_str("<null>"),
            Self::Unknown => f.write_str("<unknown>"),
            Self::Known(rendered) => f.write_str(rendered),
            Self::Dynamic => f.write_str("<dynamic>"),
        }
    }
}

/// Evaluates an attribute that may be missing, pre-evaluated by the host,
/// or carry only an expression.
///
/// A pre-evaluated null carries no information and is treated like a missing
/// value; only an expression that evaluates to null yields [`Evaluated::Null`].
///
/// Expressions are evaluated without any variables or functions in scope, so
/// anything referring to other objects comes back as [`Evaluated::Dynamic`].
pub fn evaluate(attr: Option<&Attribute>) -> Evaluated {
    let Some(attr) = attr else {
        return Evaluated::NotSet;
    };

    match &attr.value {
        Some(Value::Unknown) => return Evaluated::Unknown,
        Some(Value::Known(value)) if !value.is_null() => return from_value(value),
        _ => {}
    }

    if let Some(expr) = &attr.expr {
        let ctx = Context::new();
        match expr.evaluate(&ctx) {
            Ok(value) => return from_value(&value),
            Err(err) => {
                tracing::trace!(attribute = %attr.name, error = %err, "expression not statically evaluable");
            }
        }
    }

    Evaluated::Dynamic
}

fn from_value(value: &hcl::Value) -> Evaluated {
    match value {
        hcl::Value::Null => Evaluated::Null,
        hcl::Value::String(s) => Evaluated::Known(s.clone()),
        hcl::Value::Number(n) => Evaluated::Known(render_number(n)),
        hcl::Value::Bool(b) => Evaluated::Known(b.to_string()),
        composite => Evaluated::Known(render_composite(composite)),
    }
}

fn render_number(n: &hcl::Number) -> String {
    // as_i64 saturates for floats, so only integer-backed numbers take this path.
    if let Some(i) = n.as_i64().filter(|_| n.is_i64()) {
        return i.to_string();
    }
    if let Some(u) = n.as_u64().filter(|_| n.is_u64()) {
        return u.to_string();
    }
    // f64's Display is the shortest round-trip form and never uses an exponent.
    n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
}

/// Composite values render with object keys sorted so that equal values
/// always produce equal text.
fn render_composite(value: &hcl::Value) -> String {
    match value {
        hcl::Value::Null => "null".to_string(),
        hcl::Value::Bool(b) => b.to_string(),
        hcl::Value::Number(n) => render_number(n),
        hcl::Value::String(s) => quote(s),
        hcl::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_composite).collect();
            format!("[{}]", items.join(", "))
        }
        hcl::Value::Object(map) => {
            let mut entries: Vec<(&String, &hcl::Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{} = {}", quote(key), render_composite(value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
