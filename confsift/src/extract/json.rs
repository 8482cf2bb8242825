use serde_json::{Map, Number, Value};
use slog::{debug, warn, Logger};

use crate::error::ParseError;
use crate::record::ConfigRecord;
use crate::sensitivity::SensitivityRules;

pub(super) fn extract(
    text: &str,
    rules: &SensitivityRules,
    logger: &Logger,
) -> Result<Vec<ConfigRecord>, ParseError> {
    let root: Value = serde_json::from_str(text)?;
    if !root.is_object() {
        warn!(logger, "JSON root is not an object, nothing to extract"; "root" => kind(&root));
    }
    let records = flatten(&root, "", rules);
    debug!(logger, "extracted JSON records"; "records" => records.len());
    Ok(records)
}

/// Flattens `value` depth-first, joining member names onto `prefix` with `.`.
///
/// Members are visited in source order. Nested objects are walked; every
/// other value, arrays included, becomes one record whose value is its text.
/// Integral floats lose their fraction (`1e3` and `1000.0` both give `1000`);
/// arrays keep their compact JSON text. A non-object `value` yields nothing.
pub fn flatten(value: &Value, prefix: &str, rules: &SensitivityRules) -> Vec<ConfigRecord> {
    let mut records = Vec::new();
    if let Value::Object(members) = value {
        walk(members, prefix, rules, &mut records);
    }
    records
}

fn walk(
    members: &Map<String, Value>,
    prefix: &str,
    rules: &SensitivityRules,
    out: &mut Vec<ConfigRecord>,
) {
    for (name, value) in members {
        let full_path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            Value::Object(children) => walk(children, &full_path, rules, out),
            leaf => out.push(ConfigRecord::classified(
                full_path,
                name.as_str(),
                leaf_text(leaf),
                rules,
            )),
        }
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_text(number),
        other => other.to_string(),
    }
}

/// Shortest decimal text, without a trailing `.0` on whole floats.
#[allow(clippy::float_cmp)]
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
            if float == 0.0 {
                "0".to_string()
            } else {
                format!("{float:.0}")
            }
        }
        _ => number.to_string(),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
