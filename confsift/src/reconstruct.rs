//! Rebuilding file text from a flat record sequence.
//!
//! JSON output splits each record key on `.` and nests objects along the
//! way. Every leaf is written as a JSON string, since values were coerced to
//! text on extraction. Members keep first-insertion order, so the same
//! records always produce the same bytes.
//!
//! A key whose path would run through an existing leaf, or a leaf that would
//! overwrite an existing object (`a` and `a.b` in the same sequence), is
//! rejected with [`ReconstructError::PathCollision`]. A leaf written twice
//! keeps its first position and takes the last value.
//!
//! Markup output is one `<add key=".." value=".." />` line per record with
//! XML entities escaped.

use serde_json::{Map, Value};

use crate::document::ConfigFormat;
use crate::error::ReconstructError;
use crate::extract::escape_entities;
use crate::record::ConfigRecord;

/// Serializes `records` in `format`.
pub fn reconstruct(
    records: &[ConfigRecord],
    format: ConfigFormat,
) -> Result<String, ReconstructError> {
    match format {
        ConfigFormat::Json => reconstruct_json(records),
        ConfigFormat::Markup => Ok(reconstruct_markup(records)),
    }
}

/// Nested JSON text, indented by two spaces.
pub fn reconstruct_json(records: &[ConfigRecord]) -> Result<String, ReconstructError> {
    let root = rebuild_object(records)?;
    Ok(serde_json::to_string_pretty(&Value::Object(root))?)
}

/// The nested object `records` describe.
pub fn rebuild_object(records: &[ConfigRecord]) -> Result<Map<String, Value>, ReconstructError> {
    let mut root = Map::new();
    for record in records {
        insert_path(&mut root, record.key(), record.value())?;
    }
    Ok(root)
}

fn insert_path(
    root: &mut Map<String, Value>,
    key: &str,
    value: &str,
) -> Result<(), ReconstructError> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = root;
    let mut end = 0;
    for (i, segment) in parents.into_iter().flat_map(|p| p.split('.')).enumerate() {
        if i > 0 {
            end += 1;
        }
        end += segment.len();
        current = match current
            .entry(segment)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(children) => children,
            _ => return Err(collision(key, &key[..end])),
        };
    }

    if matches!(current.get(leaf), Some(Value::Object(_))) {
        return Err(collision(key, key));
    }
    current.insert(leaf.to_string(), Value::String(value.to_string()));
    Ok(())
}

fn collision(key: &str, prefix: &str) -> ReconstructError {
    ReconstructError::PathCollision {
        key: key.to_string(),
        prefix: prefix.to_string(),
    }
}

/// `<add key=".." value=".." />` lines joined with `\n`.
pub fn reconstruct_markup(records: &[ConfigRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "<add key=\"{}\" value=\"{}\" />",
                escape_entities(record.key()),
                escape_entities(record.value())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{reconstruct, reconstruct_json, reconstruct_markup};
    use crate::document::ConfigFormat;
    use crate::error::ReconstructError;
    use crate::extract::{extract_json, extract_markup};
    use crate::record::ConfigRecord;
    use crate::sensitivity::Sensitivity;

    fn record(key: &str, value: &str) -> ConfigRecord {
        let leaf = key.rsplit('.').next().unwrap_or(key);
        ConfigRecord::new(key, leaf, value, Sensitivity::Low)
    }

    #[test]
    fn shared_prefixes_merge() {
        let records = [record("db.host", "h"), record("db.port", "5432"), record("name", "app")];
        let text = reconstruct_json(&records).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"db": {"host": "h", "port": "5432"}, "name": "app"}));
    }

    #[test]
    fn output_is_pretty_and_ordered() {
        let records = [record("b", "1"), record("a.x", "2")];
        let text = reconstruct_json(&records).unwrap();
        assert_eq!(text, "{\n  \"b\": \"1\",\n  \"a\": {\n    \"x\": \"2\"\n  }\n}");
    }

    #[test]
    fn empty_sequence_is_empty_object() {
        assert_eq!(reconstruct_json(&[]).unwrap(), "{}");
        assert_eq!(reconstruct_markup(&[]), "");
    }

    #[test]
    fn round_trip_keeps_structure_with_string_leaves() {
        let source = r#"{"Logging":{"Level":"Info","Retain":7},"Enabled":true,"Name":"svc"}"#;
        let rebuilt = reconstruct(&extract_json(source).unwrap(), ConfigFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&rebuilt).unwrap();
        assert_eq!(
            parsed,
            json!({"Logging": {"Level": "Info", "Retain": "7"}, "Enabled": "true", "Name": "svc"})
        );
    }

    #[test]
    fn leaf_then_child_collides() {
        let err = reconstruct_json(&[record("a", "1"), record("a.b", "2")]).unwrap_err();
        match err {
            ReconstructError::PathCollision { key, prefix } => {
                assert_eq!(key, "a.b");
                assert_eq!(prefix, "a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn child_then_leaf_collides() {
        let err = reconstruct_json(&[record("a.b.c", "1"), record("a.b", "2")]).unwrap_err();
        match err {
            ReconstructError::PathCollision { key, prefix } => {
                assert_eq!(key, "a.b");
                assert_eq!(prefix, "a.b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collision_reports_deep_prefix() {
        let err = reconstruct_json(&[record("x.y", "1"), record("x.y.z.w", "2")]).unwrap_err();
        assert!(matches!(
            err,
            ReconstructError::PathCollision { ref prefix, .. } if prefix == "x.y"
        ));
    }

    #[test]
    fn repeated_leaf_keeps_last_value_first_position() {
        let records = [record("a", "1"), record("b", "2"), record("a", "3")];
        let text = reconstruct_json(&records).unwrap();
        assert_eq!(text, "{\n  \"a\": \"3\",\n  \"b\": \"2\"\n}");
    }

    #[test]
    fn markup_lines() {
        let records = [record("Port", "5432"), record("Host", "db1")];
        assert_eq!(
            reconstruct(&records, ConfigFormat::Markup).unwrap(),
            "<add key=\"Port\" value=\"5432\" />\n<add key=\"Host\" value=\"db1\" />"
        );
    }

    #[test]
    fn markup_escaping_round_trips() {
        let records = [record("Motto", "say \"hi\" & <bye>")];
        let text = reconstruct_markup(&records);
        assert_eq!(
            text,
            "<add key=\"Motto\" value=\"say &quot;hi&quot; &amp; &lt;bye&gt;\" />"
        );
        let back = extract_markup(&text);
        assert_eq!(back[0].value(), "say \"hi\" & <bye>");
    }
}
