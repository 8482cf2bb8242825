//! Integration tests for the slog integration.
//!
//! These tests verify that:
//! - `ConfigRecord` serializes through `slog::Value` as nested JSON with a
//!   masked value,
//! - sensitivity counts are emitted as structured values,
//! - a session driven end to end never logs a high-sensitivity value in clear.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Arguments,
    sync::{Arc, Mutex},
};

use confsift::{
    ConfigDocument, ConfigRecord, Extractor, ExtractionSession, RecordField, Sensitivity,
    SensitivityCounts,
};
use serde_json::Value as JsonValue;
use slog::{o, Drain, Logger, OwnedKVList, Record, KV};

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    Serde(JsonValue),
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<CapturedValue> {
        self.captured.borrow().get(key).cloned()
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.to_string()));
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.into()));
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Serde(json));
        Ok(())
    }
}

/// Helper function to serialize a slog::Value into any Serializer.
fn serialize_to_capture<V: slog::Value, S: slog::Serializer>(
    value: &V,
    key: &'static str,
    serializer: &mut S,
) {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    value.serialize(&record, key, serializer).unwrap();
}

// Flattens every log record into one line of text.
#[derive(Clone, Default)]
struct CollectingDrain {
    lines: Arc<Mutex<Vec<String>>>,
}

struct LineSerializer<'a>(&'a mut String);

impl slog::Serializer for LineSerializer<'_> {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.0.push_str(&format!(" {key}={val}"));
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_string(val.as_serde()).unwrap_or_default();
        self.0.push_str(&format!(" {key}={json}"));
        Ok(())
    }
}

impl Drain for CollectingDrain {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<(), slog::Never> {
        let mut line = record.msg().to_string();
        let mut serializer = LineSerializer(&mut line);
        let _ = record.kv().serialize(record, &mut serializer);
        let _ = values.serialize(record, &mut serializer);
        self.lines.lock().unwrap().push(line);
        Ok(())
    }
}

impl CollectingDrain {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

// ============================================================================
// slog::Value implementations
// ============================================================================

#[test]
fn test_high_record_is_fully_masked() {
    let record = ConfigRecord::new("db.password", "password", "hunter2", Sensitivity::High);

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&record, "record", &mut serializer);

    if let Some(CapturedValue::Serde(json)) = serializer.get("record") {
        assert_eq!(json["key"], "db.password");
        assert_eq!(json["originalKey"], "password");
        assert_eq!(json["value"], "[REDACTED]");
        assert_eq!(json["sensitivity"], "high");
    } else {
        panic!("Expected Serde value for 'record' key");
    }
}

#[test]
fn test_medium_record_keeps_prefix() {
    let record = ConfigRecord::new("Host", "Host", "db.internal", Sensitivity::Medium);

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&record, "record", &mut serializer);

    if let Some(CapturedValue::Serde(json)) = serializer.get("record") {
        assert_eq!(json["value"], "db.********");
    } else {
        panic!("Expected Serde value for 'record' key");
    }
}

#[test]
fn test_low_record_is_clear() {
    let record = ConfigRecord::new("Port", "Port", "5432", Sensitivity::Low);

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&record, "record", &mut serializer);

    if let Some(CapturedValue::Serde(json)) = serializer.get("record") {
        assert_eq!(json["value"], "5432");
    } else {
        panic!("Expected Serde value for 'record' key");
    }
}

#[test]
fn test_counts_and_levels() {
    let counts = SensitivityCounts {
        high: 1,
        medium: 2,
        low: 3,
    };

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&counts, "counts", &mut serializer);
    serialize_to_capture(&Sensitivity::Medium, "level", &mut serializer);
    serialize_to_capture(&RecordField::Value, "field", &mut serializer);

    assert_eq!(
        serializer.get("counts"),
        Some(CapturedValue::Serde(serde_json::json!({"high": 1, "medium": 2, "low": 3})))
    );
    assert_eq!(serializer.get("level"), Some(CapturedValue::Str("medium".into())));
    assert_eq!(serializer.get("field"), Some(CapturedValue::Str("value".into())));
}

// ============================================================================
// Session logging
// ============================================================================

#[test]
fn test_session_logs_without_secrets() {
    let drain = CollectingDrain::default();
    let logger = Logger::root(drain.clone().fuse(), o!());
    let extractor = Extractor::default().with_logger(logger);

    let document = ConfigDocument::new(
        "appsettings.json",
        r#"{"Db":{"Password":"hunter2","Host":"db.internal"},"Port":5432}"#,
    );
    let mut session = ExtractionSession::open(document, &extractor).unwrap();
    session.update(0, RecordField::Value, "rotated-secret").unwrap();
    session.undo().unwrap();
    session.export("app_DEV_1").unwrap();

    let lines = drain.lines();
    assert!(lines.iter().any(|l| l.starts_with("configuration extracted")));
    assert!(lines.iter().any(|l| l.starts_with("record updated")));
    assert!(lines.iter().any(|l| l.starts_with("edit undone")));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("configuration exported") && l.contains("app_DEV_1.json")));
    assert!(lines.iter().all(|l| l.contains("file=appsettings.json")));

    for line in &lines {
        assert!(!line.contains("hunter2"), "{line}");
        assert!(!line.contains("rotated-secret"), "{line}");
        assert!(!line.contains("db.internal"), "{line}");
    }
}

#[test]
fn test_extraction_logs_non_object_root() {
    let drain = CollectingDrain::default();
    let logger = Logger::root(drain.clone().fuse(), o!());
    let records = Extractor::default().with_logger(logger).json("[1, 2]").unwrap();

    assert!(records.is_empty());
    assert!(drain
        .lines()
        .iter()
        .any(|l| l.starts_with("JSON root is not an object") && l.contains("root=array")));
}

#[test]
fn test_markup_extraction_logs_skipped_lines() {
    let drain = CollectingDrain::default();
    let logger = Logger::root(drain.clone().fuse(), o!());
    let text = "<appSettings>\n<add key=\"a\" value=\"1\" />\n</appSettings>";
    Extractor::default().with_logger(logger).markup(text);

    assert!(drain
        .lines()
        .iter()
        .any(|l| l.contains("records=1") && l.contains("skipped_lines=2")));
}
