//! `slog` integration.
//!
//! Records are emitted as nested JSON objects through `slog`'s nested-value
//! support, with the value already masked by its sensitivity. Logging never
//! fails because of this module: if a payload cannot be turned into JSON it
//! is logged as a placeholder string.

use serde_json::{json, Value as JsonValue};
use slog::{o, Discard, Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::record::{ConfigRecord, RecordField};
use crate::sensitivity::{Sensitivity, SensitivityCounts};

/// A logger that drops everything.
pub fn discard() -> Logger {
    Logger::root(Discard, o!())
}

fn emit_json(
    value: JsonValue,
    record: &Record<'_>,
    key: Key,
    serializer: &mut dyn Serializer,
) -> SlogResult {
    let nested = slog::Serde(value);
    SlogValue::serialize(&nested, record, key, serializer)
}

impl SlogValue for ConfigRecord {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let payload = json!({
            "key": self.key(),
            "originalKey": self.original_key(),
            "value": self.masked_value(),
            "sensitivity": self.sensitivity().as_str(),
        });
        emit_json(payload, record, key, serializer)
    }
}

impl SlogValue for SensitivityCounts {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let payload = serde_json::to_value(self)
            .unwrap_or_else(|_| JsonValue::String("Failed to serialize counts".to_string()));
        emit_json(payload, record, key, serializer)
    }
}

impl SlogValue for Sensitivity {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}

impl SlogValue for RecordField {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}
