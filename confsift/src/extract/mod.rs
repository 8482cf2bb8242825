//! Turning raw file text into the flat record sequence.
//!
//! [`Extractor`] carries the classification rules and a logger. The free
//! functions [`extract_json`] and [`extract_markup`] use the built-in rules
//! and log nothing.

mod json;
mod markup;

use slog::Logger;

pub use json::flatten;
pub(crate) use markup::escape_entities;

use crate::document::ConfigFormat;
use crate::error::ParseError;
use crate::logging;
use crate::record::ConfigRecord;
use crate::sensitivity::SensitivityRules;

/// Flattens a JSON document with the built-in rules.
///
/// ```rust
/// use confsift::{extract_json, Sensitivity};
///
/// let records = extract_json(r#"{"a": {"b": "c"}}"#).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].key(), "a.b");
/// assert_eq!(records[0].original_key(), "b");
/// assert_eq!(records[0].sensitivity(), Sensitivity::Low);
/// ```
pub fn extract_json(text: &str) -> Result<Vec<ConfigRecord>, ParseError> {
    Extractor::default().json(text)
}

/// Scans `<add key=".." value=".." />` lines with the built-in rules.
pub fn extract_markup(text: &str) -> Vec<ConfigRecord> {
    Extractor::default().markup(text)
}

/// Extraction with explicit rules and logging.
#[derive(Clone, Debug)]
pub struct Extractor {
    rules: SensitivityRules,
    logger: Logger,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(SensitivityRules::default())
    }
}

impl Extractor {
    pub fn new(rules: SensitivityRules) -> Self {
        Self {
            rules,
            logger: logging::discard(),
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub const fn rules(&self) -> &SensitivityRules {
        &self.rules
    }

    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Flattens a JSON document. Fails without partial output when `text`
    /// is not valid JSON.
    pub fn json(&self, text: &str) -> Result<Vec<ConfigRecord>, ParseError> {
        json::extract(text, &self.rules, &self.logger)
    }

    /// Scans markup lines. Lines that do not match are skipped.
    pub fn markup(&self, text: &str) -> Vec<ConfigRecord> {
        markup::extract(text, &self.rules, &self.logger)
    }

    /// Dispatches on `format`.
    pub fn extract(
        &self,
        text: &str,
        format: ConfigFormat,
    ) -> Result<Vec<ConfigRecord>, ParseError> {
        match format {
            ConfigFormat::Json => self.json(text),
            ConfigFormat::Markup => Ok(self.markup(text)),
        }
    }
}
