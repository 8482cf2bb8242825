//! Explicit per-document editing state.
//!
//! An [`ExtractionSession`] owns one document, the records extracted from
//! it and the history of edits applied since. Nothing is shared between
//! sessions; a host that works on several files keeps one session per file.

use std::fmt;

use serde::{Deserialize, Serialize};
use slog::{debug, info, o, Logger};

use crate::document::{self, ConfigDocument, ConfigFormat, ExportArtifact};
use crate::error::{IndexError, ParseError, ReconstructError};
use crate::extract::Extractor;
use crate::policy::MaskPolicies;
use crate::reconstruct::reconstruct;
use crate::record::{self, ConfigRecord, RecordField};
use crate::sensitivity::{Sensitivity, SensitivityCounts};

/// One applied edit, kept so it can be undone.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdit {
    pub index: usize,
    pub field: RecordField,
    pub previous: String,
    pub current: String,
    /// Sensitivity of the edited record, used to mask `Debug` output.
    pub sensitivity: Sensitivity,
}

impl fmt::Debug for RecordEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |text: &str| match self.field {
            RecordField::Key => text.to_string(),
            RecordField::Value if cfg!(any(test, feature = "testing")) => text.to_string(),
            RecordField::Value => MaskPolicies::builtin().mask(self.sensitivity, text),
        };
        f.debug_struct("RecordEdit")
            .field("index", &self.index)
            .field("field", &self.field)
            .field("previous", &mask(&self.previous))
            .field("current", &mask(&self.current))
            .field("sensitivity", &self.sensitivity)
            .finish()
    }
}

/// A document, its flat records and the edits made to them.
#[derive(Clone, Debug)]
pub struct ExtractionSession {
    document: ConfigDocument,
    records: Vec<ConfigRecord>,
    history: Vec<RecordEdit>,
    logger: Logger,
}

impl ExtractionSession {
    /// Extracts `document` and starts a session over the result.
    ///
    /// ```rust
    /// use confsift::{ConfigDocument, Extractor, ExtractionSession, RecordField};
    ///
    /// let document = ConfigDocument::new("web.config", "<add key=\"Port\" value=\"80\" />");
    /// let mut session = ExtractionSession::open(document, &Extractor::default()).unwrap();
    /// session.update(0, RecordField::Value, "5432").unwrap();
    /// assert_eq!(session.reconstruct().unwrap(), "<add key=\"Port\" value=\"5432\" />");
    /// ```
    pub fn open(document: ConfigDocument, extractor: &Extractor) -> Result<Self, ParseError> {
        let logger = extractor.logger().new(o!("file" => document.file_name().to_string()));
        let extractor = extractor.clone().with_logger(logger.clone());
        let records = document.extract(&extractor)?;
        let session = Self::from_records(document, records, logger);
        info!(session.logger, "configuration extracted";
            "format" => session.format().as_str(),
            "records" => session.records.len(),
            "counts" => session.counts());
        Ok(session)
    }

    /// Resumes a session over records that were extracted earlier.
    pub fn from_records(
        document: ConfigDocument,
        records: Vec<ConfigRecord>,
        logger: Logger,
    ) -> Self {
        Self {
            document,
            records,
            history: Vec::new(),
            logger,
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub const fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn format(&self) -> ConfigFormat {
        self.document.format()
    }

    pub fn records(&self) -> &[ConfigRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ConfigRecord> {
        self.records
    }

    pub fn history(&self) -> &[RecordEdit] {
        &self.history
    }

    pub fn is_modified(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn counts(&self) -> SensitivityCounts {
        SensitivityCounts::from_records(&self.records)
    }

    /// Replaces one field of the record at `index` and records the edit.
    pub fn update(
        &mut self,
        index: usize,
        field: RecordField,
        new_value: impl Into<String>,
    ) -> Result<&ConfigRecord, IndexError> {
        let current = new_value.into();
        let previous = record::update(&mut self.records, index, field, current.clone())?;
        let edited = &self.records[index];
        debug!(self.logger, "record updated";
            "index" => index,
            "field" => field,
            "record" => edited);
        self.history.push(RecordEdit {
            index,
            field,
            previous,
            current,
            sensitivity: edited.sensitivity(),
        });
        Ok(edited)
    }

    /// Reverts the latest edit and returns it, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<RecordEdit> {
        let edit = self.history.pop()?;
        let reverted = record::update(
            &mut self.records,
            edit.index,
            edit.field,
            edit.previous.clone(),
        );
        debug_assert!(reverted.is_ok(), "history only holds in-range edits");
        debug!(self.logger, "edit undone"; "index" => edit.index, "field" => edit.field);
        Some(edit)
    }

    /// Rebuilds the file text in the document's format.
    pub fn reconstruct(&self) -> Result<String, ReconstructError> {
        let text = reconstruct(&self.records, self.format())?;
        debug!(self.logger, "configuration rebuilt"; "bytes" => text.len());
        Ok(text)
    }

    /// Rebuilds the file and names it after `config_id`.
    pub fn export(&self, config_id: &str) -> Result<ExportArtifact, ReconstructError> {
        let artifact = document::export(&self.records, &self.document, config_id)?;
        info!(self.logger, "configuration exported"; "export_file" => &artifact.file_name);
        Ok(artifact)
    }
}
