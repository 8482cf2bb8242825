//! Source documents, format detection and export artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, ParseError, ReconstructError};
use crate::extract::Extractor;
use crate::reconstruct::reconstruct;
use crate::record::ConfigRecord;

/// Extensions accepted by [`ConfigDocument::from_upload`], compared
/// case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["json", "config"];

/// The two file shapes this crate reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Hierarchical JSON.
    Json,
    /// Line-oriented `<add key=".." value=".." />` markup.
    Markup,
}

impl ConfigFormat {
    /// `Json` for a `.json` file name (any case), `Markup` for anything else.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_extension(file_name).eq_ignore_ascii_case("json") {
            ConfigFormat::Json
        } else {
            ConfigFormat::Markup
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Markup => "markup",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text after the last `.` of `file_name`; empty when there is no dot.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// A configuration file as handed over by the host: its name and raw text.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    file_name: String,
    content: String,
}

impl ConfigDocument {
    /// Wraps a file without checking its extension.
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Wraps an uploaded file, rejecting extensions other than `.json` and
    /// `.config`.
    pub fn from_upload(
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let file_name = file_name.into();
        let extension = file_extension(&file_name);
        if !ACCEPTED_EXTENSIONS
            .iter()
            .any(|accepted| extension.eq_ignore_ascii_case(accepted))
        {
            return Err(DocumentError::UnsupportedFile { file_name });
        }
        Ok(Self::new(file_name, content))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Extension as written in the file name, case preserved.
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    pub fn format(&self) -> ConfigFormat {
        ConfigFormat::from_file_name(&self.file_name)
    }

    pub fn extract(&self, extractor: &Extractor) -> Result<Vec<ConfigRecord>, ParseError> {
        extractor.extract(&self.content, self.format())
    }
}

// Raw content may hold secrets; only its size is shown.
impl fmt::Debug for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigDocument")
            .field("file_name", &self.file_name)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// A rebuilt file ready to hand to a download or write step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content: String,
}

/// Rebuilds `records` in the format of `document` and names the result
/// `{config_id}.{extension}` after the original file.
pub fn export(
    records: &[ConfigRecord],
    document: &ConfigDocument,
    config_id: &str,
) -> Result<ExportArtifact, ReconstructError> {
    let content = reconstruct(records, document.format())?;
    let file_name = match document.extension() {
        "" => config_id.to_string(),
        extension => format!("{config_id}.{extension}"),
    };
    Ok(ExportArtifact { file_name, content })
}
