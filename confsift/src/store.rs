//! In-memory store of saved configuration snapshots.
//!
//! Snapshots are grouped by application name and identified within it by
//! `{application}_{environment}_{version}`. Saving the same identity again
//! replaces the earlier snapshot. An application disappears from the store
//! when its last snapshot is deleted.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slog::{info, Logger};

use crate::document::{self, ConfigDocument, ExportArtifact};
use crate::error::{Result, StoreError};
use crate::logging;
use crate::record::ConfigRecord;
use crate::session::ExtractionSession;

/// Deployment stage a snapshot is saved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    Dev,
    Qa,
    Uat,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Uat,
        Environment::Prod,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Qa => "QA",
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{application}_{environment}_{version}`.
pub fn config_id(application: &str, environment: Environment, version: &str) -> String {
    format!("{application}_{environment}_{version}")
}

/// A saved copy of a session's records.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSnapshot {
    /// The version label the snapshot was saved under.
    pub name: String,
    pub environment: Environment,
    pub original_file_name: String,
    pub original_content: String,
    pub records: Vec<ConfigRecord>,
    pub saved_at: DateTime<Utc>,
}

impl SavedSnapshot {
    pub fn document(&self) -> ConfigDocument {
        ConfigDocument::new(self.original_file_name.clone(), self.original_content.clone())
    }

    /// Opens a fresh session over the saved records.
    pub fn restore(&self, logger: Logger) -> ExtractionSession {
        ExtractionSession::from_records(self.document(), self.records.clone(), logger)
    }
}

impl fmt::Debug for SavedSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedSnapshot")
            .field("name", &self.name)
            .field("environment", &self.environment)
            .field("original_file_name", &self.original_file_name)
            .field("records", &self.records)
            .field("saved_at", &self.saved_at)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    applications: BTreeMap<String, BTreeMap<String, SavedSnapshot>>,
    logger: Logger,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(logging::discard())
    }
}

impl SnapshotStore {
    pub fn new(logger: Logger) -> Self {
        Self {
            applications: BTreeMap::new(),
            logger,
        }
    }

    /// Saves the session's current records and returns the config id.
    ///
    /// `application` and `version` are trimmed and must not be empty.
    pub fn save(
        &mut self,
        application: &str,
        environment: Environment,
        version: &str,
        session: &ExtractionSession,
    ) -> Result<String, StoreError> {
        let application = application.trim();
        let version = version.trim();
        if application.is_empty() {
            return Err(StoreError::MissingField("application"));
        }
        if version.is_empty() {
            return Err(StoreError::MissingField("version"));
        }

        let id = config_id(application, environment, version);
        let snapshot = SavedSnapshot {
            name: version.to_string(),
            environment,
            original_file_name: session.document().file_name().to_string(),
            original_content: session.document().content().to_string(),
            records: session.records().to_vec(),
            saved_at: Utc::now(),
        };
        let replaced = self
            .applications
            .entry(application.to_string())
            .or_default()
            .insert(id.clone(), snapshot)
            .is_some();

        info!(self.logger, "configuration saved";
            "application" => application,
            "config_id" => &id,
            "records" => session.records().len(),
            "replaced" => replaced);
        Ok(id)
    }

    pub fn get(&self, application: &str, config_id: &str) -> Option<&SavedSnapshot> {
        self.applications.get(application)?.get(config_id)
    }

    /// Application names, sorted.
    pub fn applications(&self) -> impl Iterator<Item = &str> + '_ {
        self.applications.keys().map(String::as_str)
    }

    /// Snapshots of one application, sorted by config id.
    pub fn list(&self, application: &str) -> Vec<(&str, &SavedSnapshot)> {
        self.applications
            .get(application)
            .map(|snapshots| {
                snapshots
                    .iter()
                    .map(|(id, snapshot)| (id.as_str(), snapshot))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.applications.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Removes a snapshot, and its application once it has no snapshots left.
    pub fn delete(
        &mut self,
        application: &str,
        config_id: &str,
    ) -> Result<SavedSnapshot, StoreError> {
        let not_found = || StoreError::NotFound {
            application: application.to_string(),
            config_id: config_id.to_string(),
        };
        let snapshots = self.applications.get_mut(application).ok_or_else(not_found)?;
        let removed = snapshots.remove(config_id).ok_or_else(not_found)?;
        if snapshots.is_empty() {
            self.applications.remove(application);
        }
        info!(self.logger, "configuration deleted";
            "application" => application,
            "config_id" => config_id);
        Ok(removed)
    }

    /// Rebuilds a saved snapshot into a file named after its config id.
    pub fn export(&self, application: &str, config_id: &str) -> Result<ExportArtifact> {
        let snapshot = self.get(application, config_id).ok_or_else(|| StoreError::NotFound {
            application: application.to_string(),
            config_id: config_id.to_string(),
        })?;
        let artifact = document::export(&snapshot.records, &snapshot.document(), config_id)?;
        info!(self.logger, "configuration exported";
            "config_id" => config_id,
            "export_file" => &artifact.file_name);
        Ok(artifact)
    }
}
