//! Sensitivity levels and the key-name heuristic that assigns them.
//!
//! Classification is a plain substring test on the lower-cased *leaf* key
//! name. The high list is checked before the medium list, so a key such as
//! `database_password` is `High` even though it also mentions `database`.
//! Dotted paths are never classified as a whole: `password.hint` looks at
//! `hint` only.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::record::ConfigRecord;

/// Patterns that mark a key as [`Sensitivity::High`], in match order.
pub const HIGH_PATTERNS: [&str; 5] = ["password", "secret", "key", "token", "connectionstring"];

/// Patterns that mark a key as [`Sensitivity::Medium`], in match order.
pub const MEDIUM_PATTERNS: [&str; 6] = ["server", "host", "url", "username", "email", "database"];

static DEFAULT_RULES: Lazy<SensitivityRules> = Lazy::new(SensitivityRules::default);

/// How confidential a configuration value probably is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Credentials, keys and tokens.
    High,
    /// Infrastructure details such as hosts, URLs and account names.
    Medium,
    /// Everything else.
    Low,
}

impl Sensitivity {
    /// All levels, most sensitive first.
    pub const ALL: [Sensitivity; 3] = [Sensitivity::High, Sensitivity::Medium, Sensitivity::Low];

    /// Lower-case label, as used in serialized records.
    pub const fn as_str(self) -> &'static str {
        match self {
            Sensitivity::High => "high",
            Sensitivity::Medium => "medium",
            Sensitivity::Low => "low",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a leaf key name with the built-in pattern lists.
///
/// ```rust
/// use confsift::{classify, Sensitivity};
///
/// assert_eq!(classify("ApiKey"), Sensitivity::High);
/// assert_eq!(classify("DbHost"), Sensitivity::Medium);
/// assert_eq!(classify("Port"), Sensitivity::Low);
/// ```
pub fn classify(key: &str) -> Sensitivity {
    DEFAULT_RULES.classify(key)
}

/// Ordered pattern lists used to classify key names.
///
/// Patterns are stored lower-cased. Rules deserialize from
/// `{"high": [...], "medium": [...]}`; a missing list falls back to the
/// built-in one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RulesFile")]
pub struct SensitivityRules {
    high: Vec<String>,
    medium: Vec<String>,
}

#[derive(Deserialize)]
struct RulesFile {
    #[serde(default = "default_high")]
    high: Vec<String>,
    #[serde(default = "default_medium")]
    medium: Vec<String>,
}

fn default_high() -> Vec<String> {
    HIGH_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

fn default_medium() -> Vec<String> {
    MEDIUM_PATTERNS.iter().map(|p| (*p).to_string()).collect()
}

impl From<RulesFile> for SensitivityRules {
    fn from(file: RulesFile) -> Self {
        Self::new(file.high, file.medium)
    }
}

impl Default for SensitivityRules {
    fn default() -> Self {
        Self {
            high: default_high(),
            medium: default_medium(),
        }
    }
}

impl SensitivityRules {
    /// Builds rules from custom pattern lists. Order is match order.
    pub fn new<H, M>(high: H, medium: M) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self {
            high: high.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
            medium: medium.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    /// Parses rules from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str(text).map_err(ParseError::from)
    }

    pub fn high_patterns(&self) -> &[String] {
        &self.high
    }

    pub fn medium_patterns(&self) -> &[String] {
        &self.medium
    }

    /// Classifies a leaf key name.
    pub fn classify(&self, key: &str) -> Sensitivity {
        let key = key.to_lowercase();
        if self.high.iter().any(|p| key.contains(p.as_str())) {
            Sensitivity::High
        } else if self.medium.iter().any(|p| key.contains(p.as_str())) {
            Sensitivity::Medium
        } else {
            Sensitivity::Low
        }
    }
}

/// Number of records at each sensitivity level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SensitivityCounts {
    pub fn from_records(records: &[ConfigRecord]) -> Self {
        records.iter().map(ConfigRecord::sensitivity).collect()
    }

    pub const fn get(&self, level: Sensitivity) -> usize {
        match level {
            Sensitivity::High => self.high,
            Sensitivity::Medium => self.medium,
            Sensitivity::Low => self.low,
        }
    }

    pub const fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    /// `(level, count)` pairs, most sensitive first.
    pub fn iter(&self) -> impl Iterator<Item = (Sensitivity, usize)> + '_ {
        Sensitivity::ALL.into_iter().map(move |level| (level, self.get(level)))
    }
}

impl FromIterator<Sensitivity> for SensitivityCounts {
    fn from_iter<I: IntoIterator<Item = Sensitivity>>(iter: I) -> Self {
        let mut counts = Self::default();
        for level in iter {
            match level {
                Sensitivity::High => counts.high += 1,
                Sensitivity::Medium => counts.medium += 1,
                Sensitivity::Low => counts.low += 1,
            }
        }
        counts
    }
}
