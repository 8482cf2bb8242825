//! Masking policies for showing configuration values.
//!
//! Policies are pure string transformations. They never look at the key or
//! decide sensitivity; a record's [`Sensitivity`] picks the policy and the
//! policy only rewrites the value text.

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::sensitivity::Sensitivity;

/// Placeholder used when a value is hidden entirely.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

const MASK_CHAR: char = '*';

static DEFAULT_POLICIES: Lazy<MaskPolicies> = Lazy::new(MaskPolicies::default);

/// How a value is shown outside the editor (logs, `Debug`, summaries).
///
/// Keep variants count Unicode scalar values, not bytes. When the kept span
/// covers the whole value it is returned unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaskPolicy {
    /// Show the value as is.
    Reveal,
    /// Replace the value with a fixed placeholder.
    Full {
        placeholder: Cow<'static, str>,
    },
    /// Keep the first `n` characters and mask the rest.
    KeepFirst(usize),
    /// Keep the last `n` characters and mask the rest.
    KeepLast(usize),
}

impl MaskPolicy {
    /// [`MaskPolicy::Full`] with [`REDACTED_PLACEHOLDER`].
    #[must_use]
    pub fn default_full() -> Self {
        Self::Full {
            placeholder: Cow::Borrowed(REDACTED_PLACEHOLDER),
        }
    }

    /// [`MaskPolicy::Full`] with a custom placeholder.
    #[must_use]
    pub fn full_with<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full {
            placeholder: placeholder.into(),
        }
    }

    /// Applies the policy to `value`. Total; empty input stays empty for
    /// keep policies.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            MaskPolicy::Reveal => value.to_string(),
            MaskPolicy::Full { placeholder } => placeholder.clone().into_owned(),
            MaskPolicy::KeepFirst(n) => keep(value, *n, 0),
            MaskPolicy::KeepLast(n) => keep(value, 0, *n),
        }
    }
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self::default_full()
    }
}

fn keep(value: &str, visible_prefix: usize, visible_suffix: usize) -> String {
    let total = value.chars().count();
    if visible_prefix + visible_suffix >= total {
        return value.to_string();
    }
    let hidden_end = total - visible_suffix;
    value
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            if i < visible_prefix || i >= hidden_end {
                ch
            } else {
                MASK_CHAR
            }
        })
        .collect()
}

/// One masking policy per sensitivity level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskPolicies {
    pub high: MaskPolicy,
    pub medium: MaskPolicy,
    pub low: MaskPolicy,
}

impl Default for MaskPolicies {
    fn default() -> Self {
        Self {
            high: MaskPolicy::default_full(),
            medium: MaskPolicy::KeepFirst(3),
            low: MaskPolicy::Reveal,
        }
    }
}

impl MaskPolicies {
    /// The built-in table: secrets hidden, infrastructure partially shown.
    pub fn builtin() -> &'static MaskPolicies {
        Lazy::force(&DEFAULT_POLICIES)
    }

    pub const fn for_level(&self, level: Sensitivity) -> &MaskPolicy {
        match level {
            Sensitivity::High => &self.high,
            Sensitivity::Medium => &self.medium,
            Sensitivity::Low => &self.low,
        }
    }

    pub fn mask(&self, level: Sensitivity, value: &str) -> String {
        self.for_level(level).apply_to(value)
    }
}
