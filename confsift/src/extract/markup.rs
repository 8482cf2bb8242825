//! Line scanner for `<add key=".." value=".." />` configuration markup.
//!
//! Only one element shape is understood: an `add` tag whose first attribute
//! is `key` and second is `value`, on a single line, single or double
//! quoted. Each attribute ends at the quote it was opened with, so a double
//! quoted value may hold `'` and a single quoted one may hold `"`. Tag and
//! attribute names match case-insensitively. Anything else (comments, section
//! tags, attributes in another order) is skipped without an error.
//!
//! Keys and values are entity-decoded on extraction: `value="a&amp;b"`
//! yields the record value `a&b`, not the raw attribute text. Reconstruction
//! escapes them again.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use slog::{debug, Logger};

use crate::record::ConfigRecord;
use crate::sensitivity::SensitivityRules;

static ADD_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)<add\s+key\s*=\s*(?:"([^"]+)"|'([^']+)')"#,
        r#"\s+value\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    ))
    .expect("add element pattern is valid")
});

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

pub(super) fn extract(text: &str, rules: &SensitivityRules, logger: &Logger) -> Vec<ConfigRecord> {
    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for line in text.split('\n').map(str::trim).filter(|line| !line.is_empty()) {
        match ADD_ELEMENT.captures(line) {
            Some(caps) => {
                let attribute = |double: usize, single: usize| {
                    caps.get(double)
                        .or_else(|| caps.get(single))
                        .map_or("", |found| found.as_str())
                };
                let key = decode_entities(attribute(1, 2)).into_owned();
                let value = decode_entities(attribute(3, 4)).into_owned();
                records.push(ConfigRecord::classified(key.clone(), key, value, rules));
            }
            None => skipped += 1,
        }
    }

    debug!(logger, "extracted markup records";
        "records" => records.len(),
        "skipped_lines" => skipped);
    records
}

/// Replaces the five predefined XML entities; any other `&` is kept.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        decoded.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| tail.starts_with(entity)) {
            Some((entity, ch)) => {
                decoded.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &tail[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// Writes `&`, `<`, `>`, `"` and `'` as XML entities.
pub(crate) fn escape_entities(text: &str) -> Cow<'_, str> {
    if !text.contains(|ch: char| matches!(ch, '&' | '<' | '>' | '"' | '\'')) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ENTITIES.iter().find(|(_, plain)| *plain == ch) {
            Some((entity, _)) => escaped.push_str(entity),
            None => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
