//! Flatten, classify, edit and rebuild configuration files.
//!
//! The crate reads two file shapes:
//! - **JSON**: nested objects are flattened into dotted paths
//!   (`database.connection.password`).
//! - **Markup**: `<add key=".." value=".." />` lines, as found in
//!   `appSettings` sections.
//!
//! Both become the same flat, ordered sequence of [`ConfigRecord`]s. Each
//! record carries a [`Sensitivity`] derived from its leaf key name when it is
//! extracted. Records can then be edited and written back out in the format
//! they came from.
//!
//! ```rust
//! use confsift::{extract_markup, reconstruct, ConfigFormat, RecordField, Sensitivity};
//!
//! let mut records = extract_markup("<add key=\"Host\" value=\"db1\" />\n<!-- note -->");
//! assert_eq!(records[0].sensitivity(), Sensitivity::Medium);
//!
//! confsift::update(&mut records, 0, RecordField::Value, "db2").unwrap();
//! let text = reconstruct(&records, ConfigFormat::Markup).unwrap();
//! assert_eq!(text, "<add key=\"Host\" value=\"db2\" />");
//! ```
//!
//! What this crate does not do:
//! - read or write files, or talk to any service
//! - validate a file beyond parsing it
//! - recurse into JSON arrays; they are kept as opaque text values
//!
//! Values are masked by sensitivity in `Debug` output and in `slog` records
//! (see [`MaskPolicies`]). Enable the `testing` feature to see them in clear.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod document;
mod error;
mod extract;
pub mod logging;
mod policy;
mod reconstruct;
mod record;
mod sensitivity;
mod session;
mod store;

pub use document::{
    export, file_extension, ConfigDocument, ConfigFormat, ExportArtifact, ACCEPTED_EXTENSIONS,
};
pub use error::{
    DocumentError, Error, IndexError, ParseError, ReconstructError, Result, StoreError,
};
pub use extract::{extract_json, extract_markup, flatten, Extractor};
pub use policy::{MaskPolicies, MaskPolicy, REDACTED_PLACEHOLDER};
pub use reconstruct::{rebuild_object, reconstruct, reconstruct_json, reconstruct_markup};
pub use record::{update, ConfigRecord, RecordField};
pub use sensitivity::{
    classify, Sensitivity, SensitivityCounts, SensitivityRules, HIGH_PATTERNS, MEDIUM_PATTERNS,
};
pub use session::{ExtractionSession, RecordEdit};
pub use store::{config_id, Environment, SavedSnapshot, SnapshotStore};
