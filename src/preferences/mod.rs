//! Preference System
//!
//! Discovers coding/style preference documents (`*.pref.md`) from up to
//! three source tiers, merges them by effective priority under the
//! caller's context tags, and renders one prompt fragment.
//!
//! Architecture:
//! - model.rs:     Core data types (PreferenceDocument, SourceTier, etc.)
//! - parser.rs:    Metadata-block parser + serializer for `*.pref.md`
//! - discovery.rs: Filesystem scanning across the source tiers
//! - merge.rs:     Tag filter + effective-priority ordering
//! - format.rs:    Render the merged list into a prompt fragment
//! - resolver.rs:  Caller-owned handle holding the loaded state

pub mod discovery;
pub mod format;
pub mod merge;
pub mod model;
pub mod parser;
pub mod resolver;

pub use model::*;
pub use parser::MalformedPreference;
pub use resolver::PreferenceResolver;
