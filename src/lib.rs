//! Cotton AI Core
//!
//! Preference resolution and prompt context engine for the Cotton AI note
//! assistant. The hosting plugin wires these pieces into its chat and
//! ask dialogs:
//! - `preferences`: discover `*.pref.md` documents across bundled,
//!   personal, and team tiers, merge them by effective priority under the
//!   caller's context tags, and render one prompt fragment
//! - `context`: extract the current note's content, front-matter, and
//!   backlinks as a second prompt fragment
//! - `prompt`: assemble the fragments into the outbound system prompt
//! - `config`: the host-managed settings object the above read
//!
//! Markdown rendering, UI widgets, chat persistence, and the LLM
//! streaming call itself stay in the host; this crate only produces the
//! strings they consume.

pub mod config;
pub mod context;
pub mod preferences;
pub mod prompt;
pub mod utils;

pub use config::{load_settings, parse_context_tags, AssistantSettings};
pub use context::{format_context_for_prompt, NoteContext, NoteContextBuilder};
pub use preferences::{
    LoadReport, LoadStats, LoadWarning, MalformedPreference, MergedPreferences,
    PreferenceDocument, PreferenceResolver, PreferenceSummary, SourceTier,
};
pub use prompt::build_system_prompt;
pub use utils::error::{AppError, AppResult};
