//! System Prompt Assembly
//!
//! Composes the outbound system prompt from the base persona, the
//! preference fragment, and the note-context fragment. Empty fragments
//! are omitted rather than leaving blank sections.

/// Opening line of every system prompt.
const BASE_PERSONA: &str = "You are a helpful AI assistant integrated with the user's note vault. \
You help users with their notes and coding tasks.";

/// Closing instruction of every system prompt.
const CLOSING_INSTRUCTION: &str = "Respond concisely and helpfully. Use markdown formatting.";

/// Assemble the system prompt for an outbound request.
///
/// `preferences_fragment` comes from the preference resolver,
/// `context_fragment` from the note context builder; either may be empty.
pub fn build_system_prompt(preferences_fragment: &str, context_fragment: &str) -> String {
    let mut sections = vec![BASE_PERSONA];

    if !preferences_fragment.is_empty() {
        sections.push(preferences_fragment);
    }
    if !context_fragment.is_empty() {
        sections.push(context_fragment);
    }

    sections.push(CLOSING_INSTRUCTION);
    sections.join("\n\n")
}
