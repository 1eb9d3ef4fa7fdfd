//! Matching incoming reactions against the configured emote strings

use poise::serenity_prelude::ReactionType;

/// The comparable name of a reaction: the unicode string itself, or the
/// name of a custom guild emoji.
pub fn emote_name(emoji: &ReactionType) -> Option<&str> {
    match emoji {
        ReactionType::Unicode(name) => Some(name),
        ReactionType::Custom { name, .. } => name.as_deref(),
        _ => None,
    }
}

/// Whether a reaction matches a configured emote string
pub fn emote_matches(emoji: &ReactionType, configured: &str) -> bool {
    emote_name(emoji) == Some(configured)
}
