//! Pure voice-channel resolution (Discord-agnostic)

use poise::serenity_prelude::ChannelId;

/// Resolve a user-supplied argument against the guild's voice channels.
///
/// Candidates must already be in a deterministic order (the caller sorts by
/// channel position, then id). Matching tiers, in order of preference:
/// exact case-insensitive name, case-insensitive substring of the name,
/// exact id. The first match within the winning tier is returned.
pub fn resolve_voice_channel(candidates: &[(ChannelId, String)], query: &str) -> Option<ChannelId> {
    let lowered = query.to_lowercase();

    candidates
        .iter()
        .find(|(_, name)| name.to_lowercase() == lowered)
        .or_else(|| {
            candidates
                .iter()
                .find(|(_, name)| name.to_lowercase().contains(&lowered))
        })
        .or_else(|| candidates.iter().find(|(id, _)| id.to_string() == query))
        .map(|(id, _)| *id)
}
