use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId};

use crate::settings::Settings;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Bot state shared across all handlers
pub struct Data {
    /// Settings document, immutable after load
    pub settings: Settings,
    /// Maps guild IDs to their configured voice channel
    pub channels: DashMap<GuildId, ChannelId>,
    /// Maps guild IDs to the control message of the currently running game
    pub active_games: DashMap<GuildId, MessageId>,
    /// Where the channel registry is persisted
    pub storage_path: PathBuf,
    storage_dirty: AtomicBool,
}

impl Data {
    pub fn new(settings: Settings, storage_path: PathBuf) -> Self {
        Self {
            settings,
            channels: DashMap::new(),
            active_games: DashMap::new(),
            storage_path,
            storage_dirty: AtomicBool::new(false),
        }
    }

    /// Store the voice channel binding for a guild, replacing any previous
    /// one, and mark the registry for the next save
    pub fn set_voice_channel(&self, guild_id: GuildId, channel_id: ChannelId) {
        self.channels.insert(guild_id, channel_id);
        self.storage_dirty.store(true, Ordering::Relaxed);
    }

    /// The configured voice channel for a guild, if any
    pub fn voice_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.channels.get(&guild_id).map(|entry| *entry.value())
    }

    /// Whether a game is currently running in the guild
    pub fn is_game_active(&self, guild_id: GuildId) -> bool {
        self.active_games.contains_key(&guild_id)
    }

    /// The control message of the guild's running game, if any
    pub fn active_game(&self, guild_id: GuildId) -> Option<MessageId> {
        self.active_games.get(&guild_id).map(|entry| *entry.value())
    }

    /// Record the control message for a guild, replacing any previous game
    pub fn set_active_game(&self, guild_id: GuildId, message_id: MessageId) {
        self.active_games.insert(guild_id, message_id);
    }

    pub fn clear_active_game(&self, guild_id: GuildId) {
        self.active_games.remove(&guild_id);
    }

    /// Whether the channel registry has changed since the last save
    pub fn storage_dirty(&self) -> bool {
        self.storage_dirty.load(Ordering::Relaxed)
    }

    pub fn clear_storage_dirty(&self) {
        self.storage_dirty.store(false, Ordering::Relaxed);
    }
}
