use std::path::Path;

use poise::serenity_prelude::UserId;
use serde::Deserialize;
use tracing::info;

use crate::models::Error;

/// Settings document loaded once at startup, immutable afterwards.
///
/// Holds the Discord credentials, the command prefix, the two toggle emotes
/// and every message template the bot ever sends.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub discord: DiscordSettings,
    #[serde(rename = "commandPrefix")]
    pub command_prefix: String,
    pub emotes: Emotes,
    pub messages: Messages,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordSettings {
    /// The bot's own user id, used to filter out its own reactions
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "TOKEN")]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Emotes {
    pub unmute: String,
    pub mute: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub usage: MessageTemplate,
    pub set_channel_usage: MessageTemplate,
    pub invalid_channel: MessageTemplate,
    pub no_voice_channel: MessageTemplate,
    pub set_voice_channel: MessageTemplate,
    pub no_game_active: MessageTemplate,
    pub started: MessageTemplate,
    pub ended: MessageTemplate,
}

/// A message template is either a plain string or a structured embed.
/// Every text part supports `{token}` substitution before sending.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageTemplate {
    Text(String),
    Embed { embed: EmbedTemplate },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedTemplate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<EmbedFieldTemplate>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedFieldTemplate {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl Settings {
    /// Load the settings document from disk
    pub async fn load(path: &Path) -> Result<Self, Error> {
        info!("Reading {} ...", path.display());
        let raw = tokio::fs::read_to_string(path).await?;
        let settings: Settings = serde_json::from_str(&raw)?;
        info!("Successfully loaded settings file");
        Ok(settings)
    }

    /// Whether the given user is the bot itself
    pub fn is_bot_user(&self, user_id: UserId) -> bool {
        self.discord
            .id
            .parse::<u64>()
            .map(|id| id == user_id.get())
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    serde_json::from_value(serde_json::json!({
        "discord": { "ID": "111111111111111111", "TOKEN": "not-a-real-token" },
        "commandPrefix": "!",
        "emotes": { "unmute": "🔊", "mute": "🔇" },
        "messages": {
            "usage": "Usage: {prefix}au start|stop|setchannel",
            "setChannelUsage": "Usage: {prefix}au setchannel <name or id>",
            "invalidChannel": "That is not a voice channel in this server",
            "noVoiceChannel": "No voice channel configured. Use {prefix}au setchannel first",
            "setVoiceChannel": "Voice channel set to {channel}",
            "noGameActive": "No game is currently active",
            "started": "Game started in {channel}. React to mute or unmute",
            "ended": "Game in {channel} has ended"
        }
    }))
    .expect("test settings must parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_string_templates() {
        let settings = test_settings();
        assert_eq!(settings.command_prefix, "!");
        assert_eq!(settings.emotes.mute, "🔇");
        assert_eq!(settings.discord.id, "111111111111111111");

        match &settings.messages.usage {
            MessageTemplate::Text(text) => assert!(text.contains("{prefix}")),
            MessageTemplate::Embed { .. } => panic!("expected a plain string template"),
        }
    }

    #[test]
    fn test_parse_embed_template() {
        let template: MessageTemplate = serde_json::from_value(serde_json::json!({
            "embed": {
                "title": "Game on in {channel}",
                "description": "React below",
                "fields": [
                    { "name": "Prefix", "value": "{prefix}", "inline": true }
                ],
                "timestamp": "{time}"
            }
        }))
        .unwrap();

        match template {
            MessageTemplate::Embed { embed } => {
                assert_eq!(embed.title.as_deref(), Some("Game on in {channel}"));
                assert_eq!(embed.fields.len(), 1);
                assert!(embed.fields[0].inline);
                assert_eq!(embed.timestamp.as_deref(), Some("{time}"));
            }
            MessageTemplate::Text(_) => panic!("expected an embed template"),
        }
    }

    #[test]
    fn test_parse_embed_template_without_optionals() {
        let template: MessageTemplate = serde_json::from_value(serde_json::json!({
            "embed": { "description": "Nothing else" }
        }))
        .unwrap();

        match template {
            MessageTemplate::Embed { embed } => {
                assert!(embed.title.is_none());
                assert!(embed.fields.is_empty());
                assert!(embed.timestamp.is_none());
            }
            MessageTemplate::Text(_) => panic!("expected an embed template"),
        }
    }

    #[test]
    fn test_is_bot_user() {
        let settings = test_settings();
        assert!(settings.is_bot_user(UserId::new(111111111111111111)));
        assert!(!settings.is_bot_user(UserId::new(222222222222222222)));
    }
}
