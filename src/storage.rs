use std::collections::HashMap;

use poise::serenity_prelude::{ChannelId, GuildId};
use tracing::{error, info};

use crate::models::{Data, Error};

/// Load the persisted guild-to-voice-channel bindings into the registry.
///
/// A missing or malformed file is logged and leaves the registry empty; the
/// bot still runs with zero configured channels.
pub async fn load(data: &Data) {
    info!("Reading {} ...", data.storage_path.display());

    let raw = match tokio::fs::read_to_string(&data.storage_path).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("Could not load storage file: {}", e);
            return;
        }
    };

    let bindings: HashMap<String, String> = match serde_json::from_str(&raw) {
        Ok(bindings) => bindings,
        Err(e) => {
            error!("Could not parse storage file: {}", e);
            return;
        }
    };

    for (guild, channel) in bindings {
        match (guild.parse::<u64>(), channel.parse::<u64>()) {
            (Ok(guild_id), Ok(channel_id)) if guild_id != 0 && channel_id != 0 => {
                data.channels
                    .insert(GuildId::new(guild_id), ChannelId::new(channel_id));
            }
            _ => error!("Skipping malformed storage entry {} -> {}", guild, channel),
        }
    }

    info!(
        "Successfully loaded storage file with {} guilds",
        data.channels.len()
    );
}

/// Serialize the full channel registry to disk, overwriting the previous file
pub async fn save(data: &Data) -> Result<(), Error> {
    let bindings: HashMap<String, String> = data
        .channels
        .iter()
        .map(|entry| {
            (
                entry.key().get().to_string(),
                entry.value().get().to_string(),
            )
        })
        .collect();

    let json = serde_json::to_string(&bindings)?;
    tokio::fs::write(&data.storage_path, json).await?;
    data.clear_storage_dirty();

    info!(
        "Successfully saved storage file with {} guilds",
        bindings.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_settings;
    use std::path::PathBuf;

    fn temp_storage_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crewmute-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let path = temp_storage_path("round-trip");
        let data = Data::new(test_settings(), path.clone());
        data.set_voice_channel(GuildId::new(1), ChannelId::new(10));
        data.set_voice_channel(GuildId::new(2), ChannelId::new(20));
        data.set_voice_channel(GuildId::new(3), ChannelId::new(30));

        save(&data).await.expect("save must succeed");
        assert!(!data.storage_dirty());

        let reloaded = Data::new(test_settings(), path.clone());
        load(&reloaded).await;

        assert_eq!(reloaded.channels.len(), 3);
        for guild in [1u64, 2, 3] {
            assert_eq!(
                reloaded.voice_channel(GuildId::new(guild)),
                data.voice_channel(GuildId::new(guild))
            );
        }

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file_leaves_registry_empty() {
        let data = Data::new(test_settings(), temp_storage_path("missing"));
        load(&data).await;
        assert!(data.channels.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_file_leaves_registry_empty() {
        let path = temp_storage_path("malformed");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let data = Data::new(test_settings(), path.clone());
        load(&data).await;
        assert!(data.channels.is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_skips_malformed_entries() {
        let path = temp_storage_path("partial");
        tokio::fs::write(&path, r#"{"1": "10", "oops": "20", "3": "zero"}"#)
            .await
            .unwrap();

        let data = Data::new(test_settings(), path.clone());
        load(&data).await;

        assert_eq!(data.channels.len(), 1);
        assert_eq!(
            data.voice_channel(GuildId::new(1)),
            Some(ChannelId::new(10))
        );

        let _ = tokio::fs::remove_file(&path).await;
    }
}
