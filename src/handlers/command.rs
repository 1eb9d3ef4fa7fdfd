use poise::serenity_prelude::{
    self as serenity, ChannelId, ChannelType, GuildChannel, GuildId, Message,
};
use tracing::error;

use crate::constants::{COMMAND_ALIAS, COMMAND_KEYWORD};
use crate::models::{Data, Error};
use crate::utils::channel_utils::resolve_voice_channel;

use super::{game, reply};

/// Handle an incoming message: parse the prefix command, dispatch its
/// sub-verb, and close with the usage message.
pub async fn handle_message(ctx: &serenity::Context, msg: &Message, data: &Data) {
    let Some(args) = parse_command(&msg.content, &data.settings.command_prefix) else {
        return;
    };

    // Only honored in guild text channels; everything else is ignored
    // without a reply
    let Some(guild_id) = msg.guild_id else {
        return;
    };
    let Ok(channel) = msg.channel(ctx).await else {
        return;
    };
    let Some(guild_channel) = channel.guild() else {
        return;
    };
    if guild_channel.kind != ChannelType::Text {
        return;
    }

    match args.first().map(|verb| verb.to_ascii_lowercase()).as_deref() {
        Some("start") => handle_start(ctx, msg, guild_id, data).await,
        Some("stop") => handle_stop(ctx, msg, guild_id, data).await,
        Some("setchannel") => {
            handle_set_channel(ctx, msg, guild_id, args.get(1).copied(), data).await
        }
        _ => {}
    }

    // Every invocation ends with the usage reminder, even after a
    // successful sub-command
    if let Err(e) = reply::send_template(ctx, msg, &data.settings.messages.usage, &[], data).await {
        error!("Failed to send usage message: {}", e);
    }
}

/// Split a message into command arguments.
///
/// Returns `None` unless the content starts with the prefix immediately
/// followed by the command keyword or its alias (case-insensitive).
fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<Vec<&'a str>> {
    let rest = content.strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let keyword = parts.next()?;
    // The keyword must sit flush against the prefix
    if !rest.starts_with(keyword) {
        return None;
    }
    if !keyword.eq_ignore_ascii_case(COMMAND_KEYWORD) && !keyword.eq_ignore_ascii_case(COMMAND_ALIAS)
    {
        return None;
    }
    Some(parts.collect())
}

async fn handle_start(ctx: &serenity::Context, msg: &Message, guild_id: GuildId, data: &Data) {
    let Some(channel) = configured_voice_channel(ctx, guild_id, data).await else {
        send(ctx, msg, data, &data.settings.messages.no_voice_channel, &[]).await;
        return;
    };

    game::start_game(ctx, msg, &channel, data).await;
}

async fn handle_stop(ctx: &serenity::Context, msg: &Message, guild_id: GuildId, data: &Data) {
    if !data.is_game_active(guild_id) {
        send(ctx, msg, data, &data.settings.messages.no_game_active, &[]).await;
        return;
    }

    let Some(channel) = configured_voice_channel(ctx, guild_id, data).await else {
        send(ctx, msg, data, &data.settings.messages.no_voice_channel, &[]).await;
        return;
    };

    game::stop_game(ctx, msg, &channel, data).await;
}

async fn handle_set_channel(
    ctx: &serenity::Context,
    msg: &Message,
    guild_id: GuildId,
    query: Option<&str>,
    data: &Data,
) {
    let Some(query) = query else {
        send(ctx, msg, data, &data.settings.messages.set_channel_usage, &[]).await;
        return;
    };

    let candidates = match voice_channel_candidates(ctx, guild_id).await {
        Ok(candidates) => candidates,
        Err(e) => {
            error!("Failed to list channels of guild {}: {}", guild_id, e);
            return;
        }
    };

    let Some(channel_id) = resolve_voice_channel(&candidates, query) else {
        send(ctx, msg, data, &data.settings.messages.invalid_channel, &[]).await;
        return;
    };

    data.set_voice_channel(guild_id, channel_id);

    let mention = format!("<#{}>", channel_id);
    send(
        ctx,
        msg,
        data,
        &data.settings.messages.set_voice_channel,
        &[("{channel}", mention.as_str())],
    )
    .await;
}

/// The guild's voice channels as (id, name) pairs in the client-visible
/// order: position first, then id.
async fn voice_channel_candidates(
    ctx: &serenity::Context,
    guild_id: GuildId,
) -> Result<Vec<(ChannelId, String)>, Error> {
    let channels = guild_id.channels(&ctx.http).await?;

    let mut voice: Vec<&GuildChannel> = channels
        .values()
        .filter(|channel| channel.kind == ChannelType::Voice)
        .collect();
    voice.sort_by_key(|channel| (channel.position, channel.id));

    Ok(voice
        .into_iter()
        .map(|channel| (channel.id, channel.name.clone()))
        .collect())
}

/// Resolve the guild's configured voice channel to a live channel
async fn configured_voice_channel(
    ctx: &serenity::Context,
    guild_id: GuildId,
    data: &Data,
) -> Option<GuildChannel> {
    let channel_id = data.voice_channel(guild_id)?;
    let channel = channel_id.to_channel(ctx).await.ok()?;
    channel.guild()
}

async fn send(
    ctx: &serenity::Context,
    msg: &Message,
    data: &Data,
    template: &crate::settings::MessageTemplate,
    replacements: &[(&str, &str)],
) {
    if let Err(e) = reply::send_template(ctx, msg, template, replacements, data).await {
        error!("Failed to send reply: {}", e);
    }
}
