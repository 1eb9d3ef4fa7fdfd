use poise::serenity_prelude::{
    self as serenity, EditMember, GuildChannel, GuildId, Message, Reaction, ReactionType,
};
use tracing::{debug, error};

use crate::models::Data;
use crate::utils::emotes::emote_matches;

use super::reply;

/// Post the control message for a new game and attach the toggle reactions.
///
/// A game already running in the guild is stopped first, so starting
/// replaces, never stacks.
pub async fn start_game(
    ctx: &serenity::Context,
    msg: &Message,
    channel: &GuildChannel,
    data: &Data,
) {
    let guild_id = channel.guild_id;

    if data.is_game_active(guild_id) {
        stop_game(ctx, msg, channel, data).await;
    }

    let control = match reply::send_template(
        ctx,
        msg,
        &data.settings.messages.started,
        &[("{channel}", &channel.name)],
        data,
    )
    .await
    {
        Ok(control) => control,
        Err(e) => {
            error!("Failed to post control message: {}", e);
            return;
        }
    };

    data.set_active_game(guild_id, control.id);

    add_control_reaction(ctx, &control, &data.settings.emotes.unmute).await;
    add_control_reaction(ctx, &control, &data.settings.emotes.mute).await;
}

/// End the guild's running game: edit the control message, strip its
/// reactions and clear the registry entry.
pub async fn stop_game(
    ctx: &serenity::Context,
    msg: &Message,
    channel: &GuildChannel,
    data: &Data,
) {
    let guild_id = channel.guild_id;
    let Some(control_id) = data.active_game(guild_id) else {
        return;
    };

    // The control message lives in the channel the game was started from
    match msg.channel_id.message(&ctx.http, control_id).await {
        Ok(mut control) => {
            if let Err(e) = reply::edit_to_template(
                ctx,
                &mut control,
                &data.settings.messages.ended,
                &[("{channel}", &channel.name)],
                data,
            )
            .await
            {
                error!("Failed to edit control message: {}", e);
            }
            if let Err(e) = control.delete_reactions(ctx).await {
                error!("Failed to clear control message reactions: {}", e);
            }
        }
        Err(e) => debug!(
            "Control message {} not found in channel {}: {}",
            control_id, msg.channel_id, e
        ),
    }

    data.clear_active_game(guild_id);
}

/// Handle a reaction-add event: when a user reacts on the active control
/// message with one of the configured emotes, toggle the mute state of
/// everyone in the configured voice channel.
pub async fn handle_reaction_add(ctx: &serenity::Context, reaction: &Reaction, data: &Data) {
    let Some(user_id) = reaction.user_id else {
        return;
    };
    if data.settings.is_bot_user(user_id) {
        return;
    }
    let Some(guild_id) = reaction.guild_id else {
        return;
    };
    let Some(channel_id) = data.voice_channel(guild_id) else {
        return;
    };
    let Ok(channel) = channel_id.to_channel(ctx).await else {
        return;
    };
    let Some(voice_channel) = channel.guild() else {
        return;
    };
    if data.active_game(guild_id) != Some(reaction.message_id) {
        return;
    }

    // The control message keeps exactly the two template reactions
    if let Err(e) = reaction.delete(&ctx.http).await {
        error!("Failed to remove reaction from control message: {}", e);
    }

    if emote_matches(&reaction.emoji, &data.settings.emotes.unmute) {
        set_mute_all(ctx, guild_id, &voice_channel, false).await;
    } else if emote_matches(&reaction.emoji, &data.settings.emotes.mute) {
        set_mute_all(ctx, guild_id, &voice_channel, true).await;
    }
}

async fn add_control_reaction(ctx: &serenity::Context, message: &Message, emote: &str) {
    match ReactionType::try_from(emote) {
        Ok(reaction) => {
            if let Err(e) = message.react(ctx, reaction).await {
                error!("Failed to react with {}: {}", emote, e);
            }
        }
        Err(e) => error!("Configured emote {:?} is not a valid reaction: {}", emote, e),
    }
}

/// Set the server mute flag for every member currently in the voice channel.
/// Individual edit failures are dropped and the remaining members are still
/// processed.
async fn set_mute_all(
    ctx: &serenity::Context,
    guild_id: GuildId,
    channel: &GuildChannel,
    mute: bool,
) {
    let members = match channel.members(ctx) {
        Ok(members) => members,
        Err(e) => {
            error!(
                "Failed to list members of voice channel {}: {}",
                channel.id, e
            );
            return;
        }
    };

    for member in members {
        let _ = guild_id
            .edit_member(&ctx.http, member.user.id, EditMember::new().mute(mute))
            .await;
    }
}
