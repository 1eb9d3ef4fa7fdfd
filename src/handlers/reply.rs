use chrono::Utc;
use poise::serenity_prelude::{
    self as serenity, CreateEmbed, CreateMessage, EditMessage, Message, Timestamp,
};

use crate::models::{Data, Error};
use crate::settings::MessageTemplate;
use crate::utils::templates::{Rendered, RenderedEmbed, render_template};

/// Render a template and send it in response to `msg`.
///
/// Plain strings go out as a reply to the invoking message; embeds are sent
/// to the channel directly.
pub async fn send_template(
    ctx: &serenity::Context,
    msg: &Message,
    template: &MessageTemplate,
    replacements: &[(&str, &str)],
    data: &Data,
) -> Result<Message, Error> {
    let sent = match render(template, replacements, data) {
        Rendered::Text(text) => msg.reply(ctx, text).await?,
        Rendered::Embed(embed) => {
            msg.channel_id
                .send_message(&ctx.http, CreateMessage::new().embed(build_embed(&embed)))
                .await?
        }
    };
    Ok(sent)
}

/// Render a template and edit an existing message to it
pub async fn edit_to_template(
    ctx: &serenity::Context,
    message: &mut Message,
    template: &MessageTemplate,
    replacements: &[(&str, &str)],
    data: &Data,
) -> Result<(), Error> {
    let builder = match render(template, replacements, data) {
        Rendered::Text(text) => EditMessage::new().content(text),
        Rendered::Embed(embed) => EditMessage::new().embed(build_embed(&embed)),
    };
    message.edit(ctx, builder).await?;
    Ok(())
}

fn render(template: &MessageTemplate, replacements: &[(&str, &str)], data: &Data) -> Rendered {
    render_template(
        template,
        replacements,
        &data.settings.command_prefix,
        &Utc::now().to_rfc3339(),
    )
}

fn build_embed(embed: &RenderedEmbed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    for (name, value, inline) in &embed.fields {
        builder = builder.field(name, value, *inline);
    }
    if let Some(timestamp) = &embed.timestamp
        && let Ok(parsed) = Timestamp::parse(timestamp)
    {
        builder = builder.timestamp(parsed);
    }
    builder
}
