//! Token substitution for message templates (Discord-agnostic)

use crate::settings::{EmbedTemplate, MessageTemplate};

/// A template after substitution, ready to be turned into an API payload
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Text(String),
    Embed(RenderedEmbed),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
    /// (name, value, inline) triples
    pub fields: Vec<(String, String, bool)>,
    pub timestamp: Option<String>,
}

/// Replace every occurrence of each `{token}` with its value.
/// Tokens without a replacement are left untouched.
pub fn substitute(text: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (token, value) in replacements {
        out = out.replace(token, value);
    }
    out
}

/// Apply the caller's replacements plus the always-available `{prefix}` and
/// `{time}` tokens to every text part of a template.
pub fn render_template(
    template: &MessageTemplate,
    replacements: &[(&str, &str)],
    prefix: &str,
    now: &str,
) -> Rendered {
    let mut all: Vec<(&str, &str)> = replacements.to_vec();
    all.push(("{prefix}", prefix));
    all.push(("{time}", now));

    match template {
        MessageTemplate::Text(text) => Rendered::Text(substitute(text, &all)),
        MessageTemplate::Embed { embed } => Rendered::Embed(render_embed(embed, &all)),
    }
}

fn render_embed(embed: &EmbedTemplate, replacements: &[(&str, &str)]) -> RenderedEmbed {
    RenderedEmbed {
        title: embed.title.as_deref().map(|t| substitute(t, replacements)),
        description: embed
            .description
            .as_deref()
            .map(|d| substitute(d, replacements)),
        fields: embed
            .fields
            .iter()
            .map(|f| {
                (
                    substitute(&f.name, replacements),
                    substitute(&f.value, replacements),
                    f.inline,
                )
            })
            .collect(),
        timestamp: embed
            .timestamp
            .as_deref()
            .map(|t| substitute(t, replacements)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{EmbedFieldTemplate, EmbedTemplate, MessageTemplate};

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        assert_eq!(
            substitute("{channel} and {channel}", &[("{channel}", "#lobby")]),
            "#lobby and #lobby"
        );
    }

    #[test]
    fn test_substitute_channel_and_prefix() {
        let out = substitute(
            "Muting in {channel} (prefix {prefix})",
            &[("{channel}", "#lobby"), ("{prefix}", "!")],
        );
        assert_eq!(out, "Muting in #lobby (prefix !)");
    }

    #[test]
    fn test_substitute_leaves_unmatched_tokens() {
        assert_eq!(
            substitute("Keep {unknown} as is", &[("{channel}", "#lobby")]),
            "Keep {unknown} as is"
        );
    }

    #[test]
    fn test_render_text_template_adds_prefix_and_time() {
        let template = MessageTemplate::Text("Use {prefix}au, started {time}".to_string());
        let rendered = render_template(&template, &[], "!", "2024-01-01T00:00:00Z");
        assert_eq!(
            rendered,
            Rendered::Text("Use !au, started 2024-01-01T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_render_embed_template() {
        let template = MessageTemplate::Embed {
            embed: EmbedTemplate {
                title: Some("Game on in {channel}".to_string()),
                description: Some("Commands start with {prefix}".to_string()),
                fields: vec![EmbedFieldTemplate {
                    name: "Channel".to_string(),
                    value: "{channel}".to_string(),
                    inline: true,
                }],
                timestamp: Some("{time}".to_string()),
            },
        };

        let rendered = render_template(
            &template,
            &[("{channel}", "Lobby")],
            "!",
            "2024-01-01T00:00:00Z",
        );

        match rendered {
            Rendered::Embed(embed) => {
                assert_eq!(embed.title.as_deref(), Some("Game on in Lobby"));
                assert_eq!(embed.description.as_deref(), Some("Commands start with !"));
                assert_eq!(
                    embed.fields,
                    vec![("Channel".to_string(), "Lobby".to_string(), true)]
                );
                assert_eq!(embed.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
            }
            Rendered::Text(_) => panic!("expected an embed"),
        }
    }

    #[test]
    fn test_render_embed_without_optionals() {
        let template = MessageTemplate::Embed {
            embed: EmbedTemplate {
                title: None,
                description: None,
                fields: vec![],
                timestamp: None,
            },
        };
        let rendered = render_template(&template, &[], "!", "now");
        assert_eq!(rendered, Rendered::Embed(RenderedEmbed::default()));
    }
}
