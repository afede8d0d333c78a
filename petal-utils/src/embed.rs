use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0xFE_9A_C9;
/// Color of successful command responses.
pub const SUCCESS_COLOR: u32 = 0x2E_CC_71;
/// Color of failed command responses.
pub const FAILURE_COLOR: u32 = 0xE7_4C_3C;

const SUCCESS_MARK: &str = "\u{2705}";
const FAILURE_MARK: &str = "\u{274C}";

/// Build a `✅` response embed.
pub fn success_embed(description: impl AsRef<str>) -> anyhow::Result<Embed> {
    response_embed(SUCCESS_MARK, SUCCESS_COLOR, description.as_ref())
}

/// Build a `❌` response embed.
pub fn failure_embed(description: impl AsRef<str>) -> anyhow::Result<Embed> {
    response_embed(FAILURE_MARK, FAILURE_COLOR, description.as_ref())
}

fn response_embed(mark: &str, color: u32, description: &str) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .color(color)
        .description(format!("{mark} {description}"))
        .validate()?
        .build();

    Ok(embed)
}

/// Build a titled embed with inline-less fields and an optional footer.
pub fn build_fields_embed(
    title: &str,
    description: Option<&str>,
    fields: &[(String, String)],
    footer: Option<&str>,
) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new().title(title).color(DEFAULT_EMBED_COLOR);

    if let Some(description) = description.filter(|d| !d.is_empty()) {
        builder = builder.description(description);
    }

    for (name, value) in fields {
        builder = builder.field(EmbedFieldBuilder::new(name, value).build());
    }

    if let Some(footer) = footer.filter(|f| !f.is_empty()) {
        builder = builder.footer(EmbedFooterBuilder::new(footer).build());
    }

    Ok(builder.validate()?.build())
}
