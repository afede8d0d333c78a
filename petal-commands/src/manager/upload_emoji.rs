use std::io::Cursor;

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, imageops::FilterType};
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{CommandMeta, MANAGER, checks::Access, error::CommandError, reply_content};
use petal_core::{Context, RoleLevel};

pub const META: CommandMeta = CommandMeta {
    name: "upload_emoji",
    desc: "Upload an emoji to the server from an attached file.",
    category: MANAGER.name,
    usage: "upload_emoji <file>",
    aliases: &[],
    access: Access::Role(RoleLevel::Manager),
};

const EMOJI_SIZE: u32 = 128;
const MAX_NAME_LEN: usize = 32;
const MIN_NAME_LEN: usize = 2;

const UNSUPPORTED_FORMAT: &str =
    "Unsupported file format. Please attach an image file in JPEG, PNG, or GIF format.";

/// Upload the first attachment of the message as a guild emoji.
pub async fn run(ctx: &Context, msg: &MessageCreate) -> anyhow::Result<()> {
    let guild_id = msg.guild_id.ok_or(CommandError::NoPrivateMessage)?;
    let attachment = msg
        .attachments
        .first()
        .ok_or(CommandError::MissingArgument("file"))?;

    let mime = attachment
        .content_type
        .as_deref()
        .and_then(image_mime)
        .ok_or_else(|| CommandError::BadArgument(UNSUPPORTED_FORMAT.to_owned()))?;
    let name = emoji_name(&attachment.filename);

    let bytes = reqwest::get(&attachment.url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .context("failed to download emoji attachment")?
        .bytes()
        .await
        .context("failed to read emoji attachment")?;
    let bytes = prepare_image(&bytes, mime)?;
    let image = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));

    let emoji = match ctx.http.create_emoji(guild_id, &name, &image).await {
        Ok(response) => response.model().await?,
        Err(source) => return Err(CommandError::BadArgument(source.to_string()).into()),
    };

    let mention = if emoji.animated {
        format!("<a:{}:{}>", emoji.name, emoji.id)
    } else {
        format!("<:{}:{}>", emoji.name, emoji.id)
    };
    reply_content(ctx, msg, &format!("**{}** uploaded {mention}", msg.author.name)).await
}

/// Normalize an attachment content type to an accepted image type.
fn image_mime(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.to_ascii_lowercase().as_str() {
        "image/gif" => Some("image/gif"),
        "image/png" => Some("image/png"),
        "image/jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Scale still images to the emoji size. GIFs are uploaded untouched.
fn prepare_image(bytes: &[u8], mime: &str) -> anyhow::Result<Vec<u8>> {
    let format = match mime {
        "image/png" => ImageFormat::Png,
        "image/jpeg" => ImageFormat::Jpeg,
        _ => return Ok(bytes.to_vec()),
    };

    let image = image::load_from_memory_with_format(bytes, format).map_err(|source| {
        CommandError::BadArgument(format!("Could not read the image: {source}"))
    })?;

    let mut resized = Vec::new();
    image
        .resize_exact(EMOJI_SIZE, EMOJI_SIZE, FilterType::Triangle)
        .write_to(&mut Cursor::new(&mut resized), format)
        .context("failed to encode resized emoji")?;

    Ok(resized)
}

/// Emoji name derived from a file name: the stem before the first dot,
/// at most 32 characters, padded with `_` to the minimum length.
fn emoji_name(filename: &str) -> String {
    let stem = filename.split('.').next().unwrap_or_default();
    let mut name: String = stem.chars().take(MAX_NAME_LEN).collect();
    while name.chars().count() < MIN_NAME_LEN {
        name.push('_');
    }
    name
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, RgbImage, RgbaImage};

    use super::*;

    fn encode(image: impl Into<image::DynamicImage>, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .into()
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn still_images_are_scaled_to_emoji_size() {
        let png = encode(RgbaImage::new(300, 200), ImageFormat::Png);
        let resized = prepare_image(&png, "image/png").unwrap();
        let decoded = image::load_from_memory_with_format(&resized, ImageFormat::Png).unwrap();
        assert_eq!(decoded.dimensions(), (EMOJI_SIZE, EMOJI_SIZE));

        let jpeg = encode(RgbImage::new(64, 512), ImageFormat::Jpeg);
        let resized = prepare_image(&jpeg, "image/jpeg").unwrap();
        let decoded = image::load_from_memory_with_format(&resized, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (EMOJI_SIZE, EMOJI_SIZE));
    }

    #[test]
    fn gifs_pass_through() {
        let gif = b"GIF89a not decoded".to_vec();
        assert_eq!(prepare_image(&gif, "image/gif").unwrap(), gif);
    }

    #[test]
    fn unreadable_images_are_bad_arguments() {
        let error = prepare_image(b"not a png", "image/png").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CommandError>(),
            Some(CommandError::BadArgument(_))
        ));
    }

    #[test]
    fn names_come_from_the_file_stem() {
        assert_eq!(emoji_name("party.parrot.gif"), "party");
        assert_eq!(emoji_name("x.png"), "x_");
        assert_eq!(emoji_name(&format!("{}.png", "a".repeat(40))), "a".repeat(32));
    }

    #[test]
    fn only_still_and_animated_images_are_accepted() {
        assert_eq!(image_mime("image/png"), Some("image/png"));
        assert_eq!(image_mime("IMAGE/GIF"), Some("image/gif"));
        assert_eq!(image_mime("image/jpeg; charset=binary"), Some("image/jpeg"));
        assert_eq!(image_mime("image/webp"), None);
        assert_eq!(image_mime("video/mp4"), None);
    }
}
