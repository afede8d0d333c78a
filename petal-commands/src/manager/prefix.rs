use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{
    CommandMeta, Invocation, MANAGER, checks::Access, error::CommandError, reply_content,
    reply_embed,
};
use petal_core::{Context, RoleLevel, config::{MAX_PREFIX_LEN, valid_prefix}};
use petal_utils::{
    embed::{failure_embed, success_embed},
    menus::{ConfirmPrompt, Confirmation, MenuPayload},
};

pub const META: CommandMeta = CommandMeta {
    name: "prefix",
    desc: "Change the bot's command prefix for this server.",
    category: MANAGER.name,
    usage: "prefix [prefix]",
    aliases: &[],
    access: Access::Role(RoleLevel::Manager),
};

/// Show the guild prefix, or change it after confirmation.
pub async fn run(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
) -> anyhow::Result<()> {
    let guild_id = msg.guild_id.ok_or(CommandError::NoPrivateMessage)?.get();
    let requested = invocation.args.trim();

    if requested.is_empty() {
        let current = ctx
            .db
            .guild_prefix(guild_id)
            .await?
            .unwrap_or_else(|| ctx.config.default_prefix.clone());
        let shown = format!("My current prefix is `{current}` in this server.");
        return reply_content(ctx, msg, &shown).await;
    }

    if !valid_prefix(requested) {
        return Err(CommandError::BadArgument(format!(
            "A prefix must be 1 to {MAX_PREFIX_LEN} characters without spaces."
        ))
        .into());
    }

    let prompt = ConfirmPrompt::new(MenuPayload::content(format!(
        "Change the prefix to `{requested}` for this server?"
    )));
    let dialog = Confirmation::new(prompt, ctx.menus.clone(), ctx.confirmation_config());

    match dialog.ask(invocation.menu_origin(msg)).await? {
        Some(true) => {
            ctx.db.set_guild_prefix(guild_id, Some(requested)).await?;
            let done = format!("Changed prefix to `{requested}` for this server.");
            reply_embed(ctx, msg, success_embed(done)?).await
        }
        Some(false) => reply_embed(ctx, msg, failure_embed("Prefix change cancelled.")?).await,
        None => reply_embed(ctx, msg, failure_embed("Timed out waiting for confirmation.")?).await,
    }
}
