use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{CommandMeta, error::CommandError};
use petal_core::{Context, RoleLevel};
use petal_utils::permissions::has_roles;

/// Who may run a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Everyone,
    Owner,
    /// Guild-only, gated on the configured role level.
    Role(RoleLevel),
}

/// Whether the author of `msg` may run `meta`.
pub async fn can_run(
    ctx: &Context,
    msg: &MessageCreate,
    meta: &CommandMeta,
) -> anyhow::Result<bool> {
    match meta.access {
        Access::Everyone => Ok(true),
        Access::Owner => Ok(ctx.config.is_owner(msg.author.id.get())),
        Access::Role(_) if msg.guild_id.is_none() => Ok(false),
        Access::Role(level) => {
            has_roles(
                &ctx.http,
                msg,
                &ctx.config.owner_ids,
                ctx.config.roles_for(level),
            )
            .await
        }
    }
}

/// Fail with a [`CommandError`] when the author may not run `meta`.
pub async fn ensure_can_run(
    ctx: &Context,
    msg: &MessageCreate,
    meta: &CommandMeta,
) -> anyhow::Result<()> {
    if matches!(meta.access, Access::Role(_)) && msg.guild_id.is_none() {
        return Err(CommandError::NoPrivateMessage.into());
    }

    if !can_run(ctx, msg, meta).await? {
        return Err(CommandError::CheckFailure.into());
    }

    Ok(())
}
