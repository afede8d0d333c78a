pub mod checks;
pub mod error;
pub mod manager;
pub mod owner;
pub mod utility;

use tracing::{debug, error};
use twilight_model::{
    channel::message::embed::Embed,
    gateway::payload::incoming::{InteractionCreate, MessageCreate, MessageUpdate},
};

use checks::Access;
use error::CommandError;
use petal_core::Context;
use petal_utils::{
    embed::failure_embed,
    menus::{InteractionRouter, MenuOrigin},
    parse::{split_invocation, strip_mention_prefix},
};

/// A group of commands shown together in help.
pub struct Category {
    pub name: &'static str,
    pub desc: &'static str,
}

pub const BASIC: Category = Category {
    name: "Basic",
    desc: "For basic bot operations.",
};

pub const MANAGER: Category = Category {
    name: "Manager",
    desc: "For managers to manage the server.",
};

pub const OWNER: Category = Category {
    name: "Owner",
    desc: "For bot owners to manage the bot.",
};

pub const CATEGORIES: &[Category] = &[BASIC, MANAGER, OWNER];

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    /// Signature without the prefix, e.g. `help [command]`.
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub access: Access,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    manager::prefix::META,
    manager::upload_emoji::META,
    owner::prefixes::META,
    // Add new commands here
];

/// Look up a command by name or alias. Names are already lowercase.
pub fn find_command(name: &str) -> Option<&'static CommandMeta> {
    COMMANDS
        .iter()
        .find(|meta| meta.name == name || meta.aliases.iter().any(|alias| *alias == name))
}

/// A resolved command call.
pub struct Invocation<'a> {
    /// Prefix to show in help texts; the guild prefix even when invoked by mention.
    pub prefix: &'a str,
    pub meta: &'static CommandMeta,
    pub args: &'a str,
}

impl Invocation<'_> {
    /// Where a menu opened by this invocation is sent.
    pub fn menu_origin(&self, msg: &MessageCreate) -> MenuOrigin {
        MenuOrigin {
            channel_id: msg.channel_id.get(),
            author_id: msg.author.id.get(),
            reply_to: Some(msg.id.get()),
        }
    }
}

/// Split `content` into a command name and arguments when it starts with
/// `prefix` or a mention of the bot.
pub fn parse_invocation<'a>(
    content: &'a str,
    prefix: &str,
    bot_id: u64,
) -> Option<(String, &'a str)> {
    let rest = content
        .strip_prefix(prefix)
        .or_else(|| strip_mention_prefix(content, bot_id))?;

    split_invocation(rest)
}

async fn resolve_prefix(ctx: &Context, msg: &MessageCreate) -> anyhow::Result<String> {
    let Some(guild_id) = msg.guild_id else {
        return Ok(ctx.config.default_prefix.clone());
    };

    let stored = ctx.db.ensure_guild_prefix(guild_id.get()).await?;
    Ok(stored.unwrap_or_else(|| ctx.config.default_prefix.clone()))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let prefix = resolve_prefix(&ctx, &msg).await?;
    let Some((name, args)) = parse_invocation(msg.content.trim(), &prefix, ctx.bot_id.get())
    else {
        return Ok(());
    };

    let Some(meta) = find_command(&name) else {
        return Ok(());
    };

    let invocation = Invocation {
        prefix: &prefix,
        meta,
        args,
    };

    debug!(command = meta.name, author_id = msg.author.id.get(), "running command");
    if let Err(source) = run_command(&ctx, &msg, &invocation).await {
        report_error(&ctx, &msg, &invocation, source).await?;
    }

    Ok(())
}

/// Re-run commands for an edited message whose content changed.
///
/// `previous` is the content before the edit, when it was still cached.
/// Edits to messages the bot never saw are ignored.
pub async fn handle_message_update(
    ctx: Context,
    previous: Option<String>,
    update: Box<MessageUpdate>,
) -> anyhow::Result<()> {
    if !content_changed(previous.as_deref(), &update.0.content) {
        return Ok(());
    }

    handle_message(ctx, Box::new(MessageCreate(update.0))).await
}

fn content_changed(previous: Option<&str>, current: &str) -> bool {
    previous.is_some_and(|previous| previous != current)
}

async fn run_command(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
) -> anyhow::Result<()> {
    checks::ensure_can_run(ctx, msg, invocation.meta).await?;

    match invocation.meta.name {
        "ping" => utility::ping::run(ctx, msg).await,
        "help" => utility::help::run(ctx, msg, invocation).await,
        "prefix" => manager::prefix::run(ctx, msg, invocation).await,
        "upload_emoji" => manager::upload_emoji::run(ctx, msg).await,
        "prefixes" => owner::prefixes::run(ctx, msg, invocation).await,
        // Add new commands here
        _ => Ok(()),
    }
}

async fn report_error(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
    source: anyhow::Error,
) -> anyhow::Result<()> {
    match source.downcast_ref::<CommandError>() {
        Some(CommandError::MissingArgument(_)) => {
            utility::help::send_command_help(ctx, msg, invocation.prefix, invocation.meta).await
        }
        Some(user_error) => reply_embed(ctx, msg, failure_embed(user_error.to_string())?).await,
        None => {
            error!(command = invocation.meta.name, ?source, "command failed");
            Ok(())
        }
    }
}

/// Reply to the invoking message with a single embed.
pub(crate) async fn reply_embed(
    ctx: &Context,
    msg: &MessageCreate,
    embed: Embed,
) -> anyhow::Result<()> {
    ctx.http
        .create_message(msg.channel_id)
        .reply(msg.id)
        .fail_if_not_exists(false)
        .embeds(&[embed])
        .await?;

    Ok(())
}

/// Reply to the invoking message with plain text.
pub(crate) async fn reply_content(
    ctx: &Context,
    msg: &MessageCreate,
    content: &str,
) -> anyhow::Result<()> {
    ctx.http
        .create_message(msg.channel_id)
        .reply(msg.id)
        .fail_if_not_exists(false)
        .content(content)
        .await?;

    Ok(())
}

/// Hand component interactions to the menus waiting for them.
pub fn handle_interaction(router: &InteractionRouter, interaction: &InteractionCreate) {
    if !router.route(interaction) {
        debug!(interaction_id = interaction.id.get(), "ignoring non-menu interaction");
    }
}

/// Commands grouped by category, in category order.
pub fn commands_by_category() -> Vec<(&'static Category, Vec<&'static CommandMeta>)> {
    CATEGORIES
        .iter()
        .map(|category| {
            let commands = COMMANDS
                .iter()
                .filter(|meta| meta.category == category.name)
                .collect();
            (category, commands)
        })
        .collect()
}
