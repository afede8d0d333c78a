use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{
    BASIC, CATEGORIES, Category, CommandMeta, Invocation, checks::Access, checks::can_run,
    commands_by_category, find_command, reply_embed,
};
use petal_core::Context;
use petal_utils::{
    embed::{build_fields_embed, failure_embed},
    menus::{ListPageSource, MenuPayload, Page, PageMeta, PageRenderer, PageView, Paginator},
};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Shows all available commands.",
    category: BASIC.name,
    usage: "help [command]",
    aliases: &[],
    access: Access::Everyone,
};

const CATEGORIES_PER_PAGE: usize = 6;

/// Show the category index, or help for one command or category.
pub async fn run(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
) -> anyhow::Result<()> {
    let wanted = invocation.args.trim();
    if wanted.is_empty() {
        return send_bot_help(ctx, msg, invocation).await;
    }

    let lowered = wanted.to_lowercase();
    if let Some(meta) = find_command(&lowered)
        && can_run(ctx, msg, meta).await?
    {
        return send_command_help(ctx, msg, invocation.prefix, meta).await;
    }

    if let Some(category) = CATEGORIES
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(wanted))
    {
        return send_category_help(ctx, msg, invocation.prefix, category).await;
    }

    reply_embed(ctx, msg, failure_embed(not_found_message(wanted))?).await
}

fn not_found_message(name: &str) -> String {
    format!("No command called `{name}` found.")
}

/// Commands of `category` the author may run, sorted by name.
async fn visible_commands(
    ctx: &Context,
    msg: &MessageCreate,
    commands: Vec<&'static CommandMeta>,
) -> anyhow::Result<Vec<&'static CommandMeta>> {
    let mut visible = Vec::with_capacity(commands.len());
    for meta in commands {
        if can_run(ctx, msg, meta).await? {
            visible.push(meta);
        }
    }

    visible.sort_unstable_by_key(|meta| meta.name);
    Ok(visible)
}

/// One row of the category index.
pub struct HelpEntry {
    pub name: &'static str,
    pub desc: &'static str,
    pub commands: Vec<&'static str>,
}

/// Renders the category index pages.
pub struct CategoryIndex {
    prefix: String,
}

impl PageRenderer<HelpEntry> for CategoryIndex {
    fn render(&self, page: &Page<HelpEntry>, meta: &PageMeta) -> anyhow::Result<MenuPayload> {
        let prefix = &self.prefix;
        let title = format!(
            "Command Categories (Page {}/{})",
            meta.current_page + 1,
            meta.max_pages.unwrap_or(1)
        );
        let description = format!(
            "Use `{prefix}help <command>` for more info on a command.\n\
             Use `{prefix}help <category>` for more info on a category."
        );

        let fields: Vec<(String, String)> = page
            .items()
            .iter()
            .map(|entry| {
                let names = entry
                    .commands
                    .iter()
                    .map(|name| format!("`{name}`"))
                    .collect::<Vec<_>>()
                    .join(" ");
                (entry.name.to_owned(), format!("{}\n{names}", entry.desc))
            })
            .collect();

        let embed = build_fields_embed(&title, Some(&description), &fields, None)?;
        Ok(MenuPayload::embed(embed))
    }
}

async fn send_bot_help(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
) -> anyhow::Result<()> {
    let mut entries = Vec::new();
    for (category, commands) in commands_by_category() {
        let visible = visible_commands(ctx, msg, commands).await?;
        if visible.is_empty() {
            continue;
        }

        entries.push(HelpEntry {
            name: category.name,
            desc: category.desc,
            commands: visible.iter().map(|meta| meta.name).collect(),
        });
    }

    let view = PageView::new(
        ListPageSource::new(entries, CATEGORIES_PER_PAGE),
        CategoryIndex {
            prefix: invocation.prefix.to_owned(),
        },
    );
    let paginator = Paginator::new(view, ctx.menus.clone(), ctx.menu_config());
    paginator.start(invocation.menu_origin(msg)).await?;

    Ok(())
}

fn usage_line(prefix: &str, meta: &CommandMeta) -> String {
    format!("{prefix}{}", meta.usage)
}

fn help_footer(prefix: &str) -> String {
    format!("Use \"{prefix}help command\" for more info on a command.")
}

/// Reply with the help embed of a single command.
pub async fn send_command_help(
    ctx: &Context,
    msg: &MessageCreate,
    prefix: &str,
    meta: &CommandMeta,
) -> anyhow::Result<()> {
    let mut fields = Vec::new();
    if !meta.aliases.is_empty() {
        let aliases = meta
            .aliases
            .iter()
            .map(|alias| format!("`{alias}`"))
            .collect::<Vec<_>>()
            .join(" ");
        fields.push(("Aliases".to_owned(), aliases));
    }

    let embed = build_fields_embed(&usage_line(prefix, meta), Some(meta.desc), &fields, None)?;
    reply_embed(ctx, msg, embed).await
}

async fn send_category_help(
    ctx: &Context,
    msg: &MessageCreate,
    prefix: &str,
    category: &Category,
) -> anyhow::Result<()> {
    let commands = commands_by_category()
        .into_iter()
        .find(|(candidate, _)| candidate.name == category.name)
        .map(|(_, commands)| commands)
        .unwrap_or_default();
    let visible = visible_commands(ctx, msg, commands).await?;

    if visible.is_empty() {
        return reply_embed(ctx, msg, failure_embed(not_found_message(category.name))?).await;
    }

    let fields: Vec<(String, String)> = visible
        .iter()
        .map(|meta| (usage_line(prefix, meta), format!("`{}`", meta.desc)))
        .collect();

    let embed = build_fields_embed(
        &format!("{} Commands", category.name),
        Some(category.desc),
        &fields,
        Some(&help_footer(prefix)),
    )?;
    reply_embed(ctx, msg, embed).await
}
