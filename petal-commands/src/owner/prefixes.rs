use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{CommandMeta, Invocation, OWNER, checks::Access};
use petal_core::Context;
use petal_database::guilds::GuildPrefix;
use petal_utils::menus::{MenuStyle, PageView, Paginator, StreamPageSource, TableRenderer};

pub const META: CommandMeta = CommandMeta {
    name: "prefixes",
    desc: "Lists the prefix stored for every server.",
    category: OWNER.name,
    usage: "prefixes",
    aliases: &[],
    access: Access::Owner,
};

const FETCH_BATCH: usize = 100;

fn prefix_row(row: &GuildPrefix, default_prefix: &str) -> Vec<String> {
    let prefix = match row.prefix.as_deref() {
        Some(prefix) => prefix.to_owned(),
        None => format!("{default_prefix} (default)"),
    };
    vec![row.guild_id.to_string(), prefix]
}

/// Page through the stored guild prefixes as a table.
pub async fn run(
    ctx: &Context,
    msg: &MessageCreate,
    invocation: &Invocation<'_>,
) -> anyhow::Result<()> {
    let config = ctx.menu_config();
    let source = StreamPageSource::new(ctx.db.stream_guild_prefixes(FETCH_BATCH), config.per_page);

    let default_prefix = ctx.config.default_prefix.clone();
    let renderer = TableRenderer::new(MenuStyle::new("Server Prefixes"), move |row: &GuildPrefix| {
        prefix_row(row, &default_prefix)
    });

    let paginator = Paginator::new(PageView::new(source, renderer), ctx.menus.clone(), config);
    paginator.start(invocation.menu_origin(msg)).await?;

    Ok(())
}
