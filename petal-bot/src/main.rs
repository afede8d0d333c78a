use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use petal_commands::{handle_interaction, handle_message, handle_message_update};
use petal_core::{BotConfig, Context};
use petal_database::Database;
use petal_utils::menus::{InteractionRouter, TwilightMenuPlatform};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let config = Arc::new(BotConfig::from_env()?);

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let db = Database::new(db_pool);
    db.migrate().await?;
    info!("PostgreSQL connection established.");

    let bot_id = http.current_user().await?.model().await?.id;

    // Button presses are routed from the gateway loop to the menu owning the message
    let router = InteractionRouter::new();
    let menus = Arc::new(TwilightMenuPlatform::new(Arc::clone(&http), router.clone()));
    let ctx = Context::new(Arc::clone(&http), db, Arc::clone(&config), menus, bot_id);

    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::DIRECT_MESSAGES
        | Intents::MESSAGE_CONTENT;

    // Recent message contents, so edits can be compared with what was sent
    let cache = DefaultInMemoryCache::builder()
        .resource_types(ResourceType::MESSAGE)
        .build();

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.token.clone(), intents);

    info!("Petal is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        let previous = match &event {
            Event::MessageUpdate(update) => cache
                .message(update.0.id)
                .map(|cached| cached.content().to_owned()),
            _ => None,
        };
        cache.update(&event);

        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, guilds = ready.guilds.len(), "Petal has bloomed!");
            }

            // Each command runs in its own task so open menus never block the loop
            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "failed to handle message");
                    }
                });
            }
            Event::MessageUpdate(update) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message_update(ctx, previous, update).await {
                        error!(?source, "failed to handle message edit");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                handle_interaction(&router, &interaction);
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(()) // Return Success, shutdown cleanly
}
