use std::sync::Arc;

use petal_database::Database;
use petal_utils::menus::{MenuConfig, MenuPlatform};
use twilight_http::Client;
use twilight_model::id::{Id, marker::UserMarker};

/// Environment-driven bot configuration.
pub mod config;

pub use config::{BotConfig, ConfigError, RoleLevel};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub db: Database,
    pub config: Arc<BotConfig>,
    /// Platform every menu opened by a command is driven through.
    pub menus: Arc<dyn MenuPlatform>,
    pub bot_id: Id<UserMarker>,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        db: Database,
        config: Arc<BotConfig>,
        menus: Arc<dyn MenuPlatform>,
        bot_id: Id<UserMarker>,
    ) -> Self {
        Self {
            http,
            db,
            config,
            menus,
            bot_id,
        }
    }

    /// Settings for paginators opened by commands.
    pub fn menu_config(&self) -> MenuConfig {
        self.config.menu.clone()
    }

    /// Settings for confirmation prompts opened by commands.
    pub fn confirmation_config(&self) -> MenuConfig {
        MenuConfig::confirmation()
    }
}
