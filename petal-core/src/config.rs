use std::{env, fmt, time::Duration};

use petal_utils::{DEFAULT_PREFIX, menus::MenuConfig};
use thiserror::Error;

/// Longest prefix a guild may configure.
pub const MAX_PREFIX_LEN: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("`{key}` contains an invalid id: `{value}`")]
    InvalidId { key: &'static str, value: String },

    #[error("`{key}` must be a number, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },

    #[error("`{key}` must be true or false, got `{value}`")]
    InvalidBool { key: &'static str, value: String },

    #[error("default prefix must be 1 to {MAX_PREFIX_LEN} characters, got `{0}`")]
    InvalidPrefix(String),
}

/// Role clearance a command requires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoleLevel {
    /// Owners, guild owners and administrators only.
    Admin,
    Manager,
    Moderator,
    TrialModerator,
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub default_prefix: String,
    pub owner_ids: Vec<u64>,
    pub manager_roles: Vec<u64>,
    /// Includes the manager roles.
    pub moderator_roles: Vec<u64>,
    /// Includes the moderator roles.
    pub trial_moderator_roles: Vec<u64>,
    pub menu: MenuConfig,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("default_prefix", &self.default_prefix)
            .field("owner_ids", &self.owner_ids)
            .field("manager_roles", &self.manager_roles)
            .field("moderator_roles", &self.moderator_roles)
            .field("trial_moderator_roles", &self.trial_moderator_roles)
            .field("menu", &self.menu)
            .finish()
    }
}

impl BotConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let default_prefix = get("DEFAULT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_owned());
        if !valid_prefix(&default_prefix) {
            return Err(ConfigError::InvalidPrefix(default_prefix));
        }

        let manager_roles = id_list("MANAGER_ROLE_IDS", get("MANAGER_ROLE_IDS"))?;
        let moderator_roles = merged(
            &manager_roles,
            id_list("MODERATOR_ROLE_IDS", get("MODERATOR_ROLE_IDS"))?,
        );
        let trial_moderator_roles = merged(
            &moderator_roles,
            id_list("TRIAL_MODERATOR_ROLE_IDS", get("TRIAL_MODERATOR_ROLE_IDS"))?,
        );

        let mut menu = MenuConfig::default();
        if let Some(raw) = get("MENU_TIMEOUT_SECS") {
            menu = menu.timeout(Duration::from_secs(number("MENU_TIMEOUT_SECS", &raw)?));
        }
        if let Some(raw) = get("MENU_DELETE_AFTER") {
            menu = menu.delete_message_after(boolean("MENU_DELETE_AFTER", &raw)?);
        }

        let database_max_connections: u32 = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => number("DATABASE_MAX_CONNECTIONS", &raw)?
                .try_into()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => 5,
        };

        Ok(Self {
            token: required("DISCORD_TOKEN")?,
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            default_prefix,
            owner_ids: id_list("OWNER_IDS", get("OWNER_IDS"))?,
            manager_roles,
            moderator_roles,
            trial_moderator_roles,
            menu,
        })
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }

    /// Role ids that satisfy `level`.
    pub fn roles_for(&self, level: RoleLevel) -> &[u64] {
        match level {
            RoleLevel::Admin => &[],
            RoleLevel::Manager => &self.manager_roles,
            RoleLevel::Moderator => &self.moderator_roles,
            RoleLevel::TrialModerator => &self.trial_moderator_roles,
        }
    }
}

/// Whether `prefix` is an acceptable command prefix.
pub fn valid_prefix(prefix: &str) -> bool {
    let len = prefix.chars().count();
    (1..=MAX_PREFIX_LEN).contains(&len) && !prefix.chars().any(char::is_whitespace)
}

fn id_list(key: &'static str, raw: Option<String>) -> Result<Vec<u64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| ConfigError::InvalidId {
                    key,
                    value: part.to_owned(),
                })
        })
        .collect()
}

fn merged(base: &[u64], extra: Vec<u64>) -> Vec<u64> {
    let mut roles = base.to_vec();
    for role in extra {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}

fn number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_owned(),
        })
}

fn boolean(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_owned(),
        }),
    }
}
