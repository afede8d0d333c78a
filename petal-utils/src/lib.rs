/// Generic embed builders shared across commands.
pub mod embed;
/// Interactive message menus: paginators and confirmation prompts.
pub mod menus;
/// Pure parser helpers.
pub mod parse;
/// Permission and role check helpers.
pub mod permissions;

/// Prefix used where no guild prefix is configured.
pub const DEFAULT_PREFIX: &str = "?";
