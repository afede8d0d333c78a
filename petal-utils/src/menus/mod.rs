//! Interactive button menus bound to a single message.
//!
//! A [`Menu`] owns one sent message, accepts button presses from the user
//! that opened it, and cleans the message up exactly once when it is stopped
//! or goes idle. [`Paginator`] and [`Confirmation`] are the two menus the bot
//! ships; both run on the same controller.

use std::time::Duration;

/// Idle timeout for paginators.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);
/// Idle timeout for confirmation prompts.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(40);
/// Default number of entries per page.
pub const DEFAULT_PER_PAGE: usize = 10;

pub mod action;
mod components;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod interaction;
pub mod page;
pub mod paginator;
pub mod platform;
pub mod render;
mod respond;
pub mod source;
pub mod token;

pub use action::{Action, ActionSpec};
pub use confirm::{ConfirmPrompt, Confirmation};
pub use controller::{Cleanup, Menu, MenuBehavior, MenuCore, Termination};
pub use error::MenuError;
pub use interaction::InteractionRouter;
pub use page::Page;
pub use paginator::{PageView, Paginator};
pub use platform::{Interaction, InteractionReply, MenuOrigin, MenuPlatform, MessageHandle};
pub use render::{
    FieldsRenderer, MenuField, MenuPayload, MenuStyle, PageMeta, PageRenderer, TableRenderer,
};
pub use respond::TwilightMenuPlatform;
pub use source::{ListPageSource, PageSource, StreamPageSource};

/// Per-menu settings.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuConfig {
    /// Idle time after which the menu times out. Reset by every accepted
    /// interaction.
    pub timeout: Duration,
    /// Delete the message on termination instead of stripping its buttons.
    pub delete_message_after: bool,
    /// Page size used by commands building their own sources.
    pub per_page: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            delete_message_after: false,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl MenuConfig {
    /// Settings used by confirmation prompts.
    pub fn confirmation() -> Self {
        Self {
            timeout: CONFIRMATION_TIMEOUT,
            delete_message_after: true,
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn delete_message_after(mut self, delete_message_after: bool) -> Self {
        self.delete_message_after = delete_message_after;
        self
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }
}
