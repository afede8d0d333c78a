//! The message capability a menu is driven through.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::action::ActionSpec;
use super::render::MenuPayload;

/// Where a menu is opened and on whose behalf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MenuOrigin {
    pub channel_id: u64,
    /// Only this user may operate the menu.
    pub author_id: u64,
    /// Message the menu replies to, if any.
    pub reply_to: Option<u64>,
}

/// A sent message bound to a menu.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MessageHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Credentials needed to acknowledge an interaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractionReply {
    pub application_id: u64,
    pub interaction_id: u64,
    pub token: String,
}

/// A single button press on a menu message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interaction {
    pub action_id: String,
    pub actor_id: u64,
    pub message_id: u64,
    pub reply: Option<InteractionReply>,
}

impl Interaction {
    pub fn new(action_id: impl Into<String>, actor_id: u64, message_id: u64) -> Self {
        Self {
            action_id: action_id.into(),
            actor_id,
            message_id,
            reply: None,
        }
    }
}

/// Send/edit/delete access to the chat platform plus the interaction feed.
#[async_trait]
pub trait MenuPlatform: Send + Sync {
    /// Send a new message carrying `actions` as buttons.
    async fn send_message(
        &self,
        origin: &MenuOrigin,
        payload: &MenuPayload,
        actions: &[ActionSpec],
    ) -> anyhow::Result<MessageHandle>;

    /// Edit a message in place. `None` keeps the current body and only
    /// replaces the buttons.
    async fn edit_message(
        &self,
        handle: &MessageHandle,
        payload: Option<&MenuPayload>,
        actions: &[ActionSpec],
    ) -> anyhow::Result<()>;

    async fn delete_message(&self, handle: &MessageHandle) -> anyhow::Result<()>;

    /// Acknowledge an accepted interaction without changing the message.
    async fn acknowledge(&self, _interaction: &Interaction) -> anyhow::Result<()> {
        Ok(())
    }

    /// Start receiving interactions aimed at `handle`.
    fn subscribe(&self, handle: &MessageHandle) -> mpsc::UnboundedReceiver<Interaction>;

    fn unsubscribe(&self, handle: &MessageHandle);
}
