//! Yes/no confirmation prompts.

use std::sync::OnceLock;

use async_trait::async_trait;

use super::MenuConfig;
use super::action::{Action, ActionSpec, CONFIRMATION_ACTIONS};
use super::controller::{Cleanup, Menu, MenuBehavior, MenuCore};
use super::error::MenuError;
use super::platform::MenuOrigin;
use super::render::MenuPayload;

/// A two-button menu resolving a single decision.
pub type Confirmation = Menu<ConfirmPrompt>;

/// Confirmation state: the prompt and the pending decision.
pub struct ConfirmPrompt {
    payload: MenuPayload,
    decision: OnceLock<bool>,
}

impl ConfirmPrompt {
    pub fn new(payload: MenuPayload) -> Self {
        Self {
            payload,
            decision: OnceLock::new(),
        }
    }

    /// `Some(true)` confirmed, `Some(false)` cancelled, `None` undecided.
    pub fn decision(&self) -> Option<bool> {
        self.decision.get().copied()
    }
}

#[async_trait]
impl MenuBehavior for ConfirmPrompt {
    async fn initial_payload(&self) -> anyhow::Result<MenuPayload> {
        Ok(self.payload.clone())
    }

    fn actions(&self) -> Vec<ActionSpec> {
        CONFIRMATION_ACTIONS.to_vec()
    }

    async fn on_action(&self, menu: &MenuCore, action: Action) -> anyhow::Result<()> {
        let decision = match action {
            Action::Confirm => true,
            Action::Cancel => false,
            _ => return Ok(()),
        };

        let _ = self.decision.set(decision);
        menu.stop();
        Ok(())
    }

    fn cleanup(&self, timed_out: bool, config: &MenuConfig) -> Cleanup {
        if timed_out || config.delete_message_after {
            Cleanup::Delete
        } else {
            Cleanup::StripControls
        }
    }
}

impl Menu<ConfirmPrompt> {
    /// Ask the origin author and wait for the answer.
    ///
    /// Resolves to `None` when the prompt times out.
    pub async fn ask(&self, origin: MenuOrigin) -> Result<Option<bool>, MenuError> {
        self.start(origin).await?;
        Ok(self.behavior().decision())
    }
}
