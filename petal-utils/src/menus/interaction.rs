//! Routing of gateway component interactions to live menus.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;
use twilight_model::{
    application::interaction::InteractionData, gateway::payload::incoming::InteractionCreate,
};

use super::platform::{Interaction, InteractionReply};
use super::token::parse_custom_id;

type RouteMap = HashMap<u64, mpsc::UnboundedSender<Interaction>>;

/// Forwards menu button presses to the menu bound to the clicked message.
///
/// Cheap to clone; clones share the same route table.
#[derive(Clone, Default)]
pub struct InteractionRouter {
    routes: Arc<Mutex<RouteMap>>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a message and receive its interactions.
    pub fn subscribe(&self, message_id: u64) -> mpsc::UnboundedReceiver<Interaction> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.lock().insert(message_id, tx);
        rx
    }

    pub fn unsubscribe(&self, message_id: u64) {
        self.routes.lock().remove(&message_id);
    }

    /// Number of menus currently receiving interactions.
    pub fn live_menus(&self) -> usize {
        self.routes.lock().len()
    }

    /// Route a gateway interaction.
    ///
    /// Returns `true` when the interaction was a menu button, whether or not
    /// its menu is still alive.
    pub fn route(&self, interaction: &InteractionCreate) -> bool {
        match menu_interaction(interaction) {
            Some(parsed) => {
                self.deliver(parsed);
                true
            }
            None => false,
        }
    }

    /// Hand an interaction to its menu. Returns whether a menu received it.
    pub fn deliver(&self, interaction: Interaction) -> bool {
        let message_id = interaction.message_id;
        let mut routes = self.routes.lock();

        let Some(tx) = routes.get(&message_id) else {
            debug!(message_id, "menu interaction for an inactive message");
            return false;
        };

        if tx.send(interaction).is_err() {
            routes.remove(&message_id);
            return false;
        }

        true
    }
}

/// Extract menu button data from a gateway interaction.
fn menu_interaction(interaction: &InteractionCreate) -> Option<Interaction> {
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return None;
    };

    let action_id = parse_custom_id(&data.custom_id)?;
    let message_id = interaction.message.as_ref()?.id.get();
    let actor_id = interaction.author_id()?.get();

    Some(Interaction {
        action_id: action_id.to_owned(),
        actor_id,
        message_id,
        reply: Some(InteractionReply {
            application_id: interaction.application_id.get(),
            interaction_id: interaction.id.get(),
            token: interaction.token.clone(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_subscribed_message_only() {
        let router = InteractionRouter::new();
        let mut rx = router.subscribe(10);

        assert!(router.deliver(Interaction::new("next", 1, 10)));
        assert!(!router.deliver(Interaction::new("next", 1, 11)));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.action_id, "next");
        assert_eq!(received.message_id, 10);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let router = InteractionRouter::new();
        let rx = router.subscribe(7);
        drop(rx);

        assert!(!router.deliver(Interaction::new("stop", 1, 7)));
        assert_eq!(router.live_menus(), 0);
    }

    #[test]
    fn unsubscribe_removes_route() {
        let router = InteractionRouter::new();
        let _rx = router.subscribe(3);
        let clone = router.clone();

        clone.unsubscribe(3);
        assert_eq!(router.live_menus(), 0);
    }
}
