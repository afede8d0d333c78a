//! Twilight-backed menu platform.

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::sync::mpsc;
use twilight_http::Client;
use twilight_model::{
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::Id,
};

use super::action::ActionSpec;
use super::components::build_action_components;
use super::interaction::InteractionRouter;
use super::platform::{Interaction, MenuOrigin, MenuPlatform, MessageHandle};
use super::render::MenuPayload;

/// Drives menus through the Discord REST API.
///
/// Interactions reach menus through the shared [`InteractionRouter`], which
/// the gateway loop feeds.
#[derive(Clone)]
pub struct TwilightMenuPlatform {
    http: Arc<Client>,
    router: InteractionRouter,
}

impl TwilightMenuPlatform {
    pub fn new(http: Arc<Client>, router: InteractionRouter) -> Self {
        Self { http, router }
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }
}

fn id<T>(raw: u64) -> anyhow::Result<Id<T>> {
    Id::new_checked(raw).context("discord ids are never zero")
}

#[async_trait]
impl MenuPlatform for TwilightMenuPlatform {
    async fn send_message(
        &self,
        origin: &MenuOrigin,
        payload: &MenuPayload,
        actions: &[ActionSpec],
    ) -> anyhow::Result<MessageHandle> {
        let components = build_action_components(actions);

        let mut request = self
            .http
            .create_message(id(origin.channel_id)?)
            .embeds(&payload.embeds)
            .components(&components);

        if let Some(content) = payload.content.as_deref() {
            request = request.content(content);
        }

        if let Some(reply_to) = origin.reply_to {
            request = request.reply(id(reply_to)?).fail_if_not_exists(false);
        }

        let message = request.await?.model().await?;

        Ok(MessageHandle {
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
        })
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        payload: Option<&MenuPayload>,
        actions: &[ActionSpec],
    ) -> anyhow::Result<()> {
        let components = build_action_components(actions);
        let request = self
            .http
            .update_message(id(handle.channel_id)?, id(handle.message_id)?)
            .components(Some(&components));

        match payload {
            Some(payload) => {
                request
                    .content(payload.content.as_deref())
                    .embeds(Some(&payload.embeds))
                    .await?;
            }
            None => {
                request.await?;
            }
        }

        Ok(())
    }

    async fn delete_message(&self, handle: &MessageHandle) -> anyhow::Result<()> {
        self.http
            .delete_message(id(handle.channel_id)?, id(handle.message_id)?)
            .await?;

        Ok(())
    }

    async fn acknowledge(&self, interaction: &Interaction) -> anyhow::Result<()> {
        let Some(reply) = interaction.reply.as_ref() else {
            return Ok(());
        };

        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredUpdateMessage,
            data: None,
        };

        self.http
            .interaction(id(reply.application_id)?)
            .create_response(id(reply.interaction_id)?, &reply.token, &response)
            .await?;

        Ok(())
    }

    fn subscribe(&self, handle: &MessageHandle) -> mpsc::UnboundedReceiver<Interaction> {
        self.router.subscribe(handle.message_id)
    }

    fn unsubscribe(&self, handle: &MessageHandle) {
        self.router.unsubscribe(handle.message_id);
    }
}
