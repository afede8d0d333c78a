//! Menu button component builders.

use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component};

use super::action::{Action, ActionSpec};
use super::token::build_custom_id;

const BUTTONS_PER_ROW: usize = 5;

/// Build the button rows for a menu registry.
pub fn build_action_components(actions: &[ActionSpec]) -> Vec<Component> {
    actions
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            Component::ActionRow(ActionRow {
                id: None,
                components: row
                    .iter()
                    .map(|spec| Component::Button(action_button(spec.action)))
                    .collect(),
            })
        })
        .collect()
}

fn action_button(action: Action) -> Button {
    let (label, style) = match action {
        Action::First => ("⏮", ButtonStyle::Secondary),
        Action::Previous => ("◀ Prev", ButtonStyle::Secondary),
        Action::Next => ("Next ▶", ButtonStyle::Secondary),
        Action::Last => ("⏭", ButtonStyle::Secondary),
        Action::Stop => ("⏹", ButtonStyle::Danger),
        Action::Confirm => ("Confirm", ButtonStyle::Success),
        Action::Cancel => ("Cancel", ButtonStyle::Danger),
    };

    Button {
        id: None,
        custom_id: Some(build_custom_id(action)),
        disabled: false,
        emoji: None,
        label: Some(label.to_owned()),
        style,
        url: None,
        sku_id: None,
    }
}
