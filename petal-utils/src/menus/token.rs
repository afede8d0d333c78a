//! Button custom-ID encoding for menu controls.
//!
//! Menus are bound to a message, so the custom ID only needs to carry the
//! action. Ownership and expiry live in the controller, not in the token.

use super::action::Action;

const TOKEN_PREFIX: &str = "menu";

/// Build the custom ID for a menu button.
pub fn build_custom_id(action: Action) -> String {
    format!("{TOKEN_PREFIX}:{}", action.id())
}

/// Extract the raw action id from a menu button custom ID.
///
/// The id is returned unparsed so the controller can look it up against its
/// own registry.
pub fn parse_custom_id(custom_id: &str) -> Option<&str> {
    let (prefix, action_id) = custom_id.split_once(':')?;
    if prefix != TOKEN_PREFIX || action_id.is_empty() || action_id.contains(':') {
        return None;
    }

    Some(action_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_custom_ids() {
        assert_eq!(build_custom_id(Action::Next), "menu:next");
        assert_eq!(parse_custom_id("menu:next"), Some("next"));
        assert_eq!(parse_custom_id("menu:unknown"), Some("unknown"));
    }

    #[test]
    fn rejects_foreign_custom_ids() {
        assert_eq!(parse_custom_id("pg:help:next:1:2:3:4"), None);
        assert_eq!(parse_custom_id("menu:"), None);
        assert_eq!(parse_custom_id("menu:next:extra"), None);
        assert_eq!(parse_custom_id("menu"), None);
    }
}
