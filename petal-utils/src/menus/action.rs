//! Menu actions and the static dispatch table.

use std::fmt;

/// A button a menu can attach to its message.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    First,
    Previous,
    Next,
    Last,
    Stop,
    Confirm,
    Cancel,
}

impl Action {
    /// Every action, in button order.
    pub const ALL: [Action; 7] = [
        Action::First,
        Action::Previous,
        Action::Next,
        Action::Last,
        Action::Stop,
        Action::Confirm,
        Action::Cancel,
    ];

    /// Stable identifier carried by the button.
    pub const fn id(self) -> &'static str {
        match self {
            Action::First => "first",
            Action::Previous => "prev",
            Action::Next => "next",
            Action::Last => "last",
            Action::Stop => "stop",
            Action::Confirm => "confirm",
            Action::Cancel => "cancel",
        }
    }

    /// Resolve an identifier produced by [`Action::id`].
    pub fn from_id(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == raw)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Registry entry binding an action to its locking policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionSpec {
    pub action: Action,
    /// Exclusive actions run under the menu lock and only while it is running.
    pub exclusive: bool,
}

impl ActionSpec {
    pub const fn exclusive(action: Action) -> Self {
        Self {
            action,
            exclusive: true,
        }
    }

    pub const fn shared(action: Action) -> Self {
        Self {
            action,
            exclusive: false,
        }
    }
}

/// Navigation registry used by paginators.
///
/// `Stop` is shared so it never queues behind a navigation edit.
pub const PAGINATOR_ACTIONS: [ActionSpec; 5] = [
    ActionSpec::exclusive(Action::First),
    ActionSpec::exclusive(Action::Previous),
    ActionSpec::exclusive(Action::Next),
    ActionSpec::exclusive(Action::Last),
    ActionSpec::shared(Action::Stop),
];

/// Registry used by confirmation dialogs.
pub const CONFIRMATION_ACTIONS: [ActionSpec; 2] = [
    ActionSpec::exclusive(Action::Confirm),
    ActionSpec::exclusive(Action::Cancel),
];

/// Look up an incoming action id in a registry.
pub fn lookup(registry: &[ActionSpec], action_id: &str) -> Option<ActionSpec> {
    let action = Action::from_id(action_id)?;
    registry.iter().copied().find(|spec| spec.action == action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for action in Action::ALL {
            assert_eq!(Action::from_id(action.id()), Some(action));
        }
        assert_eq!(Action::from_id("jump"), None);
    }

    #[test]
    fn lookup_only_matches_registered_actions() {
        assert_eq!(
            lookup(&PAGINATOR_ACTIONS, "stop"),
            Some(ActionSpec::shared(Action::Stop))
        );
        assert_eq!(lookup(&PAGINATOR_ACTIONS, "confirm"), None);
        assert_eq!(
            lookup(&CONFIRMATION_ACTIONS, "cancel"),
            Some(ActionSpec::exclusive(Action::Cancel))
        );
    }

    #[test]
    fn navigation_is_exclusive_and_stop_is_not() {
        let exclusive: Vec<_> = PAGINATOR_ACTIONS
            .iter()
            .filter(|spec| spec.exclusive)
            .map(|spec| spec.action)
            .collect();
        assert_eq!(
            exclusive,
            vec![Action::First, Action::Previous, Action::Next, Action::Last]
        );
    }
}
