//! Button actions and the fixed menus that offer them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// A named control action the user can trigger from a menu.
///
/// The wire name returned by [`Action::as_str`] is what transports put in
/// button payloads; [`FromStr`] parses it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Begin,
    Cancel,
    EditCurrent,
    Advance,
    EditReview,
    Export,
    Restart,
    CancelEdit,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Begin,
        Action::Cancel,
        Action::EditCurrent,
        Action::Advance,
        Action::EditReview,
        Action::Export,
        Action::Restart,
        Action::CancelEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Begin => "begin",
            Action::Cancel => "cancel",
            Action::EditCurrent => "edit-current",
            Action::Advance => "advance",
            Action::EditReview => "edit-review",
            Action::Export => "export",
            Action::Restart => "restart",
            Action::CancelEdit => "cancel-edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("action", format!("unknown action '{}'", s)))
    }
}

/// One of the fixed action menus attached to an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Menu {
    /// Shown after the profile loads.
    Start,
    /// Shown after each recorded answer.
    Answer,
    /// Shown with the generated or edited review.
    Review,
    /// Shown while waiting for replacement review text.
    Edit,
}

impl Menu {
    /// The actions offered by this menu, in display order.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Menu::Start => &[Action::Begin, Action::Cancel],
            Menu::Answer => &[Action::EditCurrent, Action::Advance],
            Menu::Review => &[Action::EditReview, Action::Export, Action::Restart],
            Menu::Edit => &[Action::CancelEdit],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_wire_name_is_rejected() {
        let err = "send_whatsapp".parse::<Action>().unwrap_err();
        assert!(err.to_string().contains("unknown action 'send_whatsapp'"));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Action::EditCurrent).unwrap();
        assert_eq!(json, "\"edit-current\"");
    }

    #[test]
    fn review_menu_offers_edit_export_restart() {
        assert_eq!(
            Menu::Review.actions(),
            &[Action::EditReview, Action::Export, Action::Restart]
        );
    }
}
