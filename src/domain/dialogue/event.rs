//! Inbound dialogue events.

use super::Action;

/// An event delivered by the transport for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user asked to start the questionnaire (`/start`).
    Entry,
    /// Free text typed by the user.
    Text(String),
    /// A menu button press.
    Action(Action),
    /// The user asked to abandon the dialogue (`/cancel`).
    Abort,
}

impl Event {
    /// Short label used in logs and error details. Never includes user text.
    pub fn label(&self) -> &'static str {
        match self {
            Event::Entry => "entry",
            Event::Text(_) => "text",
            Event::Action(action) => action.as_str(),
            Event::Abort => "abort",
        }
    }
}

impl From<Action> for Event {
    fn from(action: Action) -> Self {
        Event::Action(action)
    }
}
