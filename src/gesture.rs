//! User gesture tokens.
//!
//! Some resources may only be activated from inside a genuine user
//! interaction (a tap, a click, a key press). Operations with that
//! requirement take a `&UserGesture`, which the UI layer creates in its
//! input handler and hands to the session. Scheduled callbacks never have
//! one, so they cannot unlock anything.

use std::fmt;

/// Kind of interaction that produced a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Touch,
    Click,
    Key,
    /// A command entered in a terminal
    Command,
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureKind::Touch => write!(f, "touch"),
            GestureKind::Click => write!(f, "click"),
            GestureKind::Key => write!(f, "key"),
            GestureKind::Command => write!(f, "command"),
        }
    }
}

/// Proof that the current call stack is handling a user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserGesture {
    kind: GestureKind,
}

impl UserGesture {
    /// Creates a gesture token. Call only from an input handler.
    #[must_use]
    pub fn new(kind: GestureKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }
}
