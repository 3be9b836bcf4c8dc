//! Configuration for a menu.

use serde::{Deserialize, Serialize};

use crate::id::TextId;

/// Configuration for a [`Menu`](crate::Menu).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Header text used when a show call does not name one.
    pub starting_text: TextId,
}

impl MenuConfig {
    /// Set the starting header text.
    pub fn with_starting_text(mut self, text: TextId) -> Self {
        self.starting_text = text;
        self
    }
}
