use std::fmt;

use serde::{Deserialize, Serialize};

/// The icon drawn next to a dialog line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Speech bubble.
    #[default]
    Chat,
    /// Bag of goods.
    Vendor,
    /// Flight path.
    Taxi,
    /// Book.
    Trainer,
    /// Cog.
    Interact1,
    /// Second cog.
    Interact2,
    /// Bag of coins.
    MoneyBag,
    /// Speech bubble with dots.
    Talk,
    /// Guild tabard.
    Tabard,
    /// Crossed swords.
    Battle,
    /// Small dot.
    Dot,
}

impl Icon {
    /// The numeric code a client expects for this icon.
    pub fn code(self) -> u8 {
        match self {
            Self::Chat => 0,
            Self::Vendor => 1,
            Self::Taxi => 2,
            Self::Trainer => 3,
            Self::Interact1 => 4,
            Self::Interact2 => 5,
            Self::MoneyBag => 6,
            Self::Talk => 7,
            Self::Tabard => 8,
            Self::Battle => 9,
            Self::Dot => 10,
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Chat => "chat",
            Self::Vendor => "vendor",
            Self::Taxi => "taxi",
            Self::Trainer => "trainer",
            Self::Interact1 => "interact1",
            Self::Interact2 => "interact2",
            Self::MoneyBag => "money",
            Self::Talk => "talk",
            Self::Tabard => "tabard",
            Self::Battle => "battle",
            Self::Dot => "dot",
        };
        write!(f, "{name}")
    }
}
