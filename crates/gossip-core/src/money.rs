use std::fmt;

use serde::{Deserialize, Serialize};

const COPPER_PER_SILVER: u64 = 100;
const COPPER_PER_GOLD: u64 = 100 * COPPER_PER_SILVER;

/// An amount of currency in copper, the smallest unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    /// No cost.
    pub const ZERO: Money = Money(0);

    /// An amount given as gold, silver and copper.
    pub fn from_gold_silver_copper(gold: u32, silver: u8, copper: u8) -> Self {
        Self(
            u64::from(gold) * COPPER_PER_GOLD
                + u64::from(silver) * COPPER_PER_SILVER
                + u64::from(copper),
        )
    }

    /// Total value in copper.
    pub fn as_copper(self) -> u64 {
        self.0
    }

    /// Subtract, returning `None` when the result would be negative.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gold = self.0 / COPPER_PER_GOLD;
        let silver = (self.0 % COPPER_PER_GOLD) / COPPER_PER_SILVER;
        let copper = self.0 % COPPER_PER_SILVER;
        write!(f, "{gold}g {silver}s {copper}c")
    }
}
