use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a page within its owning menu.
///
/// Allocated by [`Menu`](crate::Menu) starting at 1. Zero is never
/// allocated, so `PageId::from_raw(0)` never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(u32);

impl PageId {
    /// Wrap a raw id, e.g. one read back from a host.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Identifier of an option within its owning menu.
///
/// This is the value a viewer sends back when it picks a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(u32);

impl OptionId {
    /// Wrap a raw id, e.g. the action value of a picked line.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option#{}", self.0)
    }
}

/// Identifier of a header text stored by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(pub u32);

impl TextId {
    /// The stock greeting shown above a dialog when nothing else is asked for.
    pub const GREETING: TextId = TextId(2);
}

impl Default for TextId {
    fn default() -> Self {
        Self::GREETING
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text#{}", self.0)
    }
}

/// Opaque identity of the entity a menu is shown on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequesterId(pub Uuid);

impl RequesterId {
    /// Generate a new random requester ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil requester, used when the viewer has no open dialog.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for RequesterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Hands out ids in strictly increasing order. Never reuses a value.
#[derive(Debug, Clone)]
pub(crate) struct IdCounter(u32);

impl Default for IdCounter {
    fn default() -> Self {
        Self(1)
    }
}

impl IdCounter {
    pub(crate) fn peek(&self) -> u32 {
        self.0
    }

    pub(crate) fn allocate(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}
