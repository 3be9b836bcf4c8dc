//! The capabilities a host supplies so the engine can draw lines and charge
//! costs. The engine never talks to a client directly.

use serde::{Deserialize, Serialize};

use crate::icon::Icon;
use crate::id::{OptionId, RequesterId, TextId};
use crate::money::Money;
use crate::option::DelegateTarget;

/// Presentation layer of a single viewer.
///
/// A frame is built by [`add_rendered_option`](Self::add_rendered_option)
/// calls and becomes visible on [`commit_render`](Self::commit_render).
pub trait RenderBoundary {
    /// Drop any lines added since the last commit.
    fn clear_render(&mut self);

    /// Close the dialog window, if one is open.
    fn close_render(&mut self);

    /// Append one line to the pending frame.
    fn add_rendered_option(&mut self, option: RenderedOption);

    /// Show the pending frame under a header text on behalf of a requester.
    fn commit_render(&mut self, text: TextId, requester: RequesterId);

    /// The requester of the frame the viewer is currently looking at.
    fn current_requester(&self) -> Option<RequesterId>;
}

/// Spendable balance of a single viewer.
pub trait EconomyBoundary {
    /// Current balance.
    fn balance(&self) -> Money;

    /// Deduct `amount`. Returns whether the deduction was applied.
    fn try_deduct(&mut self, amount: Money) -> bool;
}

/// Anything that can both see a menu and pay for popup options.
pub trait Viewer: RenderBoundary + EconomyBoundary {}

impl<T: RenderBoundary + EconomyBoundary> Viewer for T {}

/// One line handed to the render boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedOption {
    /// The id the viewer sends back when picking this line.
    pub option_id: OptionId,
    /// What to draw.
    pub line: RenderedLine,
}

/// Presentation of a line, one shape per option variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderedLine {
    /// Icon and label.
    IconText {
        /// Icon.
        icon: Icon,
        /// Label.
        text: String,
    },
    /// Icon and label that asks for confirmation, optionally with a cost.
    Popup {
        /// Icon.
        icon: Icon,
        /// Label.
        text: String,
        /// Confirmation prompt.
        popup_text: String,
        /// Cost charged on selection.
        cost: Money,
        /// The prompt asks the viewer to type a value.
        requires_text_entry: bool,
    },
    /// An entry from a menu defined outside this engine.
    Delegate(DelegateTarget),
}

impl RenderedLine {
    /// The label, if this line carries one of its own.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::IconText { text, .. } | Self::Popup { text, .. } => Some(text),
            Self::Delegate(_) => None,
        }
    }

    /// The icon, if this line draws one of its own.
    pub fn icon(&self) -> Option<Icon> {
        match self {
            Self::IconText { icon, .. } | Self::Popup { icon, .. } => Some(*icon),
            Self::Delegate(_) => None,
        }
    }
}
