//! An in-memory [`Viewer`](crate::Viewer) for hosts without a real client and
//! for tests. Every boundary call is recorded in order, and the last
//! committed frame is kept for inspection.

use serde::{Deserialize, Serialize};

use crate::boundary::{EconomyBoundary, RenderBoundary, RenderedOption};
use crate::id::{RequesterId, TextId};
use crate::money::Money;

/// One call made against the render boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderEvent {
    /// Pending lines dropped.
    Clear,
    /// Dialog closed.
    Close,
    /// Line appended.
    Add(RenderedOption),
    /// Frame committed.
    Commit {
        /// Header text.
        text: TextId,
        /// Requester the frame was shown for.
        requester: RequesterId,
    },
}

/// A committed menu as the viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Header text.
    pub text: TextId,
    /// Requester the frame was shown for.
    pub requester: RequesterId,
    /// Lines in display order.
    pub lines: Vec<RenderedOption>,
}

/// A viewer that remembers everything the engine asked of it.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewer {
    balance: Money,
    events: Vec<RenderEvent>,
    pending: Vec<RenderedOption>,
    frame: Option<Frame>,
    requester: Option<RequesterId>,
}

impl RecordingViewer {
    /// Create a viewer with no money and no open dialog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewer holding `balance`.
    pub fn with_balance(balance: Money) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// All recorded boundary calls, oldest first.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Forget recorded calls. The open frame is kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// The frame currently on screen, if the dialog is open.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Whether a frame is on screen.
    pub fn is_open(&self) -> bool {
        self.frame.is_some()
    }

    /// How many frames have been committed since the last
    /// [`clear_events`](Self::clear_events).
    pub fn commit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RenderEvent::Commit { .. }))
            .count()
    }

    /// Add funds.
    pub fn deposit(&mut self, amount: Money) {
        self.balance = Money(self.balance.0.saturating_add(amount.0));
    }
}

impl RenderBoundary for RecordingViewer {
    fn clear_render(&mut self) {
        self.pending.clear();
        self.events.push(RenderEvent::Clear);
    }

    fn close_render(&mut self) {
        self.frame = None;
        self.events.push(RenderEvent::Close);
    }

    fn add_rendered_option(&mut self, option: RenderedOption) {
        self.pending.push(option.clone());
        self.events.push(RenderEvent::Add(option));
    }

    fn commit_render(&mut self, text: TextId, requester: RequesterId) {
        self.requester = Some(requester);
        self.frame = Some(Frame {
            text,
            requester,
            lines: std::mem::take(&mut self.pending),
        });
        self.events.push(RenderEvent::Commit { text, requester });
    }

    fn current_requester(&self) -> Option<RequesterId> {
        self.requester
    }
}

impl EconomyBoundary for RecordingViewer {
    fn balance(&self) -> Money {
        self.balance
    }

    fn try_deduct(&mut self, amount: Money) -> bool {
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                true
            }
            None => false,
        }
    }
}
