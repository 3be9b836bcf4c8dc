use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::{EconomyBoundary, RenderBoundary, RenderedLine, RenderedOption};
use crate::icon::Icon;
use crate::id::{OptionId, PageId, TextId};
use crate::money::Money;

/// Called when a plain or delegate option is picked.
pub type SelectCallback<V> = Box<dyn FnMut(&mut V, OptionId)>;

/// Called when a popup option is picked. The flag reports whether the cost
/// was paid.
pub type PurchaseCallback<V> = Box<dyn FnMut(&mut V, bool, OptionId)>;

/// Decides whether an option is drawn for a viewer.
pub type OptionPredicate<V> = Box<dyn Fn(&V, OptionId) -> bool>;

/// Reference to an entry of a menu defined outside this engine, such as a
/// statically configured dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelegateTarget {
    /// The external menu.
    pub menu_id: u32,
    /// The entry within that menu.
    pub item_id: u32,
}

impl DelegateTarget {
    /// Create a delegate target.
    pub fn new(menu_id: u32, item_id: u32) -> Self {
        Self { menu_id, item_id }
    }
}

/// Where the dialog goes after an option is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Pages to show next. Takes priority over everything else but closing.
    pub next_pages: Vec<PageId>,
    /// Header for the next frame. Without `next_pages` this re-shows the
    /// starting pages under this header.
    pub next_text: Option<TextId>,
    /// Re-show the starting pages when nothing more specific is set.
    pub restart_on_select: bool,
    /// Close the dialog. Wins over every page transition.
    pub close_on_select: bool,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            next_pages: Vec::new(),
            next_text: None,
            restart_on_select: true,
            close_on_select: false,
        }
    }
}

/// The resolved transition after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Clear and close the dialog.
    Close,
    /// Show these pages, under `text` or the menu's starting text.
    Show {
        /// Header override.
        text: Option<TextId>,
        /// Pages to show, in order.
        pages: Vec<PageId>,
    },
    /// Show the menu's starting pages, under `text` or the starting text.
    ShowStarting {
        /// Header override.
        text: Option<TextId>,
    },
    /// Leave the dialog as the callbacks left it.
    Stay,
}

impl Navigation {
    /// Resolve the transition in priority order: close, explicit pages,
    /// explicit text, restart.
    pub fn next_step(&self) -> NextStep {
        if self.close_on_select {
            NextStep::Close
        } else if !self.next_pages.is_empty() {
            NextStep::Show {
                text: self.next_text,
                pages: self.next_pages.clone(),
            }
        } else if let Some(text) = self.next_text {
            NextStep::ShowStarting { text: Some(text) }
        } else if self.restart_on_select {
            NextStep::ShowStarting { text: None }
        } else {
            NextStep::Stay
        }
    }
}

enum OptionKind<V> {
    IconText {
        icon: Icon,
        text: String,
        on_select: SelectCallback<V>,
    },
    Popup {
        icon: Icon,
        text: String,
        popup_text: String,
        cost: Money,
        requires_text_entry: bool,
        on_purchase: PurchaseCallback<V>,
    },
    Delegate {
        target: DelegateTarget,
        on_select: SelectCallback<V>,
    },
}

/// A single selectable line.
///
/// Exactly one behavior per option: plain icon and text, icon and text behind
/// a paid confirmation popup, or a line delegated to an external menu. All
/// three share visibility gating, the post-selection [`Navigation`] and an
/// optional callback that runs after navigation.
pub struct MenuOption<V> {
    id: Option<OptionId>,
    kind: OptionKind<V>,
    navigation: Navigation,
    visible_if: Option<OptionPredicate<V>>,
    after_select: Option<SelectCallback<V>>,
}

impl<V> MenuOption<V> {
    fn with_kind(kind: OptionKind<V>) -> Self {
        Self {
            id: None,
            kind,
            navigation: Navigation::default(),
            visible_if: None,
            after_select: None,
        }
    }

    /// A plain line that runs `on_select` when picked.
    pub fn icon_text(
        icon: Icon,
        text: impl Into<String>,
        on_select: impl FnMut(&mut V, OptionId) + 'static,
    ) -> Self {
        Self::with_kind(OptionKind::IconText {
            icon,
            text: text.into(),
            on_select: Box::new(on_select),
        })
    }

    /// A line behind a confirmation popup that charges `cost` when picked.
    ///
    /// `on_purchase` always runs; its flag is true only when the viewer could
    /// afford the cost and the deduction went through.
    pub fn popup(
        icon: Icon,
        text: impl Into<String>,
        popup_text: impl Into<String>,
        cost: Money,
        on_purchase: impl FnMut(&mut V, bool, OptionId) + 'static,
    ) -> Self {
        Self::with_kind(OptionKind::Popup {
            icon,
            text: text.into(),
            popup_text: popup_text.into(),
            cost,
            requires_text_entry: false,
            on_purchase: Box::new(on_purchase),
        })
    }

    /// A line drawn from an externally defined menu.
    pub fn delegate(
        target: DelegateTarget,
        on_select: impl FnMut(&mut V, OptionId) + 'static,
    ) -> Self {
        Self::with_kind(OptionKind::Delegate {
            target,
            on_select: Box::new(on_select),
        })
    }

    /// Show these pages after selection.
    pub fn with_next_pages(mut self, pages: impl IntoIterator<Item = PageId>) -> Self {
        self.navigation.next_pages = pages.into_iter().collect();
        self
    }

    /// Use this header for the next frame.
    pub fn with_next_text(mut self, text: TextId) -> Self {
        self.navigation.next_text = Some(text);
        self
    }

    /// Re-show the starting pages when no explicit target is set.
    pub fn with_restart_on_select(mut self, restart: bool) -> Self {
        self.navigation.restart_on_select = restart;
        self
    }

    /// Close the dialog on selection instead of navigating.
    pub fn with_close_on_select(mut self, close: bool) -> Self {
        self.navigation.close_on_select = close;
        self
    }

    /// Only draw this option when `predicate` holds for the viewer.
    pub fn with_visibility(mut self, predicate: impl Fn(&V, OptionId) -> bool + 'static) -> Self {
        self.visible_if = Some(Box::new(predicate));
        self
    }

    /// Run `callback` once navigation after a selection is done.
    pub fn with_after_select(mut self, callback: impl FnMut(&mut V, OptionId) + 'static) -> Self {
        self.after_select = Some(Box::new(callback));
        self
    }

    /// Make the popup ask the viewer to type a value. No effect on other
    /// variants.
    pub fn with_text_entry(mut self) -> Self {
        if let OptionKind::Popup {
            requires_text_entry,
            ..
        } = &mut self.kind
        {
            *requires_text_entry = true;
        }
        self
    }

    /// The id assigned by the owning menu, if registered.
    pub fn id(&self) -> Option<OptionId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<OptionId>) {
        self.id = id;
    }

    fn action_id(&self) -> OptionId {
        self.id.unwrap_or(OptionId::from_raw(0))
    }

    /// Post-selection navigation.
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Mutable post-selection navigation.
    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    /// The popup cost, if this is a popup option.
    pub fn cost(&self) -> Option<Money> {
        match &self.kind {
            OptionKind::Popup { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    /// What this option draws.
    pub fn line(&self) -> RenderedLine {
        match &self.kind {
            OptionKind::IconText { icon, text, .. } => RenderedLine::IconText {
                icon: *icon,
                text: text.clone(),
            },
            OptionKind::Popup {
                icon,
                text,
                popup_text,
                cost,
                requires_text_entry,
                ..
            } => RenderedLine::Popup {
                icon: *icon,
                text: text.clone(),
                popup_text: popup_text.clone(),
                cost: *cost,
                requires_text_entry: *requires_text_entry,
            },
            OptionKind::Delegate { target, .. } => RenderedLine::Delegate(*target),
        }
    }

    /// Whether this option is drawn for `viewer`.
    pub fn is_visible(&self, viewer: &V) -> bool {
        self.visible_if
            .as_ref()
            .is_none_or(|predicate| predicate(viewer, self.action_id()))
    }

    /// Draw this option for `viewer`. Returns false when it is hidden.
    pub fn show(&self, viewer: &mut V) -> bool
    where
        V: RenderBoundary,
    {
        if !self.is_visible(viewer) {
            return false;
        }
        viewer.add_rendered_option(RenderedOption {
            option_id: self.action_id(),
            line: self.line(),
        });
        true
    }

    /// Run the variant's own selection behavior and resolve where the
    /// dialog goes next. A popup charges its cost here.
    pub fn select(&mut self, viewer: &mut V) -> NextStep
    where
        V: EconomyBoundary,
    {
        let id = self.action_id();
        match &mut self.kind {
            OptionKind::IconText { on_select, .. } | OptionKind::Delegate { on_select, .. } => {
                on_select(viewer, id);
            }
            OptionKind::Popup {
                cost, on_purchase, ..
            } => {
                let paid = viewer.balance() >= *cost && viewer.try_deduct(*cost);
                debug!(option = %id, cost = %cost, paid, "popup option charged");
                on_purchase(viewer, paid, id);
            }
        }
        self.navigation.next_step()
    }

    pub(crate) fn run_after_select(&mut self, viewer: &mut V) {
        let id = self.action_id();
        if let Some(callback) = self.after_select.as_mut() {
            callback(viewer, id);
        }
    }
}

impl<V> fmt::Debug for MenuOption<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuOption")
            .field("id", &self.id)
            .field("line", &self.line())
            .field("navigation", &self.navigation)
            .field("conditional", &self.visible_if.is_some())
            .finish_non_exhaustive()
    }
}
