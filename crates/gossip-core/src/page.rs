use std::collections::HashMap;
use std::fmt;

use crate::boundary::RenderBoundary;
use crate::error::{MenuError, MenuResult};
use crate::id::{OptionId, PageId};
use crate::option::MenuOption;

/// Decides whether a page is drawn for a viewer.
pub type PagePredicate<V> = Box<dyn Fn(&V, PageId) -> bool>;

/// A group of options that is always shown or hidden together.
///
/// Pages reference options by id only. The same option may sit on several
/// pages; it is resolved through whichever menu owns the page.
pub struct Page<V> {
    id: Option<PageId>,
    option_ids: Vec<OptionId>,
    visible_if: Option<PagePredicate<V>>,
}

impl<V> Default for Page<V> {
    fn default() -> Self {
        Self {
            id: None,
            option_ids: Vec::new(),
            visible_if: None,
        }
    }
}

impl<V> Page<V> {
    /// Create an empty, always visible page that belongs to no menu yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only draw this page when `predicate` holds for the viewer.
    pub fn with_visibility(mut self, predicate: impl Fn(&V, PageId) -> bool + 'static) -> Self {
        self.visible_if = Some(Box::new(predicate));
        self
    }

    /// Replace the visibility predicate.
    pub fn set_visibility(&mut self, predicate: impl Fn(&V, PageId) -> bool + 'static) {
        self.visible_if = Some(Box::new(predicate));
    }

    /// The id assigned by the owning menu, if registered.
    pub fn id(&self) -> Option<PageId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<PageId>) {
        self.id = id;
    }

    /// Referenced options in display order.
    pub fn option_ids(&self) -> &[OptionId] {
        &self.option_ids
    }

    /// Append a reference to an option. Duplicates are allowed, so the page
    /// always changes and this returns true.
    pub fn add_option_id(&mut self, id: OptionId) -> bool {
        self.option_ids.push(id);
        true
    }

    /// Remove the first reference to `id`. Returns whether one was found.
    pub fn remove_option_id(&mut self, id: OptionId) -> bool {
        match self.option_ids.iter().position(|o| *o == id) {
            Some(index) => {
                self.option_ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn prune_option_id(&mut self, id: OptionId) {
        self.option_ids.retain(|o| *o != id);
    }

    /// Drop every option reference. Returns false if there were none.
    pub fn clear(&mut self) -> bool {
        if self.option_ids.is_empty() {
            return false;
        }
        self.option_ids.clear();
        true
    }

    /// Whether this page is drawn for `viewer`.
    pub fn is_visible(&self, viewer: &V) -> bool {
        let id = self.id.unwrap_or(PageId::from_raw(0));
        self.visible_if
            .as_ref()
            .is_none_or(|predicate| predicate(viewer, id))
    }

    /// Draw every visible option of this page, in order.
    ///
    /// Returns `Ok(false)` when the page itself is hidden. A reference that
    /// does not resolve in `options` stops the page with
    /// [`MenuError::OptionNotFound`]; options drawn before it stay drawn.
    pub fn show(
        &self,
        viewer: &mut V,
        options: &HashMap<OptionId, MenuOption<V>>,
    ) -> MenuResult<bool>
    where
        V: RenderBoundary,
    {
        if !self.is_visible(viewer) {
            return Ok(false);
        }

        for id in &self.option_ids {
            let option = options.get(id).ok_or(MenuError::OptionNotFound(*id))?;
            option.show(viewer);
        }

        Ok(true)
    }
}

impl<V> fmt::Debug for Page<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("option_ids", &self.option_ids)
            .field("conditional", &self.visible_if.is_some())
            .finish()
    }
}
