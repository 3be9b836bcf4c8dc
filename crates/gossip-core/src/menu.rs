use std::collections::HashMap;

use tracing::{debug, warn};

use crate::boundary::{RenderBoundary, Viewer};
use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::id::{IdCounter, OptionId, PageId, RequesterId, TextId};
use crate::option::{MenuOption, NextStep};
use crate::page::Page;

/// A dialog tree: the registry of pages and options plus the show/select
/// protocol that drives a viewer through them.
///
/// Ids are handed out from two counters starting at 1 and are never reused,
/// even after removal, so callbacks holding an id stay unambiguous for the
/// lifetime of the menu. The menu keeps no per-viewer state; every show is a
/// full re-render.
pub struct Menu<V> {
    config: MenuConfig,
    pages: HashMap<PageId, Page<V>>,
    options: HashMap<OptionId, MenuOption<V>>,
    starting_pages: Vec<PageId>,
    page_ids: IdCounter,
    option_ids: IdCounter,
}

impl<V> Default for Menu<V> {
    fn default() -> Self {
        Self::with_config(MenuConfig::default())
    }
}

impl<V> Menu<V> {
    /// Create an empty menu with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty menu.
    pub fn with_config(config: MenuConfig) -> Self {
        Self {
            config,
            pages: HashMap::new(),
            options: HashMap::new(),
            starting_pages: Vec::new(),
            page_ids: IdCounter::default(),
            option_ids: IdCounter::default(),
        }
    }

    /// The menu's configuration.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Header used when a show call does not name one.
    pub fn starting_text(&self) -> TextId {
        self.config.starting_text
    }

    /// Change the default header.
    pub fn set_starting_text(&mut self, text: TextId) {
        self.config.starting_text = text;
    }

    /// Pages shown when the dialog is first opened, in order.
    pub fn starting_pages(&self) -> &[PageId] {
        &self.starting_pages
    }

    /// Replace the pages shown when the dialog is first opened.
    pub fn set_starting_pages(&mut self, pages: impl IntoIterator<Item = PageId>) {
        self.starting_pages = pages.into_iter().collect();
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Create and register an empty page.
    pub fn add_page(&mut self) -> PageId {
        self.adopt_page(Page::new())
    }

    /// Register a page built elsewhere. The page gets a fresh id from this
    /// menu; its option references are kept as they are.
    pub fn adopt_page(&mut self, mut page: Page<V>) -> PageId {
        let id = PageId::from_raw(self.page_ids.allocate());
        page.set_id(Some(id));
        self.pages.insert(id, page);
        debug!(page = %id, "page registered");
        id
    }

    /// Look up a page.
    pub fn page(&self, id: PageId) -> Option<&Page<V>> {
        self.pages.get(&id)
    }

    /// Look up a page for editing.
    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page<V>> {
        self.pages.get_mut(&id)
    }

    /// Unregister a page and hand it back to the caller.
    pub fn remove_page(&mut self, id: PageId) -> Option<Page<V>> {
        let mut page = self.pages.remove(&id)?;
        page.set_id(None);
        debug!(page = %id, "page removed");
        Some(page)
    }

    /// Unregister and drop a page. Returns false if it was not registered.
    pub fn delete_page(&mut self, id: PageId) -> bool {
        self.remove_page(id).is_some()
    }

    /// Move a page from this menu into `target`, returning its new id there.
    ///
    /// The page arrives empty: its option ids only resolve in this menu, so
    /// they are dropped on the way. The options themselves stay here.
    pub fn transfer_page(&mut self, id: PageId, target: &mut Menu<V>) -> Option<PageId> {
        let mut page = self.remove_page(id)?;
        page.clear();
        Some(target.adopt_page(page))
    }

    /// All registered pages, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &Page<V>> {
        self.pages.values()
    }

    /// Number of registered pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The id the next registered page will get.
    pub fn next_page_id(&self) -> PageId {
        PageId::from_raw(self.page_ids.peek())
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    /// Register an option, giving it a fresh id from this menu.
    pub fn add_option(&mut self, mut option: MenuOption<V>) -> OptionId {
        let id = OptionId::from_raw(self.option_ids.allocate());
        option.set_id(Some(id));
        self.options.insert(id, option);
        debug!(option = %id, "option registered");
        id
    }

    /// Register an option and append it to a page.
    ///
    /// Nothing is registered when the page does not exist.
    pub fn add_option_to_page(
        &mut self,
        page: PageId,
        option: MenuOption<V>,
    ) -> MenuResult<OptionId> {
        if !self.pages.contains_key(&page) {
            return Err(MenuError::PageNotFound(page));
        }
        let id = self.add_option(option);
        if let Some(page) = self.pages.get_mut(&page) {
            page.add_option_id(id);
        }
        Ok(id)
    }

    /// Look up an option.
    pub fn option(&self, id: OptionId) -> Option<&MenuOption<V>> {
        self.options.get(&id)
    }

    /// Look up an option for editing.
    pub fn option_mut(&mut self, id: OptionId) -> Option<&mut MenuOption<V>> {
        self.options.get_mut(&id)
    }

    /// Unregister an option, drop every page reference to it and hand it back
    /// to the caller.
    pub fn remove_option(&mut self, id: OptionId) -> Option<MenuOption<V>> {
        for page in self.pages.values_mut() {
            page.prune_option_id(id);
        }
        let mut option = self.options.remove(&id)?;
        option.set_id(None);
        debug!(option = %id, "option removed");
        Some(option)
    }

    /// Unregister and drop an option. Returns false if it was not registered.
    pub fn delete_option(&mut self, id: OptionId) -> bool {
        self.remove_option(id).is_some()
    }

    /// Move an option from this menu into `target`, returning its new id
    /// there. Pages of this menu lose their references to it, and its
    /// `next_pages` are dropped since they name pages of this menu.
    pub fn transfer_option(&mut self, id: OptionId, target: &mut Menu<V>) -> Option<OptionId> {
        let mut option = self.remove_option(id)?;
        option.navigation_mut().next_pages.clear();
        Some(target.add_option(option))
    }

    /// All registered options, in no particular order.
    pub fn options(&self) -> impl Iterator<Item = &MenuOption<V>> {
        self.options.values()
    }

    /// Number of registered options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// The id the next registered option will get.
    pub fn next_option_id(&self) -> OptionId {
        OptionId::from_raw(self.option_ids.peek())
    }

    // -----------------------------------------------------------------------
    // Bulk
    // -----------------------------------------------------------------------

    /// Unregister everything and hand it back to the caller, pages and
    /// options each in id order. Id counters keep running.
    pub fn clear(&mut self) -> (Vec<Page<V>>, Vec<MenuOption<V>>) {
        let mut pages: Vec<_> = self.pages.drain().collect();
        pages.sort_by_key(|(id, _)| *id);
        let mut options: Vec<_> = self.options.drain().collect();
        options.sort_by_key(|(id, _)| *id);

        let pages = pages
            .into_iter()
            .map(|(_, mut page)| {
                page.set_id(None);
                page
            })
            .collect();
        let options = options
            .into_iter()
            .map(|(_, mut option)| {
                option.set_id(None);
                option
            })
            .collect();
        (pages, options)
    }

    /// Unregister and drop everything. Returns false if the menu was
    /// already empty.
    pub fn clear_and_delete(&mut self) -> bool {
        if self.pages.is_empty() && self.options.is_empty() {
            return false;
        }
        self.pages.clear();
        self.options.clear();
        true
    }
}

impl<V: RenderBoundary> Menu<V> {
    /// Open the dialog on the starting pages under the starting text.
    pub fn start(&self, viewer: &mut V, requester: RequesterId) -> MenuResult<()> {
        self.show_pages(viewer, Some(requester), None, &self.starting_pages)
    }

    /// Re-show the starting pages for the requester the viewer is already
    /// talking to.
    pub fn show_starting_pages(&self, viewer: &mut V) -> MenuResult<()> {
        self.show_pages(viewer, None, None, &self.starting_pages)
    }

    /// Replace whatever the viewer sees with `pages`.
    ///
    /// A missing requester falls back to the one of the viewer's current
    /// frame, a missing text to the starting text. The previous frame is
    /// always cleared and closed first, so an unregistered page id leaves the
    /// dialog closed and nothing is committed.
    pub fn show_pages(
        &self,
        viewer: &mut V,
        requester: Option<RequesterId>,
        text: Option<TextId>,
        pages: &[PageId],
    ) -> MenuResult<()> {
        let requester = requester
            .or_else(|| viewer.current_requester())
            .unwrap_or_else(RequesterId::nil);
        let text = text.unwrap_or(self.config.starting_text);

        viewer.clear_render();
        viewer.close_render();

        for id in pages {
            let Some(page) = self.pages.get(id) else {
                warn!(page = %id, "cannot show unregistered page");
                return Err(MenuError::PageNotFound(*id));
            };
            match page.show(viewer, &self.options) {
                Ok(true) => {}
                Ok(false) => debug!(page = %id, "page hidden"),
                Err(err) => warn!(page = %id, error = %err, "page stopped at a dangling reference"),
            }
        }

        viewer.commit_render(text, requester);
        debug!(text = %text, requester = %requester, pages = pages.len(), "menu shown");
        Ok(())
    }

    /// Close the dialog.
    pub fn close(&self, viewer: &mut V) {
        viewer.close_render();
    }
}

impl<V: Viewer> Menu<V> {
    /// Handle the viewer picking an option.
    ///
    /// Runs the option's own behavior, then navigates: closing wins over any
    /// page transition, explicit next pages win over a header change, which
    /// wins over a restart. The option's after-select callback runs last. A
    /// transition into an unregistered page is logged and does not fail the
    /// selection.
    pub fn select_option(&mut self, viewer: &mut V, id: OptionId) -> MenuResult<()> {
        viewer.clear_render();

        let Some(option) = self.options.get_mut(&id) else {
            warn!(option = %id, "selected option is not registered");
            return Err(MenuError::OptionNotFound(id));
        };
        debug!(option = %id, "option selected");
        let step = option.select(viewer);

        self.follow(viewer, step);

        if let Some(option) = self.options.get_mut(&id) {
            option.run_after_select(viewer);
        }
        Ok(())
    }

    fn follow(&self, viewer: &mut V, step: NextStep) {
        let shown = match step {
            NextStep::Close => {
                viewer.clear_render();
                viewer.close_render();
                Ok(())
            }
            NextStep::Show { text, pages } => self.show_pages(viewer, None, text, &pages),
            NextStep::ShowStarting { text } => {
                self.show_pages(viewer, None, text, &self.starting_pages)
            }
            NextStep::Stay => Ok(()),
        };
        if let Err(err) = shown {
            warn!(error = %err, "transition after selection failed");
        }
    }
}

impl<V> std::fmt::Debug for Menu<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("config", &self.config)
            .field("starting_pages", &self.starting_pages)
            .field("pages", &self.pages.len())
            .field("options", &self.options.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::boundary::{EconomyBoundary, RenderedLine};
    use crate::icon::Icon;
    use crate::money::Money;
    use crate::recording::{RecordingViewer, RenderEvent};

    type TestMenu = Menu<RecordingViewer>;

    fn plain(text: &str) -> MenuOption<RecordingViewer> {
        MenuOption::icon_text(Icon::Chat, text, |_, _| {})
    }

    fn frame_texts(viewer: &RecordingViewer) -> Vec<String> {
        viewer
            .frame()
            .map(|frame| {
                frame
                    .lines
                    .iter()
                    .filter_map(|l| l.line.text().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn hello_restart_scenario() {
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);

        let mut menu = TestMenu::new();
        let p1 = menu.add_page();
        let o1 = menu
            .add_option_to_page(
                p1,
                MenuOption::icon_text(Icon::Chat, "Hello", move |_, _| *counter.borrow_mut() += 1)
                    .with_restart_on_select(true),
            )
            .unwrap();
        menu.set_starting_pages([p1]);

        let who = RequesterId::new();
        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, who).unwrap();

        let frame = viewer.frame().unwrap();
        assert_eq!(frame.text, TextId(2));
        assert_eq!(frame.requester, who);
        assert_eq!(frame_texts(&viewer), vec!["Hello"]);

        viewer.clear_events();
        menu.select_option(&mut viewer, o1).unwrap();

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(viewer.events()[0], RenderEvent::Clear);
        assert_eq!(viewer.commit_count(), 1);
        assert_eq!(frame_texts(&viewer), vec!["Hello"]);
        assert_eq!(viewer.frame().unwrap().requester, who);
    }

    #[test]
    fn pages_render_in_requested_order() {
        let mut menu = TestMenu::new();
        let first = menu.add_page();
        let second = menu.add_page();
        menu.add_option_to_page(first, plain("A")).unwrap();
        menu.add_option_to_page(first, plain("B")).unwrap();
        menu.add_option_to_page(second, plain("C")).unwrap();

        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[second, first])
            .unwrap();

        assert_eq!(frame_texts(&viewer), vec!["C", "A", "B"]);
    }

    #[test]
    fn option_shared_between_pages() {
        let mut menu = TestMenu::new();
        let first = menu.add_page();
        let second = menu.add_page();
        let back = menu.add_option(plain("Back"));
        menu.page_mut(first).unwrap().add_option_id(back);
        menu.page_mut(second).unwrap().add_option_id(back);

        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[first, second])
            .unwrap();

        assert_eq!(frame_texts(&viewer), vec!["Back", "Back"]);
    }

    #[test]
    fn dangling_page_never_commits() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        menu.add_option_to_page(page, plain("A")).unwrap();
        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[page]).unwrap();
        viewer.clear_events();

        let missing = PageId::from_raw(99);
        let result = menu.show_pages(&mut viewer, None, None, &[page, missing]);

        assert_eq!(result, Err(MenuError::PageNotFound(missing)));
        assert_eq!(viewer.commit_count(), 0);
        assert!(!viewer.is_open());
    }

    #[test]
    fn dangling_option_is_skipped_but_frame_commits() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        menu.add_option_to_page(page, plain("Kept")).unwrap();
        menu.page_mut(page)
            .unwrap()
            .add_option_id(OptionId::from_raw(42));
        let other = menu.add_page();
        menu.add_option_to_page(other, plain("Other")).unwrap();

        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[page, other])
            .unwrap();

        assert_eq!(frame_texts(&viewer), vec!["Kept", "Other"]);
    }

    #[test]
    fn hidden_page_skips_its_options() {
        let mut menu = TestMenu::new();
        let hidden = menu.adopt_page(Page::new().with_visibility(|_: &RecordingViewer, _| false));
        menu.add_option_to_page(hidden, plain("Nope")).unwrap();
        let shown = menu.add_page();
        menu.add_option_to_page(shown, plain("Yes")).unwrap();

        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[hidden, shown])
            .unwrap();

        assert_eq!(frame_texts(&viewer), vec!["Yes"]);
    }

    #[test]
    fn page_predicate_sees_viewer() {
        let mut menu = TestMenu::new();
        let page = menu.adopt_page(
            Page::new()
                .with_visibility(|viewer: &RecordingViewer, _| viewer.balance() > Money::ZERO),
        );
        menu.add_option_to_page(page, plain("Paying customers")).unwrap();

        let mut broke = RecordingViewer::new();
        menu.show_pages(&mut broke, None, None, &[page]).unwrap();
        assert!(frame_texts(&broke).is_empty());

        let mut rich = RecordingViewer::with_balance(Money(1));
        menu.show_pages(&mut rich, None, None, &[page]).unwrap();
        assert_eq!(frame_texts(&rich), vec!["Paying customers"]);
    }

    #[test]
    fn explicit_text_is_committed() {
        let mut menu = TestMenu::with_config(MenuConfig::default().with_starting_text(TextId(5)));
        let page = menu.add_page();
        let mut viewer = RecordingViewer::new();

        menu.show_pages(&mut viewer, None, Some(TextId(77)), &[page])
            .unwrap();
        assert_eq!(viewer.frame().unwrap().text, TextId(77));

        menu.show_pages(&mut viewer, None, None, &[page]).unwrap();
        assert_eq!(viewer.frame().unwrap().text, TextId(5));
    }

    #[test]
    fn next_pages_beat_restart() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let detail = menu.add_page();
        menu.add_option_to_page(detail, plain("Detail")).unwrap();
        let go = menu
            .add_option_to_page(
                start,
                plain("Go")
                    .with_next_pages([detail])
                    .with_restart_on_select(true),
            )
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        menu.select_option(&mut viewer, go).unwrap();

        assert_eq!(frame_texts(&viewer), vec!["Detail"]);
    }

    #[test]
    fn next_pages_use_next_text() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let detail = menu.add_page();
        let go = menu
            .add_option_to_page(
                start,
                plain("Go")
                    .with_next_pages([detail])
                    .with_next_text(TextId(30)),
            )
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        menu.select_option(&mut viewer, go).unwrap();

        assert_eq!(viewer.frame().unwrap().text, TextId(30));
    }

    #[test]
    fn next_text_alone_reshows_start_under_new_header() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let option = menu
            .add_option_to_page(start, plain("Again").with_next_text(TextId(12)))
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        menu.select_option(&mut viewer, option).unwrap();

        let frame = viewer.frame().unwrap();
        assert_eq!(frame.text, TextId(12));
        assert_eq!(frame_texts(&viewer), vec!["Again"]);
    }

    #[test]
    fn no_navigation_leaves_dialog_cleared() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let option = menu
            .add_option_to_page(start, plain("Quiet").with_restart_on_select(false))
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        viewer.clear_events();
        menu.select_option(&mut viewer, option).unwrap();

        assert_eq!(viewer.events(), &[RenderEvent::Clear]);
    }

    #[test]
    fn close_wins_over_transition() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let detail = menu.add_page();
        let option = menu
            .add_option_to_page(
                start,
                plain("Bye")
                    .with_next_pages([detail])
                    .with_close_on_select(true),
            )
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        viewer.clear_events();
        menu.select_option(&mut viewer, option).unwrap();

        assert!(!viewer.is_open());
        assert_eq!(viewer.commit_count(), 0);
        assert_eq!(viewer.events().last(), Some(&RenderEvent::Close));
    }

    #[test]
    fn callbacks_bracket_navigation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let before = Rc::clone(&log);
        let after = Rc::clone(&log);

        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let option = menu
            .add_option_to_page(
                start,
                MenuOption::icon_text(Icon::Chat, "Go", move |viewer: &mut RecordingViewer, _| {
                    before.borrow_mut().push(("select", viewer.commit_count()))
                })
                .with_after_select(move |viewer: &mut RecordingViewer, _| {
                    after.borrow_mut().push(("after", viewer.commit_count()))
                }),
            )
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        menu.select_option(&mut viewer, option).unwrap();

        assert_eq!(*log.borrow(), vec![("select", 1), ("after", 2)]);
    }

    #[test]
    fn after_select_runs_when_transition_fails() {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);

        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let option = menu
            .add_option_to_page(
                start,
                plain("Broken")
                    .with_next_pages([PageId::from_raw(500)])
                    .with_after_select(move |_, _| *flag.borrow_mut() = true),
            )
            .unwrap();

        let mut viewer = RecordingViewer::new();
        assert!(menu.select_option(&mut viewer, option).is_ok());
        assert!(*ran.borrow());
    }

    #[test]
    fn popup_selection_reports_payment() {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);

        let mut menu = TestMenu::new();
        let start = menu.add_page();
        let buy = menu
            .add_option_to_page(
                start,
                MenuOption::popup(
                    Icon::Tabard,
                    "Register",
                    "Are you sure you want to register?",
                    Money::from_gold_silver_copper(1, 0, 0),
                    move |_, paid, _| sink.borrow_mut().push(paid),
                ),
            )
            .unwrap();
        menu.set_starting_pages([start]);

        let mut viewer = RecordingViewer::with_balance(Money(15_000));
        menu.start(&mut viewer, RequesterId::new()).unwrap();
        menu.select_option(&mut viewer, buy).unwrap();
        menu.select_option(&mut viewer, buy).unwrap();

        assert_eq!(*results.borrow(), vec![true, false]);
        assert_eq!(viewer.balance(), Money(5_000));
        assert_eq!(frame_texts(&viewer), vec!["Register"]);
    }

    #[test]
    fn popup_line_carries_cost() {
        let mut menu = TestMenu::new();
        let start = menu.add_page();
        menu.add_option_to_page(
            start,
            MenuOption::popup(Icon::MoneyBag, "Pay", "Sure?", Money(250), |_, _, _| {})
                .with_text_entry(),
        )
        .unwrap();

        let mut viewer = RecordingViewer::new();
        menu.show_pages(&mut viewer, None, None, &[start]).unwrap();

        let line = &viewer.frame().unwrap().lines[0].line;
        assert_eq!(
            line,
            &RenderedLine::Popup {
                icon: Icon::MoneyBag,
                text: "Pay".to_string(),
                popup_text: "Sure?".to_string(),
                cost: Money(250),
                requires_text_entry: true,
            }
        );
    }

    #[test]
    fn unknown_option_selection_fails() {
        let mut menu = TestMenu::new();
        let mut viewer = RecordingViewer::new();

        let missing = OptionId::from_raw(3);
        assert_eq!(
            menu.select_option(&mut viewer, missing),
            Err(MenuError::OptionNotFound(missing))
        );
        assert_eq!(viewer.events(), &[RenderEvent::Clear]);
    }

    #[test]
    fn requester_falls_back_to_current_frame() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        let who = RequesterId::new();
        let mut viewer = RecordingViewer::new();

        menu.show_pages(&mut viewer, None, None, &[page]).unwrap();
        assert_eq!(viewer.frame().unwrap().requester, RequesterId::nil());

        menu.show_pages(&mut viewer, Some(who), None, &[page])
            .unwrap();
        menu.show_starting_pages(&mut viewer).unwrap();
        assert_eq!(viewer.frame().unwrap().requester, who);
    }

    #[test]
    fn close_always_closes() {
        let menu = TestMenu::new();
        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();

        menu.close(&mut viewer);
        menu.close(&mut viewer);

        assert!(!viewer.is_open());
    }

    #[test]
    fn ids_start_at_one_per_kind() {
        let mut menu = TestMenu::new();
        assert_eq!(menu.next_page_id(), PageId::from_raw(1));
        assert_eq!(menu.next_option_id(), OptionId::from_raw(1));

        assert_eq!(menu.add_page(), PageId::from_raw(1));
        assert_eq!(menu.add_option(plain("a")), OptionId::from_raw(1));
        assert_eq!(menu.add_page(), PageId::from_raw(2));
        assert_eq!(menu.add_option(plain("b")), OptionId::from_raw(2));
    }

    #[test]
    fn registered_items_know_their_ids() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        let option = menu.add_option(plain("a"));

        assert_eq!(menu.page(page).unwrap().id(), Some(page));
        assert_eq!(menu.option(option).unwrap().id(), Some(option));
    }

    #[test]
    fn add_option_to_missing_page_registers_nothing() {
        let mut menu = TestMenu::new();
        let missing = PageId::from_raw(8);

        assert_eq!(
            menu.add_option_to_page(missing, plain("x")),
            Err(MenuError::PageNotFound(missing))
        );
        assert_eq!(menu.option_count(), 0);
        assert_eq!(menu.next_option_id(), OptionId::from_raw(1));
    }

    #[test]
    fn removing_option_prunes_every_page() {
        let mut menu = TestMenu::new();
        let first = menu.add_page();
        let second = menu.add_page();
        let shared = menu.add_option_to_page(first, plain("Shared")).unwrap();
        let own = menu.add_option_to_page(second, plain("Own")).unwrap();
        menu.page_mut(second).unwrap().add_option_id(shared);

        let removed = menu.remove_option(shared).unwrap();

        assert_eq!(removed.id(), None);
        assert!(menu.page(first).unwrap().option_ids().is_empty());
        assert_eq!(menu.page(second).unwrap().option_ids(), &[own]);
        assert!(!menu.delete_option(shared));
    }

    #[test]
    fn delete_page_reports_presence() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();

        assert!(menu.delete_page(page));
        assert!(!menu.delete_page(page));
        assert!(menu.page(page).is_none());
    }

    #[test]
    fn transfer_option_detaches_from_source() {
        let mut source = TestMenu::new();
        let mut target = TestMenu::new();
        let page = source.add_page();
        let moved = source.add_option_to_page(page, plain("Moving")).unwrap();
        target.add_option(plain("Existing"));

        let new_id = source.transfer_option(moved, &mut target).unwrap();

        assert_eq!(new_id, OptionId::from_raw(2));
        assert!(source.option(moved).is_none());
        assert!(source.page(page).unwrap().option_ids().is_empty());
        assert_eq!(target.option(new_id).unwrap().id(), Some(new_id));
    }

    #[test]
    fn transfer_page_reidentifies() {
        let mut source = TestMenu::new();
        let mut target = TestMenu::new();
        target.add_page();
        target.add_page();
        let page = source.add_page();

        let new_id = source.transfer_page(page, &mut target).unwrap();

        assert_eq!(new_id, PageId::from_raw(3));
        assert_eq!(source.page_count(), 0);
        assert_eq!(target.page(new_id).unwrap().id(), Some(new_id));
        assert!(source.transfer_page(page, &mut target).is_none());
    }

    #[test]
    fn transferred_page_drops_foreign_option_refs() {
        let mut source = TestMenu::new();
        let mut target = TestMenu::new();
        let page = source.add_page();
        source.add_option_to_page(page, plain("Source line")).unwrap();
        target.add_option(plain("Unrelated target line"));

        let moved = source.transfer_page(page, &mut target).unwrap();

        assert!(target.page(moved).unwrap().option_ids().is_empty());
        assert_eq!(source.option_count(), 1);

        let mut viewer = RecordingViewer::new();
        target.show_pages(&mut viewer, None, None, &[moved]).unwrap();
        assert!(frame_texts(&viewer).is_empty());
    }

    #[test]
    fn transferred_option_drops_foreign_next_pages() {
        let mut source = TestMenu::new();
        let mut target = TestMenu::new();
        let next = source.add_page();
        let id = source.add_option(
            plain("Onward")
                .with_next_pages([next])
                .with_next_text(TextId(9)),
        );

        let moved = source.transfer_option(id, &mut target).unwrap();

        let navigation = target.option(moved).unwrap().navigation();
        assert!(navigation.next_pages.is_empty());
        assert_eq!(
            navigation.next_step(),
            NextStep::ShowStarting {
                text: Some(TextId(9))
            }
        );
    }

    #[test]
    fn registered_option_can_be_retargeted() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        let id = menu.add_option_to_page(page, plain("Leave")).unwrap();
        menu.set_starting_pages([page]);
        let mut viewer = RecordingViewer::new();
        menu.start(&mut viewer, RequesterId::new()).unwrap();

        menu.option_mut(id).unwrap().navigation_mut().close_on_select = true;
        menu.select_option(&mut viewer, id).unwrap();

        assert!(!viewer.is_open());
    }

    #[test]
    fn registered_page_visibility_can_change() {
        let mut menu = TestMenu::new();
        let page = menu.add_page();
        menu.add_option_to_page(page, plain("Secret")).unwrap();
        let mut viewer = RecordingViewer::new();

        menu.page_mut(page)
            .unwrap()
            .set_visibility(|viewer: &RecordingViewer, _| viewer.balance() > Money::ZERO);
        menu.show_pages(&mut viewer, None, None, &[page]).unwrap();
        assert!(frame_texts(&viewer).is_empty());

        viewer.deposit(Money(1));
        menu.show_pages(&mut viewer, None, None, &[page]).unwrap();
        assert_eq!(frame_texts(&viewer), vec!["Secret"]);
    }

    #[test]
    fn clear_hands_back_contents_in_id_order() {
        let mut menu = TestMenu::new();
        menu.add_page();
        menu.add_page();
        menu.add_option(plain("first"));
        menu.add_option(plain("second"));

        let (pages, options) = menu.clear();

        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.id().is_none()));
        let texts: Vec<_> = options
            .iter()
            .filter_map(|o| o.line().text().map(str::to_string))
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(menu.page_count(), 0);
        assert_eq!(menu.add_page(), PageId::from_raw(3));
    }

    #[test]
    fn clear_and_delete_reports_change() {
        let mut menu = TestMenu::new();
        assert!(!menu.clear_and_delete());

        menu.add_option(plain("x"));
        assert!(menu.clear_and_delete());
        assert_eq!(menu.option_count(), 0);
        assert!(!menu.clear_and_delete());
        assert_eq!(menu.add_option(plain("y")), OptionId::from_raw(2));
    }

    proptest! {
        #[test]
        fn ids_are_sequential_and_never_reused(
            adds in proptest::collection::vec(any::<bool>(), 1..40),
            removals in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut menu = TestMenu::new();
            let mut pages = Vec::new();
            let mut options = Vec::new();
            for add_page in &adds {
                if *add_page {
                    pages.push(menu.add_page());
                } else {
                    options.push(menu.add_option(plain("x")));
                }
            }

            let page_raw: Vec<u32> = pages.iter().map(|p| p.get()).collect();
            let option_raw: Vec<u32> = options.iter().map(|o| o.get()).collect();
            prop_assert_eq!(page_raw, (1..=pages.len() as u32).collect::<Vec<_>>());
            prop_assert_eq!(option_raw, (1..=options.len() as u32).collect::<Vec<_>>());

            for index in &removals {
                if !pages.is_empty() {
                    menu.delete_page(pages[index.index(pages.len())]);
                }
                if !options.is_empty() {
                    menu.delete_option(options[index.index(options.len())]);
                }
            }

            prop_assert_eq!(menu.add_page().get(), pages.len() as u32 + 1);
            prop_assert_eq!(menu.add_option(plain("y")).get(), options.len() as u32 + 1);
        }
    }
}
