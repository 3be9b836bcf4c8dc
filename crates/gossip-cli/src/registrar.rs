//! The built-in demonstration dialog: a guild registrar.
//!
//! Strangers can pay a fee to join; members get a services page, may leave
//! for free, and can ask for the guild ledger, which is a delegate line from
//! an externally defined menu.

use gossip_core::{
    DelegateTarget, EconomyBoundary, Icon, Menu, MenuError, MenuOption, MenuResult, Money, Page,
    RecordingViewer, RenderBoundary, RenderedOption, RequesterId, TextId,
};

/// Header shown while browsing the membership page.
pub const MEMBERSHIP_TEXT: TextId = TextId(70);

/// The person talking to the registrar.
#[derive(Debug, Default)]
pub struct Patron {
    screen: RecordingViewer,
    /// Whether the patron has joined the guild.
    pub member: bool,
    notices: Vec<String>,
}

impl Patron {
    /// A non-member carrying `purse`.
    pub fn new(purse: Money) -> Self {
        Self {
            screen: RecordingViewer::with_balance(purse),
            member: false,
            notices: Vec::new(),
        }
    }

    /// What the patron currently sees.
    pub fn screen(&self) -> &RecordingViewer {
        &self.screen
    }

    /// Take the messages produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }
}

impl RenderBoundary for Patron {
    fn clear_render(&mut self) {
        self.screen.clear_render();
    }

    fn close_render(&mut self) {
        self.screen.close_render();
    }

    fn add_rendered_option(&mut self, option: RenderedOption) {
        self.screen.add_rendered_option(option);
    }

    fn commit_render(&mut self, text: TextId, requester: RequesterId) {
        self.screen.commit_render(text, requester);
    }

    fn current_requester(&self) -> Option<RequesterId> {
        self.screen.current_requester()
    }
}

impl EconomyBoundary for Patron {
    fn balance(&self) -> Money {
        self.screen.balance()
    }

    fn try_deduct(&mut self, amount: Money) -> bool {
        self.screen.try_deduct(amount)
    }
}

/// Build the registrar dialog charging `fee` to join.
pub fn registrar(fee: Money, starting_text: TextId) -> MenuResult<Menu<Patron>> {
    let mut menu = Menu::new();
    menu.set_starting_text(starting_text);

    let back = menu.add_option(MenuOption::icon_text(Icon::Interact1, "Go back.", |_, _| {}));

    let services = menu.adopt_page(Page::new().with_visibility(|patron: &Patron, _| patron.member));
    let join_prompt =
        menu.adopt_page(Page::new().with_visibility(|patron: &Patron, _| !patron.member));
    let membership = menu.add_page();
    let farewell = menu.add_page();

    menu.add_option_to_page(
        services,
        MenuOption::delegate(DelegateTarget::new(57, 0), |patron: &mut Patron, _| {
            patron.notify("The registrar opens the guild ledger.")
        }),
    )?;
    menu.add_option_to_page(
        services,
        MenuOption::popup(
            Icon::Tabard,
            "Leave the guild.",
            "Are you sure you want to leave?",
            Money::ZERO,
            |patron: &mut Patron, paid, _| {
                if paid {
                    patron.member = false;
                    patron.notify("You are no longer a member.");
                }
            },
        ),
    )?;

    menu.add_option_to_page(
        join_prompt,
        MenuOption::icon_text(Icon::Talk, "I would like to join.", |_, _| {})
            .with_next_pages([membership])
            .with_next_text(MEMBERSHIP_TEXT),
    )?;

    menu.add_option_to_page(
        membership,
        MenuOption::popup(
            Icon::Tabard,
            "Sign the charter.",
            "Are you sure you want to join?",
            fee,
            move |patron: &mut Patron, paid, _| {
                if paid {
                    patron.member = true;
                    patron.notify(format!("Welcome to the guild. You paid {fee}."));
                } else {
                    patron.notify(format!("Joining costs {fee}."));
                }
            },
        ),
    )?;
    menu.page_mut(membership)
        .ok_or(MenuError::PageNotFound(membership))?
        .add_option_id(back);

    menu.add_option_to_page(
        farewell,
        MenuOption::icon_text(Icon::Chat, "Goodbye.", |patron: &mut Patron, _| {
            patron.notify("The registrar nods.")
        })
        .with_close_on_select(true),
    )?;

    menu.set_starting_pages([services, join_prompt, farewell]);
    Ok(menu)
}
