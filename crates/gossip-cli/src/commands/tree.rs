use comfy_table::{ContentArrangement, Table};
use gossip_core::{Money, Navigation, NextStep, TextId};

use crate::registrar::{Patron, registrar};

pub fn run(fee: u64) -> Result<(), String> {
    let menu = registrar(Money(fee), TextId::GREETING)
        .map_err(|e| format!("failed to build menu: {e}"))?;

    let stranger = Patron::new(Money::ZERO);
    let mut member = Patron::new(Money::ZERO);
    member.member = true;

    let mut pages: Vec<_> = menu.pages().collect();
    pages.sort_by_key(|page| page.id());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Page", "Starting", "Strangers", "Members", "Options"]);

    for page in &pages {
        let id = page
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let starting = page
            .id()
            .is_some_and(|id| menu.starting_pages().contains(&id));
        let options = page
            .option_ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            id,
            yes_no(starting),
            yes_no(page.is_visible(&stranger)),
            yes_no(page.is_visible(&member)),
            options,
        ]);
    }

    println!("{table}");
    println!();

    let mut options: Vec<_> = menu.options().collect();
    options.sort_by_key(|option| option.id());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Option", "Icon", "Line", "Then"]);

    for option in &options {
        let id = option
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = option.line();
        let icon = line
            .icon()
            .map(|icon| icon.code().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            id,
            icon,
            super::describe(&line),
            then(option.navigation()),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} pages, {} options", menu.page_count(), menu.option_count());

    Ok(())
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// What the dialog does after the option is picked.
fn then(navigation: &Navigation) -> String {
    match navigation.next_step() {
        NextStep::Close => "close".to_string(),
        NextStep::Show { text, pages } => {
            let pages = pages
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            match text {
                Some(text) => format!("show {pages} with {text}"),
                None => format!("show {pages}"),
            }
        }
        NextStep::ShowStarting { text: Some(text) } => format!("restart with {text}"),
        NextStep::ShowStarting { text: None } => "restart".to_string(),
        NextStep::Stay => "stay".to_string(),
    }
}
