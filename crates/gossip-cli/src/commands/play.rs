use std::io::{self, BufRead, Write};

use colored::Colorize;
use gossip_core::{EconomyBoundary, Menu, Money, RequesterId, TextId};

use crate::registrar::{Patron, registrar};

/// Settings for one registrar conversation.
pub struct PlayArgs {
    pub balance: u64,
    pub fee: u64,
    pub text_id: u32,
    pub script: Option<String>,
    pub json: bool,
}

pub fn run(args: &PlayArgs) -> Result<(), String> {
    let mut menu = registrar(Money(args.fee), TextId(args.text_id))
        .map_err(|e| format!("failed to build menu: {e}"))?;
    let mut patron = Patron::new(Money(args.balance));

    menu.start(&mut patron, RequesterId::new())
        .map_err(|e| format!("failed to open dialog: {e}"))?;
    print_frame(&patron, args.json)?;

    match &args.script {
        Some(script) => {
            for pick in parse_script(script)? {
                if !patron.screen().is_open() {
                    break;
                }
                choose(&mut menu, &mut patron, pick)?;
                print_notices(&mut patron, args.json);
                print_frame(&patron, args.json)?;
            }
            Ok(())
        }
        None => interactive(&mut menu, &mut patron, args.json),
    }
}

fn interactive(menu: &mut Menu<Patron>, patron: &mut Patron, json: bool) -> Result<(), String> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    while patron.screen().is_open() {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            menu.close(patron);
            break;
        }

        let picked = input
            .parse::<usize>()
            .map_err(|_| format!("'{input}' is not a line number"))
            .and_then(|pick| choose(menu, patron, pick));
        match picked {
            Ok(()) => {
                print_notices(patron, json);
                print_frame(patron, json)?;
            }
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    Ok(())
}

fn parse_script(script: &str) -> Result<Vec<usize>, String> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("'{s}' is not a line number"))
        })
        .collect()
}

/// Select the `pick`-th line (1-based) of the frame on screen.
fn choose(menu: &mut Menu<Patron>, patron: &mut Patron, pick: usize) -> Result<(), String> {
    let id = patron
        .screen()
        .frame()
        .and_then(|frame| frame.lines.get(pick.checked_sub(1)?))
        .map(|line| line.option_id)
        .ok_or_else(|| format!("there is no line {pick}"))?;

    menu.select_option(patron, id)
        .map_err(|e| format!("selection failed: {e}"))
}

fn print_notices(patron: &mut Patron, json: bool) {
    for notice in patron.drain_notices() {
        if json {
            eprintln!("{notice}");
        } else {
            println!("  {}", notice.italic());
        }
    }
}

fn print_frame(patron: &Patron, json: bool) -> Result<(), String> {
    let frame = patron.screen().frame();

    if json {
        let out = serde_json::to_string(&frame).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    let Some(frame) = frame else {
        println!("  {}", "The dialog closes.".dimmed());
        return Ok(());
    };

    println!();
    println!(
        "  {} {} | Purse: {}",
        "Registrar".bold(),
        frame.text,
        patron.balance()
    );
    for (index, line) in frame.lines.iter().enumerate() {
        println!("  {} {}", format!("{}.", index + 1).bold(), super::describe(&line.line));
    }
    println!();

    Ok(())
}
