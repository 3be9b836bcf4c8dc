//! Terminal host for the Gossip dialog menu engine.

mod commands;
mod registrar;

use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "gossip",
    about = "Gossip: drive a multi-page dialog menu from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the guild registrar
    Play {
        /// Copper in the patron's purse
        #[arg(short, long, default_value = "500")]
        balance: u64,

        /// Membership fee in copper
        #[arg(short, long, default_value = "100")]
        fee: u64,

        /// Header text id of the starting pages
        #[arg(long, default_value = "2")]
        text_id: u32,

        /// Comma-separated line numbers to pick instead of reading stdin
        #[arg(short, long)]
        script: Option<String>,

        /// Print each frame as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the pages and options of the registrar dialog
    Tree {
        /// Membership fee in copper
        #[arg(short, long, default_value = "100")]
        fee: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let result = match cli.command {
        Commands::Play {
            balance,
            fee,
            text_id,
            script,
            json,
        } => commands::play::run(&commands::play::PlayArgs {
            balance,
            fee,
            text_id,
            script,
            json,
        }),
        Commands::Tree { fee } => commands::tree::run(fee),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
