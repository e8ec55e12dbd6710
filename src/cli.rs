use std::ffi::OsString;
use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use crate::checker;
use crate::config::Config;
use crate::editor::Editor;
use crate::fetcher::HttpFetcher;
use crate::notifier::TwilioNotifier;
use crate::store::CatalogStore;

#[derive(Parser, Debug)]
#[command(
    name = "price_tracker",
    about = "Watch product pages for price changes and text a summary"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// choose products to stop tracking
    Remove,
    /// add product to start tracking
    Add,
    /// change product options
    Edit,
    /// displays product information to stdout
    Show,
    /// gets current price and sends text if requirements met
    Run,
    /// gets current price and sends text
    ForceText,
}

/// `None` means "print usage": help requested, nothing given, or anything unrecognised.
fn command_from<I, T>(args: I) -> Option<Command>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).ok().and_then(|cli| cli.command)
}

fn print_usage() -> Result<()> {
    Cli::command().print_help()?;
    println!();
    Ok(())
}

/// Usage never depends on configuration; it is only loaded for real commands.
pub fn run_cli() -> Result<()> {
    let Some(command) = command_from(std::env::args_os()) else {
        return print_usage();
    };
    let config = Config::load().context("failed to load configuration")?;

    let store = CatalogStore::new(&config.products_file);
    let stdin = io::stdin();
    let mut editor = Editor::new(&store, stdin.lock(), io::stdout());

    match command {
        Command::Add => {
            editor.add()?;
        }
        Command::Remove => {
            editor.remove()?;
        }
        Command::Edit => {
            editor.edit()?;
        }
        Command::Show => editor.show()?,
        Command::Run => check(&config, &store, false)?,
        Command::ForceText => check(&config, &store, true)?,
    }
    Ok(())
}

fn check(config: &Config, store: &CatalogStore, force: bool) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout())?;
    let notifier = TwilioNotifier::new(config.twilio.clone(), config.request_timeout())?;

    let outcome = checker::run(store, &fetcher, &notifier, force, &config.default_currency)
        .with_context(|| format!("price check using {} failed", store.path().display()))?;

    if outcome.report.failures > 0 {
        println!("{} product(s) could not be checked", outcome.report.failures);
    }
    if outcome.message_id.is_some() {
        println!("Message Queued!");
    }
    Ok(())
}
