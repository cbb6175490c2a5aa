//! `splan list ...` / `splan quote ...`: CRUD over the account's stored records.

use std::path::PathBuf;

use clap::Subcommand;
use supplyplan_planner::input::{PlanInput, QuoteInput};
use supplyplan_planner::money::Money;
use supplyplan_planner::{consolidate, PlannerConfig};
use supplyplan_store::{NewQuote, SqliteStore, Store, StoreError};

use crate::exit_codes::{EXIT_ERROR, EXIT_INPUT};
use crate::output;
use crate::plan::load_config;
use crate::settings::Context;
use crate::CliError;

#[derive(Subcommand)]
pub enum ListCommands {
    /// Save every [[lists]] entry of an input document
    #[command(after_help = "\
Examples:
  splan list add ana.toml
  splan --account casa list add lists.json")]
    Add {
        /// Input document (.toml or .json)
        file: PathBuf,
    },

    /// Show the account's lists in creation order
    Ls {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Change a list's title
    Rename { id: String, title: String },

    /// Delete a list
    Rm { id: String },

    /// Publish a snapshot of a list and print its share id
    Share { id: String },

    /// Copy a shared list into this account
    Import { share_id: String },
}

#[derive(Subcommand)]
pub enum QuoteCommands {
    /// Save every [[quotes]] entry of an input document
    #[command(after_help = "\
Examples:
  splan quote add central.toml
  splan quote add central.toml --config plan.toml")]
    Add {
        /// Input document (.toml or .json)
        file: PathBuf,

        /// Planner config whose conversion rules price the snapshot total
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the account's quotes in creation order
    Ls {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Change a quote's supplier name
    Rename { id: String, name: String },

    /// Replace a quote's lines with the single quote in a document
    Update {
        id: String,

        /// Input document holding exactly one [[quotes]] entry
        file: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete a quote
    Rm { id: String },
}

pub fn cmd_list(ctx: &Context, cmd: ListCommands) -> Result<(), CliError> {
    let mut store = ctx.open_store()?;
    let account = ctx.account.as_str();

    match cmd {
        ListCommands::Add { file } => {
            let doc = PlanInput::read(&file).map_err(CliError::plan)?;
            if doc.lists.is_empty() {
                return Err(CliError::new(EXIT_INPUT, format!("{}: no [[lists]] found", file.display())));
            }
            for (i, list) in doc.lists.into_iter().enumerate() {
                let list = list.into_source_list(i).map_err(CliError::plan)?;
                let saved = store
                    .create_list(account, &list.title, list.items)
                    .map_err(CliError::store)?;
                println!("{}", saved.id);
                eprintln!("added list \"{}\" ({} items)", saved.title, saved.items.len());
            }
        }
        ListCommands::Ls { json } => {
            let lists = store.lists(account).map_err(CliError::store)?;
            if json {
                print_json(&lists)?;
            } else if lists.is_empty() {
                eprintln!("no lists for account \"{account}\"");
            } else {
                output::print_lists(&lists);
            }
        }
        ListCommands::Rename { id, title } => {
            store.rename_list(account, &id, &title).map_err(CliError::store)?;
            eprintln!("renamed {id}");
        }
        ListCommands::Rm { id } => {
            store.delete_list(account, &id).map_err(CliError::store)?;
            eprintln!("removed {id}");
        }
        ListCommands::Share { id } => {
            let lists = store.lists(account).map_err(CliError::store)?;
            let list = lists.into_iter().find(|l| l.id == id).ok_or_else(|| {
                CliError::store(StoreError::NotFound { kind: "list", id: id.clone() })
            })?;
            let share_id = store.share_list(&list.title, list.items).map_err(CliError::store)?;
            println!("{share_id}");
        }
        ListCommands::Import { share_id } => {
            let list = store.import_shared(account, &share_id).map_err(CliError::store)?;
            println!("{}", list.id);
            eprintln!("imported \"{}\"", list.title);
        }
    }
    Ok(())
}

pub fn cmd_quote(ctx: &Context, cmd: QuoteCommands) -> Result<(), CliError> {
    let mut store = ctx.open_store()?;
    let account = ctx.account.as_str();

    match cmd {
        QuoteCommands::Add { file, config } => {
            let config = load_config(config.as_ref())?;
            let doc = PlanInput::read(&file).map_err(CliError::plan)?;
            if doc.quotes.is_empty() {
                return Err(CliError::new(EXIT_INPUT, format!("{}: no [[quotes]] found", file.display())));
            }
            for quote in doc.quotes {
                let new_quote = snapshot(&store, account, &config, quote)?;
                let saved = store.create_quote(account, new_quote).map_err(CliError::store)?;
                println!("{}", saved.id);
                eprintln!(
                    "added quote \"{}\" ({} items, total {})",
                    saved.supplier_name,
                    saved.items.len(),
                    Money(saved.total_value_cents),
                );
            }
        }
        QuoteCommands::Ls { json } => {
            let quotes = store.quotes(account).map_err(CliError::store)?;
            if json {
                print_json(&quotes)?;
            } else if quotes.is_empty() {
                eprintln!("no quotes for account \"{account}\"");
            } else {
                output::print_quotes(&quotes);
            }
        }
        QuoteCommands::Rename { id, name } => {
            store.rename_quote(account, &id, &name).map_err(CliError::store)?;
            eprintln!("renamed {id}");
        }
        QuoteCommands::Update { id, file, config } => {
            let config = load_config(config.as_ref())?;
            let mut doc = PlanInput::read(&file).map_err(CliError::plan)?;
            if doc.quotes.len() != 1 {
                return Err(CliError::new(
                    EXIT_INPUT,
                    format!("{}: expected exactly one [[quotes]] entry, found {}", file.display(), doc.quotes.len()),
                ));
            }
            let quote = doc.quotes.remove(0);
            let new_quote = snapshot(&store, account, &config, quote)?;
            store
                .update_quote_items(account, &id, new_quote.items, new_quote.total_value_cents)
                .map_err(CliError::store)?;
            eprintln!("updated {id}");
        }
        QuoteCommands::Rm { id } => {
            store.delete_quote(account, &id).map_err(CliError::store)?;
            eprintln!("removed {id}");
        }
    }
    Ok(())
}

/// Build the quote to save. A total given in the document is kept;
/// otherwise it is priced against the account's current demand.
fn snapshot(
    store: &SqliteStore,
    account: &str,
    config: &PlannerConfig,
    quote: QuoteInput,
) -> Result<NewQuote, CliError> {
    let new_quote = NewQuote {
        supplier_name: quote.supplier_name,
        date: quote.date,
        items: quote.items,
        total_value_cents: quote.total_value.unwrap_or(0),
    };
    if quote.total_value.is_some() {
        return Ok(new_quote);
    }
    let lists = store.lists(account).map_err(CliError::store)?;
    Ok(new_quote.into_snapshot(&consolidate(&lists), config))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json_str}");
    Ok(())
}
