// supplyplan CLI - consolidate supply lists, compare quotes, plan purchases

mod exit_codes;
mod output;
mod plan;
mod records;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use exit_codes::{store_exit_code, EXIT_INPUT, EXIT_INVALID_CONFIG, EXIT_SUCCESS};
use supplyplan_planner::PlanError;
use supplyplan_store::StoreError;

#[derive(Parser)]
#[command(name = "splan")]
#[command(about = "Consolidate school-supply lists and plan the cheapest purchase")]
#[command(version, long_version = long_version())]
struct Cli {
    /// SQLite database (default: <data dir>/supplyplan/supplyplan.db)
    #[arg(long, global = true, env = "SPLAN_DB")]
    db: Option<PathBuf>,

    /// Account whose lists and quotes are read and written
    #[arg(long, global = true, env = "SPLAN_ACCOUNT", default_value = "default")]
    account: String,

    /// More log output on stderr (-v debug, -vv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the planning pipeline over an input document
    #[command(after_help = "\
Examples:
  splan run lists.toml
  splan run lists.toml --json
  splan run lists.json --config plan.toml --csv plan.csv")]
    Run {
        /// Input document (.toml or .json) with [[lists]] and [[quotes]]
        input: PathBuf,

        #[command(flatten)]
        opts: plan::RunOptions,
    },

    /// Run the planning pipeline over the account's stored lists and quotes
    #[command(after_help = "\
Examples:
  splan report
  splan --account casa report --json --csv plan.csv")]
    Report {
        #[command(flatten)]
        opts: plan::RunOptions,
    },

    /// Validate a planner config without running
    #[command(after_help = "\
Examples:
  splan validate plan.toml")]
    Validate {
        /// Path to the planner .toml config
        config: PathBuf,
    },

    /// Show every supplier's unit price side by side
    #[command(after_help = "\
Examples:
  splan compare lists.toml
  splan compare lists.toml caderno --json")]
    Compare {
        /// Input document (.toml or .json)
        input: PathBuf,

        /// Only items whose name contains this text (case-insensitive)
        term: Option<String>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage stored source lists
    #[command(subcommand)]
    List(records::ListCommands),

    /// Manage stored supplier quotes
    #[command(subcommand)]
    Quote(records::QuoteCommands),
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn store(err: StoreError) -> Self {
        let code = store_exit_code(&err);
        let hint = match &err {
            StoreError::NotFound { kind: "list", .. } => Some("run `splan list ls` to see list ids"),
            StoreError::NotFound { kind: "quote", .. } => Some("run `splan quote ls` to see quote ids"),
            _ => None,
        };
        Self { code, message: err.to_string(), hint: hint.map(String::from) }
    }

    pub fn plan(err: PlanError) -> Self {
        let code = match err {
            PlanError::ConfigParse(_) | PlanError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            PlanError::InputParse(_) | PlanError::Io(_) => EXIT_INPUT,
        };
        Self::new(code, err.to_string())
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("SPLAN_GIT_HASH"), ")",
        "\nplanner: supplyplan-planner ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("SPLAN_TARGET"),
    )
}

fn init_logging(verbose: u8, json: bool) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let ctx = settings::Context::new(cli.db, cli.account);

    let result = match cli.command {
        Commands::Run { input, opts } => plan::cmd_run(input, opts),
        Commands::Report { opts } => plan::cmd_report(&ctx, opts),
        Commands::Validate { config } => plan::cmd_validate(config),
        Commands::Compare { input, term, json } => plan::cmd_compare(input, term, json),
        Commands::List(cmd) => records::cmd_list(&ctx, cmd),
        Commands::Quote(cmd) => records::cmd_quote(&ctx, cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
