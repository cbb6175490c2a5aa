//! `splan run` / `splan report` / `splan validate` / `splan compare`.

use std::path::{Path, PathBuf};

use clap::Args;
use supplyplan_planner::compare::price_matrix;
use supplyplan_planner::export::{plan_rows, to_csv};
use supplyplan_planner::input::PlanInput;
use supplyplan_planner::model::{PlanResult, SourceList, SupplierQuote};
use supplyplan_planner::{consolidate, run, PlannerConfig};
use supplyplan_store::Store;

use crate::exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_NOTHING_TO_ANALYZE};
use crate::output;
use crate::settings::Context;
use crate::CliError;

#[derive(Args)]
pub struct RunOptions {
    /// Planner config (.toml); defaults to the built-in paper-ream rule
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON to stdout instead of the human plan
    #[arg(long)]
    json: bool,

    /// Write JSON output to file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the purchasing plan as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Fail (exit 7) when there is nothing to analyze
    #[arg(long)]
    strict: bool,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<PlannerConfig, CliError> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    PlannerConfig::from_toml(&config_str).map_err(CliError::plan)
}

pub fn cmd_run(input: PathBuf, opts: RunOptions) -> Result<(), CliError> {
    let config = load_config(opts.config.as_ref())?;
    let loaded = PlanInput::read(&input)
        .and_then(|doc| doc.load(&config))
        .map_err(CliError::plan)?;
    execute(&config, &loaded.lists, &loaded.quotes, &opts)
}

pub fn cmd_report(ctx: &Context, opts: RunOptions) -> Result<(), CliError> {
    let config = load_config(opts.config.as_ref())?;
    let store = ctx.open_store()?;
    let lists = store.lists(&ctx.account).map_err(CliError::store)?;
    let quotes = store.quotes(&ctx.account).map_err(CliError::store)?;
    execute(&config, &lists, &quotes, &opts)
}

fn execute(
    config: &PlannerConfig,
    lists: &[SourceList],
    quotes: &[SupplierQuote],
    opts: &RunOptions,
) -> Result<(), CliError> {
    let result = run(config, lists, quotes);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = opts.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = opts.csv {
        write_csv(config, &result, path)?;
        eprintln!("wrote {}", path.display());
    }

    if opts.json {
        println!("{json_str}");
    } else {
        output::print_plan(&result);
    }

    output::print_summary(&result);

    if result.analysis.is_none() && opts.strict {
        return Err(CliError::new(EXIT_NOTHING_TO_ANALYZE, "nothing to analyze")
            .with_hint("add at least one list and one quote"));
    }

    Ok(())
}

fn write_csv(config: &PlannerConfig, result: &PlanResult, path: &Path) -> Result<(), CliError> {
    let rows = match result.analysis {
        Some(ref analysis) => plan_rows(analysis, &result.consolidated, config),
        None => Vec::new(),
    };
    let csv = to_csv(&rows).map_err(CliError::plan)?;
    std::fs::write(path, csv)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display())))
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config))?;
    eprintln!(
        "ok: \"{}\" ({} conversion rule(s), split quantities {})",
        config.name,
        config.conversions.len(),
        config.split_quantity,
    );
    Ok(())
}

pub fn cmd_compare(input: PathBuf, term: Option<String>, json: bool) -> Result<(), CliError> {
    let config = PlannerConfig::default();
    let loaded = PlanInput::read(&input)
        .and_then(|doc| doc.load(&config))
        .map_err(CliError::plan)?;

    let entries = consolidate(&loaded.lists);
    let matrix = price_matrix(&entries, &loaded.quotes, term.as_deref().unwrap_or(""));

    if json {
        let json_str = serde_json::to_string_pretty(&matrix)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if matrix.rows.is_empty() {
        eprintln!("no items found");
    } else {
        output::print_matrix(&matrix);
    }
    Ok(())
}
