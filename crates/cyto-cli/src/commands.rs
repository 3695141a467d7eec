use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use cyto_analysis::{analyze_response_effects, baseline_summary, generate_frequency_summary};
use cyto_ingest::import_cell_counts;
use cyto_model::{ImportOptions, StoreOptions};
use cyto_store::CellStore;

use cyto_cli::render::{
    baseline_tables, comparison_table, frequency_table, import_table, significance_report,
    write_frequency_csv,
};

use crate::cli::{Cli, ImportArgs, ReportFormatArg, SummaryArgs};

pub fn store_options(cli: &Cli) -> StoreOptions {
    StoreOptions::default().with_busy_timeout(Duration::from_secs(cli.busy_timeout_secs))
}

pub fn run_init(db: &Path, store_options: &StoreOptions) -> Result<()> {
    let span = info_span!("init", store = %db.display());
    let _guard = span.enter();
    let store = CellStore::open(db, store_options)
        .with_context(|| format!("initialize {}", db.display()))?;
    drop(store);
    info!("schema ready");
    println!("Database ready: {}", db.display());
    Ok(())
}

pub fn run_import(
    db: &Path,
    store_options: &StoreOptions,
    args: &ImportArgs,
    format: ReportFormatArg,
) -> Result<()> {
    let options = ImportOptions::default()
        .with_batch_size(args.batch_size)
        .context("invalid --batch-size")?;
    let report = import_cell_counts(&args.csv, db, store_options, &options)
        .with_context(|| format!("import {}", args.csv.display()))?;
    match format {
        ReportFormatArg::Json => print_json(&report)?,
        ReportFormatArg::Table => {
            println!("Imported {} into {}", args.csv.display(), db.display());
            println!("{}", import_table(&report));
        }
    }
    Ok(())
}

pub fn run_summary(
    db: &Path,
    store_options: &StoreOptions,
    args: &SummaryArgs,
    format: ReportFormatArg,
) -> Result<()> {
    let table = generate_frequency_summary(db, store_options).context("frequency summary")?;
    if let Some(path) = &args.output {
        write_frequency_csv(&table, path)?;
        info!(path = %path.display(), rows = table.len(), "wrote frequency table");
    }
    match format {
        ReportFormatArg::Json => print_json(&table)?,
        ReportFormatArg::Table => {
            println!("{}", frequency_table(&table, args.limit));
            if let Some(limit) = args.limit.filter(|limit| *limit < table.len()) {
                println!("Showing {limit} of {} rows", table.len());
            }
        }
    }
    Ok(())
}

pub fn run_analyze(db: &Path, store_options: &StoreOptions, format: ReportFormatArg) -> Result<()> {
    let table = generate_frequency_summary(db, store_options).context("frequency summary")?;
    let analysis =
        analyze_response_effects(&table, db, store_options).context("response analysis")?;
    match format {
        ReportFormatArg::Json => print_json(&analysis)?,
        ReportFormatArg::Table => {
            println!("Cohort rows: {}", analysis.cohort_rows);
            println!("{}", comparison_table(&analysis));
            print!("{}", significance_report(&analysis));
        }
    }
    Ok(())
}

pub fn run_baseline(db: &Path, store_options: &StoreOptions, format: ReportFormatArg) -> Result<()> {
    let summary = baseline_summary(db, store_options).context("baseline summary")?;
    match format {
        ReportFormatArg::Json => print_json(&summary)?,
        ReportFormatArg::Table => {
            let (projects, subjects) = baseline_tables(&summary);
            println!("Samples per project:");
            println!("{projects}");
            println!("Subjects:");
            println!("{subjects}");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize report")?;
    println!("{json}");
    Ok(())
}
