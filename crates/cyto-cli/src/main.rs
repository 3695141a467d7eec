//! Immune cell count pipeline CLI.

use clap::{ColorChoice, Parser};
use cyto_cli::logging::{LogConfig, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{
    run_analyze, run_baseline, run_import, run_init, run_summary, store_options,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let options = store_options(&cli);
    let db = cli.db.as_path();
    let result = match &cli.command {
        Command::Init => run_init(db, &options),
        Command::Import(args) => run_import(db, &options, args, cli.format),
        Command::Summary(args) => run_summary(db, &options, args, cli.format),
        Command::Analyze => run_analyze(db, &options, cli.format),
        Command::Baseline => run_baseline(db, &options, cli.format),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Map `-v`/`-q`, `--log-level`, `--log-format`, `--log-file` and `--color`
/// onto a [`LogConfig`].
///
/// `RUST_LOG` is only consulted when neither a verbosity flag nor an explicit
/// level was given. With `--color auto`, ANSI output is used only for a
/// terminal stderr.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit_level = cli.log_level.map(LevelFilter::from);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: explicit_level.unwrap_or_else(|| cli.verbosity.tracing_level_filter()),
        use_env_filter: !cli.verbosity.is_present() && explicit_level.is_none(),
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}
