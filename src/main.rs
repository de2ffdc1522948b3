//! Binary entry point for leadflow.
//!
//! This binary provides the CLI interface for the leadflow agents.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use leadflow::config::LeadflowConfig;
use leadflow::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Leadflow - lead triage, outreach and campaign ranking agents.
#[derive(Parser)]
#[command(name = "leadflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables (overrides config and `MM_DATA_DIR`).
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List the tables in the data directory.
    Tables,

    /// Query a table.
    Query {
        /// Table name.
        table: String,

        /// Equality filter as `field=value` (repeatable).
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Dispatch one request on an agent.
    Call {
        /// Agent name or alias: triage, engagement, campaign_opt.
        agent: String,

        /// Method name.
        method: String,

        /// Parameter as `name=value`; values are parsed as JSON when possible (repeatable).
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Also print the last N episodes.
        #[arg(short, long)]
        episodes: Option<usize>,
    },

    /// Run the demo pipeline and write the run log.
    Run {
        /// Run log path.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum number of leads.
        #[arg(short, long)]
        sample: Option<usize>,

        /// Number of campaigns to rank.
        #[arg(short, long)]
        top_n: Option<usize>,
    },

    /// Serve the JSON-RPC relay over stdio.
    Serve,

    /// Show the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match LeadflowConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    let config = match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: LeadflowConfig) -> anyhow::Result<()> {
    match command {
        Commands::Tables => commands::cmd_tables(&config),
        Commands::Query { table, filters } => commands::cmd_query(&config, &table, &filters),
        Commands::Call {
            agent,
            method,
            params,
            episodes,
        } => commands::cmd_call(&config, &agent, &method, &params, episodes),
        Commands::Run { out, sample, top_n } => commands::cmd_run(config, out, sample, top_n),
        Commands::Serve => commands::cmd_serve(config),
        Commands::Config => commands::cmd_config(&config),
    }
}
