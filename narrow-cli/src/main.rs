//! Operator tooling for the reference narrowing widget.
//!
//! Checks settings files and replays submissions through the limit
//! validator without a form host.
//!
//! Usage:
//!   narrow-widgets check-settings widget.toml --field field.json
//!   narrow-widgets validate --settings widget.toml --field field.json --submitted values.json
//!   narrow-widgets label --settings widget.toml "Related content"

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Result;
use clap::{Parser, Subcommand};
use narrow_cli::{bundle_options, check_settings, label, parse_parents, validate};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "narrow-widgets")]
#[command(about = "Inspect reference narrowing widget configuration")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a settings file and print it normalized
    CheckSettings {
        /// Settings file (.toml or .json)
        file: PathBuf,

        /// Field definition (JSON) to summarize the settings against
        #[arg(long)]
        field: Option<PathBuf>,
    },
    /// Run the value limit check on a submitted-values file
    Validate {
        #[arg(long)]
        settings: PathBuf,

        #[arg(long)]
        field: PathBuf,

        /// Submitted form values (JSON)
        #[arg(long)]
        submitted: PathBuf,

        /// Keys above the field in the submitted tree, separated by `/`
        #[arg(long)]
        parents: Option<String>,
    },
    /// Print a field title decorated with its limits
    Label {
        #[arg(long)]
        settings: PathBuf,

        title: String,
    },
    /// List the bundles the companion selector would offer
    Bundles {
        #[arg(long)]
        field: PathBuf,

        /// Bundle labels as a JSON object keyed by bundle id
        #[arg(long)]
        labels: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::CheckSettings { file, field } => {
            let report = check_settings(&file, field.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report.settings)?);
            for line in &report.summary {
                println!("{line}");
            }
        }
        Command::Validate {
            settings,
            field,
            submitted,
            parents,
        } => {
            let parents = parse_parents(parents.as_deref());
            let report = validate(&settings, &field, &submitted, &parents)?;
            println!("{}", serde_json::to_string_pretty(&report.errors)?);
            if !report.is_valid() {
                info!(field = %report.field, errors = report.errors.len(), "submission rejected");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Label { settings, title } => {
            println!("{}", label(&settings, &title));
        }
        Command::Bundles { field, labels } => {
            for (id, label) in bundle_options(&field, labels.as_deref())? {
                println!("{id}\t{label}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
