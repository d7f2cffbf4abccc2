//! tagmerge CLI
//!
//! Merge player databases into a `Players.json` tag configuration:
//! - load the current `Players.json` (optional) and any number of sources
//! - inspect the attributes the sources use and the tags available
//! - map attributes to tags and write the merged document

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tagmerge_core::{to_pretty_json, OUTPUT_FILE_NAME};

mod report;
mod sources;

use sources::{MappingArgs, SourceArgs};

#[derive(Parser)]
#[command(name = "tagmerge")]
#[command(
    author,
    version,
    about = "Merge player databases into a Players.json tag configuration"
)]
struct Cli {
    /// More log output (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile sources against the target and write the merged document.
    Merge {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        mapping: MappingArgs,

        /// Output file.
        #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
        out: PathBuf,
    },

    /// List the attributes found in the sources, with counts, and the tags
    /// they can be mapped to.
    Attributes {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        mapping: MappingArgs,
    },

    /// Print import statistics.
    Stats {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Merge {
            sources,
            mapping,
            out,
        } => cmd_merge(&sources, &mapping, &out),
        Commands::Attributes { sources, mapping } => cmd_attributes(&sources, &mapping),
        Commands::Stats { sources } => cmd_stats(&sources),
    }
}

fn cmd_merge(sources: &SourceArgs, mapping: &MappingArgs, out: &Path) -> Result<()> {
    let mut session = sources::build_session(sources)?;
    mapping.apply(&mut session)?;

    report::print_databases(&session);
    report::print_stats(session.stats());

    match session.available_tags() {
        Some(available) => {
            for tag in session.mapping().unknown_tags(&available) {
                eprintln!(
                    "{} tag `{}` is not declared in Config",
                    "warning:".yellow().bold(),
                    tag
                );
            }
        }
        None if !session.mapping().is_empty() => {
            eprintln!(
                "{} target has no Config section; mapped tags are not checked",
                "warning:".yellow().bold()
            );
        }
        None => {}
    }

    let output = session.build_output();
    let bytes = to_pretty_json(&output)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, &bytes).with_context(|| format!("failed to write {}", out.display()))?;

    eprintln!(
        "{} {} (tagged players={})",
        "wrote".green().bold(),
        out.display().to_string().bold(),
        output.tagged_players()
    );
    Ok(())
}

fn cmd_attributes(sources: &SourceArgs, mapping: &MappingArgs) -> Result<()> {
    let mut session = sources::build_session(sources)?;
    mapping.apply(&mut session)?;
    report::print_attributes(&session);
    Ok(())
}

fn cmd_stats(sources: &SourceArgs) -> Result<()> {
    let session = sources::build_session(sources)?;
    report::print_databases(&session);
    report::print_stats(session.stats());
    Ok(())
}
