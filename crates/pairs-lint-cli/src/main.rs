//! pairs-lint CLI tool.
//!
//! Usage:
//! ```bash
//! pairs-lint check [OPTIONS] [PATH]
//! pairs-lint check-facts [OPTIONS] FILE
//! pairs-lint list-rules
//! pairs-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use commands::RuleArgs;

/// Checks calls that take alternating key/value pair arguments
#[derive(Parser)]
#[command(name = "pairs-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check Rust sources under a directory
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Stop at the first file that does not parse
        #[arg(long)]
        fail_on_parse_error: bool,
    },

    /// Check call sites exported by another front end as JSON
    CheckFacts {
        /// Facts file (`{"files": [{"path": .., "calls": [..]}]}`)
        file: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List diagnostic kinds
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Source snippets rendered with miette.
    Pretty,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            rules,
            format,
            exclude,
            fail_on_parse_error,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                exclude,
                fail_on_parse_error,
            };
            commands::check::run(&path, &rules, options, &source)
        }
        Commands::CheckFacts {
            file,
            rules,
            format,
        } => {
            let source = config_resolver::resolve(&file, cli.config.as_deref());
            commands::check_facts::run(&file, &rules, format, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
