//! apidiff CLI - Command-line interface for the API surface diff engine
//!
//! Compares the public declarations of two versions of a set of modules and
//! emits one reviewable Markdown diff per module.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod loader;
mod output;

use commands::*;
use config::ApiDiffConfig;
use output::{OutputConfig, OutputFormat};

/// Review exactly what changed in a public API.
///
/// apidiff correlates the declarations of two versions of your modules by
/// stable identity and renders added, removed and changed APIs as diffs.
#[derive(Parser)]
#[command(name = "apidiff")]
#[command(author, version)]
#[command(about = "Review exactly what changed in a public API")]
#[command(propagate_version = true)]
#[command(next_help_heading = "Options")]
#[command(after_help = "Examples:
  apidiff diff before/ after/                 Print diffs for every module
  apidiff diff before/ after/ -o out --title net9
                                              Write net9_<module>.md files and an index
  apidiff diff a.json b.json --format json    Machine-readable result")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff the public API of two versions of a set of modules
    #[command(visible_alias = "d")]
    Diff {
        /// Directory of `*.json` module files (or a single file) for the old version
        before: PathBuf,

        /// Directory of `*.json` module files (or a single file) for the new version
        after: PathBuf,

        /// Write `{document}.md` files here instead of printing them
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Title of the index document; prefixes module document names
        #[arg(long)]
        title: Option<String>,

        /// Attribute type identity to hide, e.g. `T:System.ObsoleteAttribute` (repeatable)
        #[arg(long = "exclude-attribute", value_name = "ID")]
        exclude_attribute: Vec<String>,

        /// Do not hide the built-in list of attribute types
        #[arg(long)]
        no_default_attribute_exclusions: bool,

        /// Declaration identity to drop with its descendants, e.g. `T:N.Internal` (repeatable)
        #[arg(long = "exclude-api", value_name = "ID")]
        exclude_api: Vec<String>,

        /// File with one declaration identity per line (`#` starts a comment)
        #[arg(long, value_name = "FILE")]
        exclude_api_file: Option<PathBuf>,

        /// Hide compiler-generated default constructors unless they are the only change
        #[arg(long)]
        hide_implicit_default_constructors: bool,

        /// Render class, struct, interface and record headers as `partial`
        #[arg(long)]
        add_partial_modifier: bool,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .apidiffrc.toml
    let config = ApiDiffConfig::load(Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    // Apply color override from config if set
    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }
    let output = OutputConfig::auto_detect(format, config.use_color());

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Diff {
            before,
            after,
            output_dir,
            title,
            exclude_attribute,
            no_default_attribute_exclusions,
            exclude_api,
            exclude_api_file,
            hide_implicit_default_constructors,
            add_partial_modifier,
            jobs,
        } => {
            let args = diff::DiffArgs {
                before,
                after,
                output_dir,
                title,
                exclude_attributes: exclude_attribute,
                no_default_attribute_exclusions,
                exclude_apis: exclude_api,
                exclude_api_file,
                hide_implicit_default_constructors,
                add_partial_modifier,
                jobs,
            };
            diff::run(args, &config, output).await
        }
    }
}
