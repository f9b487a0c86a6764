//! bnk - read BNK bank placemark files
//!
//! ```bash
//! # Print all banks in two files as JSON
//! bnk parse lion.bnk wegagen.bnk
//!
//! # Tab-separated text, fail if any file is unreadable
//! bnk parse *.bnk -f text --fail-on-error
//!
//! # Supported icon styles (default first)
//! bnk styles
//! ```

mod config;

use anyhow::{Context, Result};
use bnk_core::{load_bnk_files, BankCollection, BankRecord, LoadReport, STYLE_WHITELIST};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::Config;
use serde::Serialize;
use std::path::PathBuf;

/// Output format for parsed records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum OutputFormat {
    /// JSON document with records, visibility and failures
    Json,
    /// One tab-separated line per record (tabs, newlines and backslashes escaped)
    Text,
}

impl OutputFormat {
    /// Resolve output format from CLI, config, or default
    fn resolve(cli_value: Option<Self>, config_value: Option<&str>) -> Self {
        if let Some(format) = cli_value {
            return format;
        }

        if let Some(format_str) = config_value {
            return match format_str.to_lowercase().as_str() {
                "text" | "txt" => Self::Text,
                "json" => Self::Json,
                other => {
                    log::warn!("Unknown output format {other:?} in config, using json");
                    Self::Json
                }
            };
        }

        Self::Json
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "bnk",
    about = "Read BNK bank placemark files",
    long_about = "Read BNK bank placemark files and print the validated bank records.\n\
                  \n\
                  Defaults can be set via a .bnk.toml configuration file.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Config file (default: ./.bnk.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse BNK files and print their bank records
    Parse {
        /// Input files; each file is loaded completely or not at all
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output format (default: json, or from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Compact JSON output (no pretty-printing)
        #[arg(long)]
        compact: bool,

        /// Exit with an error if any file fails to load
        #[arg(long)]
        fail_on_error: bool,
    },

    /// List supported icon styles, default first
    Styles,
}

#[derive(Debug, Serialize)]
struct FailedFile {
    path: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct ParseOutput<'a> {
    visible: bool,
    records: &'a [BankRecord],
    warnings: usize,
    failed: Vec<FailedFile>,
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn print_json(banks: &BankCollection, report: &LoadReport, pretty: bool) -> Result<()> {
    let output = ParseOutput {
        visible: banks.is_visible(),
        records: &banks.records,
        warnings: report.warnings(),
        failed: report
            .failed
            .iter()
            .map(|(path, e)| FailedFile {
                path: path.display().to_string(),
                error: e.to_string(),
            })
            .collect(),
    };

    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize records")?;

    println!("{json}");
    Ok(())
}

/// Escape field separators so each record stays on one line
fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn print_text(banks: &BankCollection) {
    for bank in &banks.records {
        println!(
            "{}\t{}\t{}\t{}",
            escape_field(&bank.name),
            bank.style_id,
            bank.location,
            escape_field(&bank.description)
        );
    }
}

/// Returns whether the run counts as a success
fn run_parse(
    files: &[PathBuf],
    format: OutputFormat,
    pretty: bool,
    fail_on_error: bool,
    quiet: bool,
) -> Result<bool> {
    let mut banks = BankCollection::new();
    let report = load_bnk_files(files, &mut banks);

    match format {
        OutputFormat::Json => print_json(&banks, &report, pretty)?,
        OutputFormat::Text => print_text(&banks),
    }

    for (path, e) in &report.failed {
        eprintln!("{} {}: {}", "Error:".red().bold(), path.display(), e);
    }

    if !quiet {
        eprintln!(
            "{} {} records from {} of {} files ({} warnings)",
            "Loaded".green().bold(),
            banks.len(),
            report.loaded.len(),
            files.len(),
            report.warnings()
        );
    }

    let success = if report.loaded.is_empty() {
        report.failed.is_empty()
    } else {
        !fail_on_error || report.is_complete()
    };
    Ok(success)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    let config = Config::discover(args.config.as_deref())?;

    match args.command {
        Commands::Parse {
            files,
            format,
            compact,
            fail_on_error,
        } => {
            let format = OutputFormat::resolve(format, config.output_format());
            let pretty = !compact && config.pretty().unwrap_or(true);
            let fail_on_error = fail_on_error || config.fail_on_error().unwrap_or(false);

            if !run_parse(&files, format, pretty, fail_on_error, args.quiet)? {
                std::process::exit(1);
            }
        }
        Commands::Styles => {
            for (i, style) in STYLE_WHITELIST.iter().enumerate() {
                if i == 0 {
                    println!("{style} (default)");
                } else {
                    println!("{style}");
                }
            }
        }
    }

    Ok(())
}
