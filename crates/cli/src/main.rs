mod config;
mod runner;
mod serve;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use gstn_core::{InputFormat, ReportingPeriod};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::runner::{Pipeline, ReportError};

/// GSTIN filing-status reports.
#[derive(Parser)]
#[command(
    name = "gstn",
    version,
    about = "Build GST filing-status reports from GSTIN lists"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a filing-status report from a CSV or spreadsheet of GSTINs
    Report {
        /// Path to the uploaded GSTIN list (.csv, .xls, .xlsx)
        input: PathBuf,
        /// Reporting month name, e.g. April
        #[arg(long)]
        month: String,
        /// Four-digit reporting year
        #[arg(long)]
        year: String,
        /// Declared content type; inferred from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
        /// Directory for the report (defaults to [serve] export_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Start the HTTP upload/download service
    Serve {
        /// Port to listen on (defaults to [serve] port)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: configuration: {}", e);
            process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Report {
            input,
            month,
            year,
            content_type,
            out,
        } => {
            let args = ReportArgs {
                input: &input,
                month: &month,
                year: &year,
                content_type: content_type.as_deref(),
                out: out.as_deref(),
            };
            rt.block_on(cmd_report(&config, args, cli.quiet));
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.serve.port);
            if let Err(e) = rt.block_on(serve::start_server(port, &config)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

struct ReportArgs<'a> {
    input: &'a Path,
    month: &'a str,
    year: &'a str,
    content_type: Option<&'a str>,
    out: Option<&'a Path>,
}

async fn cmd_report(config: &Config, args: ReportArgs<'_>, quiet: bool) {
    match run_report(config, &args).await {
        Ok(summary) => {
            println!("{}", summary.path.display());
            if !quiet {
                eprintln!(
                    "{} GSTINs: {} resolved, {} failed",
                    summary.gstins, summary.resolved, summary.failed
                );
            }
        }
        Err(e) => {
            eprintln!("error: {}: {}", e.category(), e);
            process::exit(1);
        }
    }
}

async fn run_report(
    config: &Config,
    args: &ReportArgs<'_>,
) -> Result<runner::ReportSummary, ReportError> {
    let period = ReportingPeriod::parse(args.month, args.year)?;
    let format = match args.content_type {
        Some(ct) => InputFormat::from_content_type(ct)?,
        None => InputFormat::from_path(args.input)?,
    };
    let bytes = std::fs::read(args.input).map_err(|source| ReportError::Read {
        path: args.input.to_path_buf(),
        source,
    })?;

    let mut pipeline = Pipeline::from_config(config);
    if let Some(out) = args.out {
        pipeline = pipeline.with_export_dir(out);
    }
    pipeline.run(&bytes, format, &period).await
}
