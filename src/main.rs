mod catalog;
mod debounce;
mod decide;
mod listing;
mod overlay;
mod preferences;
mod server;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use preferences::Preferences;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(
    name = "gaslighter",
    about = "Deterministic gaslighting annotations for source code",
    version
)]
struct Cli {
    /// Preferences file (default: ./gaslighter.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Annotate files (or stdin) and print a listing
    Annotate {
        /// Files to annotate; stdin when omitted.
        files: Vec<PathBuf>,

        /// Gate percentage override, 1-100.
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        percentage: Option<u8>,

        /// Emit annotation records as JSON instead of a listing.
        #[arg(long)]
        json: bool,

        /// Listing template override.
        #[arg(long, value_name = "TEMPLATE")]
        template: Option<String>,
    },
    /// Show the filter and gate decision for a single line
    Explain {
        /// The line to explain, exactly as it appears in the file.
        line: String,

        /// Gate percentage to compare against, 1-100.
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        percentage: Option<u8>,
    },
    /// Speak the editor protocol over stdin/stdout
    Serve,
}

fn init_logging(verbose: u8, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else {
        match verbose {
            0 => {}
            1 => {
                builder.filter_level(log::LevelFilter::Debug);
            }
            _ => {
                builder.filter_level(log::LevelFilter::Trace);
            }
        }
    }
    // stdout carries the protocol and listings; logs stay on stderr.
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    let prefs = match &cli.config {
        Some(path) => Preferences::load_file(path)?,
        None => Preferences::load(Path::new("."))?,
    };

    match cli.command {
        Command::Annotate {
            files,
            percentage,
            json,
            template,
        } => {
            let catalog = prefs.catalog()?;
            let percentage = percentage.unwrap_or(prefs.percentage);
            let reports = listing::annotate_files(&files, percentage, &catalog)?;
            let mut out = io::stdout().lock();
            if json {
                listing::render_json(&reports, &mut out)
            } else {
                let template = template.as_deref().unwrap_or(&prefs.listing_template);
                listing::render_listing(&reports, template, &mut out)
            }
        }
        Command::Explain { line, percentage } => {
            let catalog = prefs.catalog()?;
            let percentage = percentage.unwrap_or(prefs.percentage);
            listing::render_explain(&line, percentage, &catalog, &mut io::stdout().lock())
        }
        Command::Serve => server::run(&prefs),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    if let Err(err) = run(cli) {
        eprintln!("gaslighter: {err:#}");
        process::exit(2);
    }
}
