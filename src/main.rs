use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use log::{error, info};
use simple_logger::SimpleLogger;

use deferspec::core::config::{HostConfig, ReporterConfig};
use deferspec::core::replay;
use deferspec::DeferSpecReporter;


#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}


#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded JSON Lines event stream through the reporter
    Replay {
        /// Event stream to read; stdin when omitted
        events: Option<PathBuf>,

        /// Host config file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Force colored output
        #[arg(long)]
        colors: bool,

        /// Print spec lines as they arrive instead of deferring them
        #[arg(long)]
        immediate: bool,

        /// Report passed and skipped specs too
        #[arg(long)]
        show_all: bool,
    },

    /// Print the resolved reporter options
    Options {
        /// Host config file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    SimpleLogger::new()
        .with_level(log_level)
        .init()
        .context("Failed to initialize logger")?;

    info!("deferspec v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Replay { events, config, colors, immediate, show_all } => {
            let mut host = load_host_config(config.as_ref())?;
            apply_overrides(&mut host, *colors, *immediate, *show_all);

            match run_replay(events.as_ref(), &host) {
                Ok(failed) => {
                    if failed {
                        process::exit(1);
                    }
                }
                Err(e) => {
                    error!("Replay failed: {:#}", e);
                    eprintln!("error: {:#}", e);
                    process::exit(2);
                }
            }
        }

        Commands::Options { config } => {
            let host = load_host_config(config.as_ref())?;
            print_options(&host.reporter_config(), &host);
        }
    }

    Ok(())
}


fn load_host_config(path: Option<&PathBuf>) -> Result<HostConfig> {
    match path {
        Some(path) => HostConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(HostConfig::default()),
    }
}


fn apply_overrides(host: &mut HostConfig, colors: bool, immediate: bool, show_all: bool) {
    if colors {
        host.colors = true;
    }

    let options = host.defer_spec_reporter.get_or_insert_with(Default::default);

    if immediate {
        options.deferred = Some(false);
    }

    if show_all {
        options.suppress_passed = Some(false);
        options.suppress_failed = Some(false);
        options.suppress_skipped = Some(false);
    }
}


/// Returns whether the last run in the stream failed.
fn run_replay(events: Option<&PathBuf>, host: &HostConfig) -> Result<bool> {
    let reader: Box<dyn BufRead> = match events {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event stream {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut reporter = DeferSpecReporter::stdout(host);
    let summary = replay::replay(reader, &mut reporter).context("Failed to replay events")?;

    Ok(summary.failed())
}


fn print_options(config: &ReporterConfig, host: &HostConfig) {
    let max_log_lines = config
        .max_log_lines
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());

    println!("Reporter Options:");
    println!("=================");
    println!("  suppressPassed:  {}", config.suppress_passed);
    println!("  suppressFailed:  {}", config.suppress_failed);
    println!("  suppressSkipped: {}", config.suppress_skipped);
    println!("  deferred:        {}", config.deferred);
    println!("  showSpecTiming:  {}", config.show_spec_timing);
    println!("  maxLogLines:     {}", max_log_lines);
    println!("\nPrefixes:");
    println!("  success: {:?}", config.prefixes.success);
    println!("  failure: {:?}", config.prefixes.failure);
    println!("  skipped: {:?}", config.prefixes.skipped);
    println!("\nHost:");
    println!("  colors:      {}", host.colors);
    println!("  browser log: {}", host.browser_log_enabled());
}
