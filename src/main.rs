//! Cook-along timer CLI
//!
//! Runs several recipe timers side by side in the terminal:
//! - Suggests timers from durations found in each step
//! - Rings and notifies when a timer finishes
//! - Keeps the screen awake while the session is open

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use cookalong::cli::{self, Cli, Commands, Display, RunArgs};
use cookalong::parser::{detect, format_clock, format_duration};
use cookalong::scheduler::TokioScheduler;
use cookalong::session::{self, PlaySessionController};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Detect { text, json }) => {
            let found = detect(&text.join(" "));
            if json {
                let out = serde_json::to_string_pretty(&found)
                    .context("Failed to serialize durations")?;
                println!("{out}");
            } else {
                println!("{}", Display::render_detected(&found));
            }
        }
        Some(Commands::Format { seconds, clock }) => {
            if clock {
                println!("{}", format_clock(seconds));
            } else {
                println!("{}", format_duration(seconds));
            }
        }
        Some(Commands::Run(args)) => {
            run_session(&args, cli.config.as_deref()).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs an interactive session on stdin/stdout.
async fn run_session(args: &RunArgs, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = args.apply_to(cli::load_config(config_path)?);
    let steps = args.collect_steps()?;
    if steps.is_empty() {
        tracing::warn!("No steps given; only presets and custom timers are available");
    }

    let components = session::production_components(&config);
    let controller =
        PlaySessionController::new(config, steps, TokioScheduler::new(), components);

    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    session::run(controller, input, &mut output).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
