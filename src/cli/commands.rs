//! Command definitions for the cook-along CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::types::{SessionConfig, WakeLockMode};

// ============================================================================
// CLI Structure
// ============================================================================

/// Cook-along timers for step-by-step recipes
#[derive(Parser, Debug)]
#[command(
    name = "cookalong",
    version,
    about = "Cook-along timers for step-by-step recipes",
    long_about = "Guided cooking timers in the terminal.\n\
                  Finds durations in recipe steps, runs several countdowns at once, \
                  and keeps the screen awake while you cook.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to <config dir>/cookalong/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Find durations in a piece of recipe text
    Detect {
        /// Text to scan (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Format a number of seconds the way timers are labelled
    Format {
        /// Duration in seconds
        seconds: u32,

        /// Use countdown notation (M:SS or H:MM:SS)
        #[arg(long)]
        clock: bool,
    },

    /// Start an interactive cook-along session
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// A recipe step (repeat for each step)
    #[arg(short, long = "step", value_name = "TEXT", value_parser = validate_step)]
    pub steps: Vec<String>,

    /// Read steps from a file, one per non-empty line
    #[arg(long, value_name = "PATH")]
    pub steps_file: Option<PathBuf>,

    /// Wake-lock strategy (overrides the config file)
    #[arg(long, value_enum, value_name = "MODE")]
    pub wake_lock: Option<WakeLockMode>,

    /// Disable the alert tone
    #[arg(long)]
    pub no_sound: bool,

    /// Create timers paused instead of starting them
    #[arg(long)]
    pub no_auto_start: bool,
}

impl RunArgs {
    /// Steps given with `--step`, followed by those from `--steps-file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the steps file cannot be read.
    pub fn collect_steps(&self) -> Result<Vec<String>> {
        let mut steps = self.steps.clone();
        if let Some(path) = &self.steps_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read steps from {}", path.display()))?;
            steps.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
        Ok(steps)
    }

    /// Applies the command-line overrides to a loaded configuration.
    #[must_use]
    pub fn apply_to(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(mode) = self.wake_lock {
            config = config.with_wake_lock(mode);
        }
        if self.no_sound {
            config = config.with_sound(false);
        }
        if self.no_auto_start {
            config = config.with_auto_start(false);
        }
        config
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a step given on the command line.
///
/// - Must not be blank
fn validate_step(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("step text must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["cookalong"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.config.is_none());
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["cookalong", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_global_config() {
            let cli = Cli::parse_from(["cookalong", "run", "--config", "/tmp/c.json"]);
            assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        }

        #[test]
        fn test_parse_detect_joins_words() {
            let cli = Cli::parse_from(["cookalong", "detect", "Bake", "for", "20", "min"]);
            match cli.command {
                Some(Commands::Detect { text, json }) => {
                    assert_eq!(text.join(" "), "Bake for 20 min");
                    assert!(!json);
                }
                _ => panic!("Expected Detect command"),
            }
        }

        #[test]
        fn test_detect_requires_text() {
            assert!(Cli::try_parse_from(["cookalong", "detect"]).is_err());
        }

        #[test]
        fn test_parse_format() {
            let cli = Cli::parse_from(["cookalong", "format", "90", "--clock"]);
            match cli.command {
                Some(Commands::Format { seconds, clock }) => {
                    assert_eq!(seconds, 90);
                    assert!(clock);
                }
                _ => panic!("Expected Format command"),
            }
        }

        #[test]
        fn test_format_rejects_negative() {
            assert!(Cli::try_parse_from(["cookalong", "format", "-5"]).is_err());
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["cookalong", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // RunArgs Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> RunArgs {
            let argv = ["cookalong", "run"].into_iter().chain(args.iter().copied());
            let cli = Cli::parse_from(argv);
            match cli.command {
                Some(Commands::Run(args)) => args,
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_defaults() {
            let args = parse_run(&[]);
            assert!(args.steps.is_empty());
            assert!(args.wake_lock.is_none());
            assert!(!args.no_sound);
            assert!(!args.no_auto_start);
        }

        #[test]
        fn test_repeated_steps() {
            let args = parse_run(&["--step", "Boil water", "-s", "Add pasta, cook 9 min"]);
            assert_eq!(args.steps, vec!["Boil water", "Add pasta, cook 9 min"]);
        }

        #[test]
        fn test_blank_step_is_rejected() {
            assert!(Cli::try_parse_from(["cookalong", "run", "--step", "  "]).is_err());
        }

        #[test]
        fn test_wake_lock_mode() {
            let args = parse_run(&["--wake-lock", "legacy"]);
            assert_eq!(args.wake_lock, Some(WakeLockMode::Legacy));
            assert!(Cli::try_parse_from(["cookalong", "run", "--wake-lock", "sometimes"]).is_err());
        }

        #[test]
        fn test_apply_to_config() {
            let args = parse_run(&["--no-sound", "--no-auto-start", "--wake-lock", "modern"]);
            let config = args.apply_to(SessionConfig::default());
            assert!(!config.sound_enabled);
            assert!(!config.auto_start_timers);
            assert_eq!(config.wake_lock, WakeLockMode::Modern);
        }

        #[test]
        fn test_apply_keeps_config_without_flags() {
            let config = SessionConfig::default().with_sound(false);
            let merged = RunArgs::default().apply_to(config.clone());
            assert_eq!(merged, config);
        }

        #[test]
        fn test_collect_steps_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "Preheat the oven").unwrap();
            writeln!(file).unwrap();
            writeln!(file, "  Bake 25 minutes  ").unwrap();

            let args = RunArgs {
                steps: vec!["Mix".to_string()],
                steps_file: Some(file.path().to_path_buf()),
                ..RunArgs::default()
            };
            assert_eq!(
                args.collect_steps().unwrap(),
                vec!["Mix", "Preheat the oven", "Bake 25 minutes"]
            );
        }

        #[test]
        fn test_collect_steps_missing_file() {
            let args = RunArgs {
                steps_file: Some(PathBuf::from("/nonexistent/steps.txt")),
                ..RunArgs::default()
            };
            let err = args.collect_steps().unwrap_err();
            assert!(err.to_string().contains("Failed to read steps"));
        }
    }
}
