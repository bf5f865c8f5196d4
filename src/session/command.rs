//! Commands typed into a running terminal session.

use std::str::FromStr;

use thiserror::Error;

use crate::parser;
use crate::types::{TimerId, MAX_TIMER_SECONDS};

/// One line of user input, parsed.
///
/// Step, preset and suggestion numbers are 1-based as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Previous,
    /// Jump to a step (0-based index)
    Step(usize),
    /// Create a timer from a quick preset (0-based index)
    Preset(usize),
    /// Create a timer from a suggestion of the current step (0-based index)
    Add(usize),
    /// Create a custom timer
    Timer { seconds: u32, label: Option<String> },
    Toggle(TimerId),
    Reset(TimerId),
    Remove(TimerId),
    List,
    Help,
    Quit,
}

/// Errors produced while parsing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("'{0}' is not a valid {1}")]
    InvalidArgument(String, &'static str),
}

impl CommandError {
    /// Returns true for blank input, which callers silently skip.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  next | prev          move between steps
  step N               jump to step N
  preset N             start quick preset N
  add N                start suggested timer N of this step
  timer DURATION [LABEL]
                       start a custom timer (e.g. 90, 5min, 1h 30m)
  toggle ID            pause or resume a timer
  reset ID             reset a timer
  remove ID            remove a timer
  list                 show all timers
  quit                 end the session";

fn ordinal(command: &'static str, arg: Option<&str>) -> Result<usize, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(command, "a number"))?;
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument(arg.to_string(), "number")),
    }
}

fn timer_id(command: &'static str, arg: Option<&str>) -> Result<TimerId, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(command, "a timer id"))?;
    arg.trim_start_matches('#')
        .parse::<u64>()
        .map(TimerId)
        .map_err(|_| CommandError::InvalidArgument(arg.to_string(), "timer id"))
}

/// Reads a duration as plain seconds or as text made only of duration
/// tokens, such as `5min` or `1h 30m`.
fn duration(text: &str) -> Option<u32> {
    let seconds = match text.parse::<u32>() {
        Ok(seconds) => seconds,
        Err(_) => {
            let found = parser::detect(text);
            let mut leftover = text.to_string();
            for d in &found {
                leftover = leftover.replacen(&d.origin_token, "", 1);
            }
            if found.is_empty() || !leftover.trim().is_empty() {
                return None;
            }
            found
                .iter()
                .try_fold(0u32, |total, d| total.checked_add(d.seconds))?
        }
    };
    (1..=MAX_TIMER_SECONDS).contains(&seconds).then_some(seconds)
}

fn parse_timer(rest: &str) -> Result<SessionCommand, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument("timer", "a duration"));
    }

    // The duration is the longest leading run of words that still parses.
    let words: Vec<&str> = rest.split_whitespace().collect();
    for split in (1..=words.len()).rev() {
        let head = words[..split].join(" ");
        if let Some(seconds) = duration(&head) {
            let label = words[split..].join(" ");
            return Ok(SessionCommand::Timer {
                seconds,
                label: (!label.is_empty()).then_some(label),
            });
        }
    }
    Err(CommandError::InvalidArgument(rest.to_string(), "duration"))
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let arg = rest.split_whitespace().next();

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Previous),
            "step" => ordinal("step", arg).map(Self::Step),
            "preset" => ordinal("preset", arg).map(Self::Preset),
            "add" => ordinal("add", arg).map(Self::Add),
            "timer" | "t" => parse_timer(rest),
            "toggle" => timer_id("toggle", arg).map(Self::Toggle),
            "reset" => timer_id("reset", arg).map(Self::Reset),
            "remove" | "rm" => timer_id("remove", arg).map(Self::Remove),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<SessionCommand, CommandError> {
        line.parse()
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_simple_verbs() {
            assert_eq!(parse("next"), Ok(SessionCommand::Next));
            assert_eq!(parse("  PREV "), Ok(SessionCommand::Previous));
            assert_eq!(parse("list"), Ok(SessionCommand::List));
            assert_eq!(parse("q"), Ok(SessionCommand::Quit));
            assert_eq!(parse("help"), Ok(SessionCommand::Help));
        }

        #[test]
        fn test_numbers_are_one_based() {
            assert_eq!(parse("step 1"), Ok(SessionCommand::Step(0)));
            assert_eq!(parse("preset 3"), Ok(SessionCommand::Preset(2)));
            assert_eq!(parse("add 2"), Ok(SessionCommand::Add(1)));
        }

        #[test]
        fn test_bad_numbers() {
            assert_eq!(
                parse("step"),
                Err(CommandError::MissingArgument("step", "a number"))
            );
            assert!(matches!(
                parse("step 0"),
                Err(CommandError::InvalidArgument(_, "number"))
            ));
            assert!(matches!(
                parse("preset two"),
                Err(CommandError::InvalidArgument(_, "number"))
            ));
        }

        #[test]
        fn test_empty_and_unknown() {
            assert!(parse("   ").unwrap_err().is_empty());
            assert_eq!(
                parse("bake"),
                Err(CommandError::Unknown("bake".to_string()))
            );
        }
    }

    mod timer_tests {
        use super::*;

        #[test]
        fn test_plain_seconds() {
            assert_eq!(
                parse("timer 90"),
                Ok(SessionCommand::Timer {
                    seconds: 90,
                    label: None
                })
            );
        }

        #[test]
        fn test_duration_text_with_label() {
            assert_eq!(
                parse("timer 5min Soft eggs"),
                Ok(SessionCommand::Timer {
                    seconds: 300,
                    label: Some("Soft eggs".to_string())
                })
            );
            assert_eq!(
                parse("timer 1h 30m Roast"),
                Ok(SessionCommand::Timer {
                    seconds: 5400,
                    label: Some("Roast".to_string())
                })
            );
        }

        #[test]
        fn test_invalid_durations() {
            assert_eq!(
                parse("timer"),
                Err(CommandError::MissingArgument("timer", "a duration"))
            );
            assert!(parse("timer soon").is_err());
            assert!(parse("timer 0").is_err());
            assert!(parse("timer 999999").is_err());
        }

        #[test]
        fn test_timer_ids() {
            assert_eq!(parse("toggle 3"), Ok(SessionCommand::Toggle(TimerId(3))));
            assert_eq!(parse("reset #2"), Ok(SessionCommand::Reset(TimerId(2))));
            assert_eq!(parse("rm 1"), Ok(SessionCommand::Remove(TimerId(1))));
            assert!(matches!(
                parse("toggle x"),
                Err(CommandError::InvalidArgument(_, "timer id"))
            ));
        }
    }
}
