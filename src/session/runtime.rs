//! Driving a session against real time from a line-based input.
//!
//! Each input line is a user gesture, so the first command unlocks sound
//! and the wake lock. Between commands the loop sleeps until the
//! scheduler's next deadline and dispatches whatever became due.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use super::command::{SessionCommand, HELP};
use super::{PlaySessionController, SessionComponents, SessionEvent};
use crate::cli::Display;
use crate::gesture::{GestureKind, UserGesture};
use crate::notification::{CommandNotifier, NotificationDispatcher, TerminalPrompt};
use crate::parser::format_duration;
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::sound::{AudioAlertEngine, RodioBackend};
use crate::types::SessionConfig;
use crate::wakelock::{InhibitorProcess, ScreensaverPoke, StaticCapabilities, WakeLockController};

/// Builds the real platform backends for `config`.
#[must_use]
pub fn production_components(config: &SessionConfig) -> SessionComponents {
    SessionComponents {
        audio: AudioAlertEngine::new(RodioBackend::new()),
        notifier: NotificationDispatcher::new(
            CommandNotifier::detect(),
            TerminalPrompt::new(),
            config.notification_title.clone(),
        ),
        wake_lock: WakeLockController::new(
            &StaticCapabilities::for_mode(config.wake_lock),
            InhibitorProcess::detect(),
            ScreensaverPoke::detect(),
        ),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn flush_events<W: Write>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    out: &mut W,
) -> Result<()> {
    while let Ok(event) = events.try_recv() {
        if let Some(line) = Display::render_event(&event) {
            writeln!(out, "{line}").context("Failed to write output")?;
        }
    }
    out.flush().context("Failed to flush output")
}

/// Runs a session until `quit`, end of input, or Ctrl-C.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R, W>(
    mut session: PlaySessionController<TokioScheduler>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut events = session.subscribe_events();
    let mut lines = input.lines();

    session.start();
    flush_events(&mut events, out)?;
    writeln!(out, "{}", Display::render_presets(session.presets()))?;
    writeln!(out, "Type 'help' for commands.")?;

    loop {
        flush_events(&mut events, out)?;
        let deadline = session.next_wakeup();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read command")? else {
                    debug!("Input closed");
                    break;
                };
                session.handle_gesture(&UserGesture::new(GestureKind::Command));
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => apply(&mut session, command, out)?,
                    Err(e) if e.is_empty() => {}
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            () = wait_until(deadline) => {
                session.process_due();
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                debug!("Interrupted");
                break;
            }
        }
    }

    session.end();
    flush_events(&mut events, out)
}

/// Executes one command against a session, writing any direct answer.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub(crate) fn apply<S, W>(
    session: &mut PlaySessionController<S>,
    command: SessionCommand,
    out: &mut W,
) -> Result<()>
where
    S: Scheduler,
    W: Write,
{
    match command {
        SessionCommand::Next => {
            if !session.next_step() {
                writeln!(out, "Already at the last step")?;
            }
        }
        SessionCommand::Previous => {
            if !session.previous_step() {
                writeln!(out, "Already at the first step")?;
            }
        }
        SessionCommand::Step(index) => {
            if !session.set_step(index) {
                writeln!(out, "No step {}", index + 1)?;
            }
        }
        SessionCommand::Preset(index) => {
            if session.add_preset_timer(index).is_none() {
                writeln!(out, "No preset {}", index + 1)?;
            }
        }
        SessionCommand::Add(index) => {
            if session.add_suggested_timer(index).is_none() {
                writeln!(out, "No suggested timer {} on this step", index + 1)?;
            }
        }
        SessionCommand::Timer { seconds, label } => {
            let label = label.unwrap_or_else(|| format_duration(seconds));
            session.add_timer(label, seconds);
        }
        SessionCommand::Toggle(id) => {
            if session.timer(id).is_none() {
                writeln!(out, "No timer #{id}")?;
            } else {
                session.toggle_timer(id);
            }
        }
        SessionCommand::Reset(id) => {
            if !session.reset_timer(id) {
                writeln!(out, "No timer #{id}")?;
            }
        }
        SessionCommand::Remove(id) => {
            if !session.remove_timer(id) {
                writeln!(out, "No timer #{id}")?;
            }
        }
        SessionCommand::List => {
            writeln!(out, "{}", Display::render_timers(&session.views()))?;
        }
        SessionCommand::Help => {
            writeln!(out, "{HELP}")?;
            writeln!(out, "{}", Display::render_presets(session.presets()))?;
        }
        SessionCommand::Quit => {}
    }
    Ok(())
}
