//! Helpers for locating and running platform tools.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// Searches `PATH` for an executable named `program`.
#[must_use]
pub fn find_program(program: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Spawns a program with its output discarded.
pub fn spawn_quiet(program: &Path, args: &[&str]) -> std::io::Result<Child> {
    debug!("Spawning {} {:?}", program.display(), args);
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Polls `child` until it exits or `timeout` passes.
///
/// Returns `Ok(None)` if the child is still running at the deadline.
pub fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        std::thread::sleep(EXIT_POLL_INTERVAL.min(deadline - now));
    }
}

/// Waits for a fire-and-forget child on a helper thread so it never lingers
/// as a zombie.
pub fn reap_in_background(mut child: Child) {
    std::thread::spawn(move || {
        let _ = child.wait();
    });
}
