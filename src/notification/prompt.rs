//! Terminal fallback prompt.

use std::io::Write;

use super::BlockingPrompt;

/// Rings the terminal bell and prints a framed message on stderr.
///
/// Writing to stderr is synchronous and available wherever the CLI runs,
/// which makes this the guaranteed alert path.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Builds the framed prompt text, bell included.
#[must_use]
pub fn render_prompt(message: &str) -> String {
    let width = message.chars().count() + 4;
    let border = "═".repeat(width);
    format!("\x07\n╔{border}╗\n║  {message}  ║\n╚{border}╝\n")
}

impl BlockingPrompt for TerminalPrompt {
    fn prompt(&mut self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nothing sensible to do if stderr itself is gone.
        let _ = stderr.write_all(render_prompt(message).as_bytes());
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let text = render_prompt("Pasta is done");
        assert!(text.starts_with('\x07'));
        assert!(text.contains("║  Pasta is done  ║"));

        let lines: Vec<&str> = text.trim_start_matches('\x07').trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0].chars().count(),
            lines[1].chars().count(),
            "border matches message width"
        );
    }
}
