//! Consent prompts.
//!
//! Every write to a user's shell profile is preceded by an explicit yes/no
//! question. The [`Confirm`] trait is the seam: the CLI answers from the
//! terminal, tests answer with a scripted prompt.

use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

/// Something that can answer a yes/no question.
pub trait Confirm {
    /// Ask `question`. `Ok(false)` means the user declined or could not be asked.
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Asks on the controlling terminal, defaulting to "no".
///
/// When stdin is not a terminal nobody can answer, so the question is
/// declined unless `--yes` was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt {
    assume_yes: bool,
    quiet: bool,
}

impl TerminalPrompt {
    #[must_use]
    pub const fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            quiet: false,
        }
    }

    /// Do not echo questions answered by `--yes`.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// What to print for a question answered by `--yes`.
    fn assumed_answer(&self, question: &str) -> Option<String> {
        (!self.quiet).then(|| format!("{} {}", question, "yes (--yes)".dimmed()))
    }
}

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            if let Some(echo) = self.assumed_answer(question) {
                println!("{echo}");
            }
            return Ok(true);
        }

        if !io::stdin().is_terminal() {
            debug!("stdin is not a terminal, declining: {question}");
            return Ok(false);
        }

        print!("{} ", format!("{question} [y/N]:").green());
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        Ok(is_yes(&response))
    }
}

fn is_yes(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}
