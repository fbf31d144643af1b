//! Quiet-aware console output shared by the binaries.

use colored::Colorize;
use std::fmt::Display;

/// Console reporter; every line is dropped when `quiet` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Informational line on stdout.
    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// Non-fatal diagnostic on stdout (skipped arguments or pairs).
    pub fn notice(&self, message: impl Display) {
        if !self.quiet {
            println!("{}", message.to_string().yellow());
        }
    }

    /// Fatal error on stderr.
    pub fn error(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{}", format!("Error: {}", message).red());
        }
    }
}
