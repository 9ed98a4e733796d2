//! Terminal confirmation and alerts for the controller.

use std::io::BufRead;

use summer_controller::HostPrompt;

use crate::{report_message, OutputFormat};

/// Asks on stderr and reads the answer from stdin. `--yes` skips the
/// question entirely.
pub(crate) struct TerminalPrompt {
    assume_yes: bool,
    output: OutputFormat,
    quiet: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool, output: OutputFormat, quiet: bool) -> Self {
        TerminalPrompt {
            assume_yes,
            output,
            quiet,
        }
    }
}

impl HostPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprintln!("{}", message);
        eprintln!("Type 'yes' to confirm:");
        let mut input = String::new();
        let stdin = std::io::stdin();
        if stdin.lock().read_line(&mut input).is_err() {
            return false;
        }
        input.trim() == "yes"
    }

    fn alert(&self, message: &str) {
        report_message(message, "alert", self.output, self.quiet);
    }
}
