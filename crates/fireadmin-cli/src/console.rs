//! Line-oriented status output for the operator.

use std::fmt::Display;
use std::io::Write;

use tracing::warn;

pub struct Console<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    pub fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(error = %e, "failed to write console output");
        }
    }

    /// Report an error that ends the command.
    pub fn fatal(&mut self, error: impl Display) {
        self.say(format_args!("Error: {}", error));
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            warn!(error = %e, "failed to flush console output");
        }
    }
}
