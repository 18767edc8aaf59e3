//! The interactive read-eval loop.

use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;
use medtrack_core::{CommandRegistry, Resolution};
use medtrack_db::{AppConfig, JsonStore, MedicationManager};
use tracing::{debug, info, warn};

use crate::commands::{Command, Context, Outcome};

/// Source of the current local time.
pub type Clock = fn() -> NaiveDateTime;

/// One interactive session over an input and an output stream.
///
/// Every line is handled on its own: errors are printed as
/// `error: <message>` and the loop continues. Only a failure of the streams
/// themselves ends the session early.
pub struct Session<R, W> {
    input: R,
    output: W,
    registry: CommandRegistry<Command>,
    manager: MedicationManager,
    store: JsonStore,
    config: AppConfig,
    clock: Clock,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        input: R,
        output: W,
        manager: MedicationManager,
        store: JsonStore,
        config: AppConfig,
        clock: Clock,
    ) -> Self {
        Self {
            input,
            output,
            registry: crate::commands::registry(),
            manager,
            store,
            config,
            clock,
        }
    }

    /// Runs until `exit` or end of input, saving before it returns.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.config.prompt)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                info!("end of input");
                writeln!(self.output)?;
                return self.save();
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if self.handle_line(trimmed)? == Outcome::Exit {
                return Ok(());
            }
        }
    }

    /// Resolves and runs one non-empty line.
    fn handle_line(&mut self, line: &str) -> io::Result<Outcome> {
        let now = (self.clock)();
        if self.manager.refresh_daily(now.date()) {
            info!(date = %now.date(), "new day, dose list rebuilt");
            self.save()?;
        }

        let command = match self.registry.resolve(line) {
            Ok(Resolution::Command(command)) => command,
            Ok(Resolution::Help(text)) => {
                writeln!(self.output, "{text}")?;
                return Ok(Outcome::Continue);
            }
            Err(err) => {
                writeln!(self.output, "error: {err}")?;
                return Ok(Outcome::Continue);
            }
        };

        let mutating = command.is_mutating();
        let mut ctx = Context {
            manager: &mut self.manager,
            registry: &self.registry,
            config: &self.config,
            now,
        };
        match command.execute(&mut ctx, &mut self.output) {
            Ok(outcome) => {
                if mutating || outcome == Outcome::Exit {
                    self.save()?;
                }
                Ok(outcome)
            }
            Err(err) => {
                debug!(error = %err, "command failed");
                writeln!(self.output, "error: {err}")?;
                Ok(Outcome::Continue)
            }
        }
    }

    fn save(&mut self) -> io::Result<()> {
        if let Err(err) = self.store.save(&self.manager) {
            warn!(error = %err, "failed to save medications");
            writeln!(self.output, "error: {err}")?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn manager(&self) -> &MedicationManager {
        &self.manager
    }
}
