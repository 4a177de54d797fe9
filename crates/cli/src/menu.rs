//! Interactive numbered menu.
//!
//! Every action reloads the movement log before computing anything. Bad input
//! or a rejected withdrawal aborts just that action with a message; the loop
//! keeps going. End of input behaves like choosing "exit".

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use milkstock_core::DomainError;
use milkstock_infra::report::{export_summary_to_path, StockReport};
use milkstock_infra::{CommandDispatcher, Config, DispatchError, MovementStore};
use milkstock_inventory::input::{
    parse_date_or, parse_int_or, parse_optional_date, parse_required_int, text_or,
};
use milkstock_inventory::{Movement, RegisterIntake, RegisterWithdrawal, StockCommand};

pub const DEFAULT_LOCATION: &str = "freezer";

/// Why reading an action's fields stopped early.
enum Abort {
    Io(io::Error),
    Input(DomainError),
}

impl From<io::Error> for Abort {
    fn from(value: io::Error) -> Self {
        Abort::Io(value)
    }
}

impl From<DomainError> for Abort {
    fn from(value: DomainError) -> Self {
        Abort::Input(value)
    }
}

pub struct Menu<'a, S, R, W> {
    dispatcher: &'a CommandDispatcher<S>,
    config: &'a Config,
    today: NaiveDate,
    input: R,
    output: W,
}

impl<'a, S, R, W> Menu<'a, S, R, W>
where
    S: MovementStore,
    R: BufRead,
    W: Write,
{
    pub fn new(
        dispatcher: &'a CommandDispatcher<S>,
        config: &'a Config,
        today: NaiveDate,
        input: R,
        output: W,
    ) -> Self {
        Self {
            dispatcher,
            config,
            today,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(
                self.output,
                "\n=== MILK STOCK ===\n\
                 1) Register intake\n\
                 2) Register withdrawal\n\
                 3) View report\n\
                 4) Export summary CSV\n\
                 0) Exit\n"
            )?;

            let Some(choice) = self.read_line("Choose an option: ")? else {
                writeln!(self.output)?;
                break;
            };
            match choice.trim() {
                "1" => self.register_intake()?,
                "2" => self.register_withdrawal()?,
                "3" => self.show_report()?,
                "4" => self.export_summary()?,
                "0" => break,
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
        writeln!(self.output, "Bye!")?;
        self.output.flush()
    }

    /// `None` on end of input.
    fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        Ok(self.read_line(label)?.unwrap_or_default())
    }

    fn read_intake(&mut self) -> Result<RegisterIntake, Abort> {
        let raw = self.prompt("Date (YYYY-MM-DD) [today]: ")?;
        let date = parse_date_or("date", &raw, self.today)?;
        let raw = self.prompt("Volume per bag (ml): ")?;
        let unit_volume_ml = parse_required_int("volume per bag", &raw)?;
        let raw = self.prompt("Bag count [1]: ")?;
        let bag_count = parse_int_or("bag count", &raw, 1)?;
        let raw = self.prompt("Location (freezer/fridge) [freezer]: ")?;
        let location = text_or(&raw, DEFAULT_LOCATION);
        let raw = self.prompt("Extraction date (YYYY-MM-DD) [optional]: ")?;
        let extraction_date = parse_optional_date("extraction date", &raw)?;
        let raw = self.prompt("Expiry date (YYYY-MM-DD) [optional]: ")?;
        let expiry_date = parse_optional_date("expiry date", &raw)?;
        let raw = self.prompt("Note [optional]: ")?;

        Ok(RegisterIntake {
            date,
            unit_volume_ml,
            bag_count,
            location,
            extraction_date,
            expiry_date,
            note: text_or(&raw, ""),
        })
    }

    fn read_withdrawal(&mut self) -> Result<RegisterWithdrawal, Abort> {
        let raw = self.prompt("Date (YYYY-MM-DD) [today]: ")?;
        let date = parse_date_or("date", &raw, self.today)?;
        let raw = self.prompt("Volume per bag (ml): ")?;
        let unit_volume_ml = parse_required_int("volume per bag", &raw)?;
        let raw = self.prompt("Bag count [1]: ")?;
        let bag_count = parse_int_or("bag count", &raw, 1)?;
        let raw = self.prompt("Reason / note: ")?;

        Ok(RegisterWithdrawal {
            date,
            unit_volume_ml,
            bag_count,
            note: text_or(&raw, ""),
        })
    }

    /// Prints the rejection and returns `Ok(None)` for bad input.
    fn unwrap_fields<T>(&mut self, read: Result<T, Abort>) -> io::Result<Option<T>> {
        match read {
            Ok(fields) => Ok(Some(fields)),
            Err(Abort::Input(err)) => {
                writeln!(self.output, "Rejected: {err}")?;
                Ok(None)
            }
            Err(Abort::Io(err)) => Err(err),
        }
    }

    fn report_outcome(
        &mut self,
        outcome: Result<Vec<Movement>, DispatchError>,
        success: &str,
    ) -> io::Result<()> {
        match outcome {
            Ok(_) => writeln!(self.output, "{success}"),
            Err(err) if err.is_fatal() => {
                tracing::error!(error = %err, "movement log unavailable");
                writeln!(self.output, "Error: {err}")
            }
            Err(err) => writeln!(self.output, "Rejected: {err}"),
        }
    }

    fn register_intake(&mut self) -> io::Result<()> {
        let read = self.read_intake();
        let Some(cmd) = self.unwrap_fields(read)? else {
            return Ok(());
        };
        let outcome = self.dispatcher.dispatch(StockCommand::RegisterIntake(cmd));
        self.report_outcome(outcome, "Intake registered.")
    }

    fn register_withdrawal(&mut self) -> io::Result<()> {
        match self.dispatcher.ensure_stock_available() {
            Ok(_) => {}
            Err(DispatchError::InsufficientStock { .. }) => {
                return writeln!(self.output, "No stock available for withdrawal.");
            }
            Err(err) => return self.report_outcome(Err(err), ""),
        }

        let read = self.read_withdrawal();
        let Some(cmd) = self.unwrap_fields(read)? else {
            return Ok(());
        };
        let outcome = self.dispatcher.dispatch(StockCommand::RegisterWithdrawal(cmd));
        self.report_outcome(outcome, "Withdrawal registered.")
    }

    fn load(&mut self) -> io::Result<Option<Vec<Movement>>> {
        match self.dispatcher.store().load_all() {
            Ok(movements) => Ok(Some(movements)),
            Err(err) => {
                tracing::error!(error = %err, "failed to load movement log");
                writeln!(self.output, "Error: {err}")?;
                Ok(None)
            }
        }
    }

    fn show_report(&mut self) -> io::Result<()> {
        let Some(movements) = self.load()? else {
            return Ok(());
        };
        writeln!(self.output)?;
        StockReport::build(&movements, &self.config.report).render_text(&mut self.output)
    }

    fn export_summary(&mut self) -> io::Result<()> {
        let Some(movements) = self.load()? else {
            return Ok(());
        };
        let path = &self.config.export_file;
        match export_summary_to_path(&movements, self.config.export_recent, path) {
            Ok(()) => writeln!(self.output, "Summary exported to {}.", path.display()),
            Err(err) => writeln!(self.output, "Error: could not export summary: {err}"),
        }
    }
}
