//! Command-line surface: argument parsing and one-shot subcommands.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use milkstock_infra::backup::{read_backup, restore, write_backup_to_path};
use milkstock_infra::report::{export_summary_to_path, StockReport};
use milkstock_infra::{CommandDispatcher, Config, CsvMovementStore, DispatchError, MovementStore};
use milkstock_inventory::{Movement, RegisterIntake, RegisterWithdrawal, StockCommand};
use milkstock_observability::LogFormat;

use crate::menu::{Menu, DEFAULT_LOCATION};

#[derive(Debug, Parser)]
#[command(name = "milkstock", version, about = "Breast-milk bag inventory")]
pub struct Cli {
    /// Movement log CSV (overrides MILKSTOCK_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Log output on stderr: text or json (overrides MILKSTOCK_LOG_FORMAT)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive numbered menu (default)
    Menu,
    /// Register bags entering the stock
    Intake {
        /// Volume per bag in ml
        #[arg(long)]
        volume: u32,
        #[arg(long, default_value_t = 1)]
        bags: u32,
        /// Movement date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = DEFAULT_LOCATION)]
        location: String,
        /// Extraction date
        #[arg(long)]
        extracted: Option<NaiveDate>,
        /// Expiry date
        #[arg(long)]
        expires: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Register bags leaving the stock
    Withdraw {
        /// Volume per bag in ml
        #[arg(long)]
        volume: u32,
        #[arg(long, default_value_t = 1)]
        bags: u32,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Print the stock report
    Report {
        #[arg(long)]
        json: bool,
        /// Number of suggested batches
        #[arg(long)]
        top: Option<usize>,
        /// Number of recent movements
        #[arg(long)]
        recent: Option<usize>,
    },
    /// Write the summary CSV
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        recent: Option<usize>,
    },
    /// Write the whole log as a JSON backup
    Backup {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load a JSON backup into an empty log
    Restore {
        /// Backup file, defaults to the configured backup path
        path: Option<PathBuf>,
    },
}

impl Cli {
    /// Command-line flags take precedence over the environment.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.data_file {
            config.data_file = path.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

/// Runs one invocation against the configured movement log.
pub fn run<R: BufRead, W: Write>(
    command: Option<Command>,
    config: &Config,
    today: NaiveDate,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    let dispatcher = CommandDispatcher::new(CsvMovementStore::new(&config.data_file));

    match command.unwrap_or(Command::Menu) {
        Command::Menu => {
            Menu::new(&dispatcher, config, today, input, output).run()?;
        }
        Command::Intake {
            volume,
            bags,
            date,
            location,
            extracted,
            expires,
            note,
        } => {
            let cmd = RegisterIntake {
                date: date.unwrap_or(today),
                unit_volume_ml: volume,
                bag_count: bags,
                location,
                extraction_date: extracted,
                expiry_date: expires,
                note,
            };
            let total = cmd.total_ml();
            let outcome = dispatcher.dispatch(StockCommand::RegisterIntake(cmd));
            report_outcome(outcome, &format!("Intake registered: {total} ml."), &mut output)?;
        }
        Command::Withdraw {
            volume,
            bags,
            date,
            note,
        } => {
            let cmd = RegisterWithdrawal {
                date: date.unwrap_or(today),
                unit_volume_ml: volume,
                bag_count: bags,
                note,
            };
            let total = cmd.total_ml();
            let outcome = dispatcher.dispatch(StockCommand::RegisterWithdrawal(cmd));
            report_outcome(outcome, &format!("Withdrawal registered: {total} ml."), &mut output)?;
        }
        Command::Report { json, top, recent } => {
            let mut options = config.report;
            options.top_n = top.unwrap_or(options.top_n);
            options.recent = recent.unwrap_or(options.recent);

            let movements = dispatcher.store().load_all()?;
            let report = StockReport::build(&movements, &options);
            if json {
                writeln!(output, "{}", report.to_json()?)?;
            } else {
                report.render_text(&mut output)?;
            }
        }
        Command::Export { out, recent } => {
            let path = out.unwrap_or_else(|| config.export_file.clone());
            let movements = dispatcher.store().load_all()?;
            export_summary_to_path(&movements, recent.unwrap_or(config.export_recent), &path)
                .with_context(|| format!("failed to export summary to {}", path.display()))?;
            writeln!(output, "Summary exported to {}.", path.display())?;
        }
        Command::Backup { out } => {
            let path = out.unwrap_or_else(|| config.backup_file.clone());
            let movements = dispatcher.store().load_all()?;
            write_backup_to_path(&movements, &path)?;
            writeln!(
                output,
                "Backed up {} movement(s) to {}.",
                movements.len(),
                path.display()
            )?;
        }
        Command::Restore { path } => {
            let path = path.unwrap_or_else(|| config.backup_file.clone());
            let file = std::fs::File::open(&path)
                .with_context(|| format!("failed to open backup {}", path.display()))?;
            let movements = read_backup(std::io::BufReader::new(file))?;
            let count = restore(dispatcher.store(), &movements)?;
            writeln!(output, "Restored {count} movement(s).")?;
        }
    }

    Ok(())
}

/// Rejections are operator feedback, not failures; only a broken log aborts.
fn report_outcome<W: Write>(
    outcome: Result<Vec<Movement>, DispatchError>,
    success: &str,
    output: &mut W,
) -> anyhow::Result<()> {
    match outcome {
        Ok(_) => writeln!(output, "{success}")?,
        Err(err) if err.is_fatal() => {
            return Err(anyhow::Error::new(err).context("movement log unavailable"));
        }
        Err(err) => writeln!(output, "Rejected: {err}")?,
    }
    Ok(())
}
