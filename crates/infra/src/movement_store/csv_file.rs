//! CSV-file backed movement log.
//!
//! One row per movement, header
//! `tipo,data,volume_ml,quantidade_sacos,local,data_ordenha,validade,observacao`.
//! Dates are `YYYY-MM-DD`; an empty cell means "not set".

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use milkstock_core::DomainError;
use milkstock_inventory::input::{parse_optional_date, parse_required_int};
use milkstock_inventory::{Movement, MovementKind, DATE_FORMAT};

use super::r#trait::{MovementStore, MovementStoreError};

/// Column names, in persisted order.
pub const HEADER: [&str; 8] = [
    "tipo",
    "data",
    "volume_ml",
    "quantidade_sacos",
    "local",
    "data_ordenha",
    "validade",
    "observacao",
];

/// Raw persisted row. Every cell is kept as text so parse failures can be
/// reported with their line instead of a generic serde error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct MovementRow {
    tipo: String,
    data: String,
    volume_ml: String,
    quantidade_sacos: String,
    local: String,
    data_ordenha: String,
    validade: String,
    observacao: String,
}

fn format_optional(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn reason(err: DomainError) -> String {
    match err {
        DomainError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

impl From<&Movement> for MovementRow {
    fn from(m: &Movement) -> Self {
        Self {
            tipo: m.kind.as_str().to_string(),
            data: m.date.format(DATE_FORMAT).to_string(),
            volume_ml: m.unit_volume_ml.to_string(),
            quantidade_sacos: m.bag_count.to_string(),
            local: m.location.clone(),
            data_ordenha: format_optional(m.extraction_date),
            validade: format_optional(m.expiry_date),
            observacao: m.note.clone(),
        }
    }
}

impl TryFrom<MovementRow> for Movement {
    type Error = String;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind: MovementKind = row.tipo.parse().map_err(reason)?;
        let date = parse_optional_date("data", &row.data)
            .map_err(reason)?
            .ok_or_else(|| "data is required".to_string())?;
        let unit_volume_ml = parse_required_int("volume_ml", &row.volume_ml).map_err(reason)?;
        let bag_count = parse_required_int("quantidade_sacos", &row.quantidade_sacos).map_err(reason)?;
        if unit_volume_ml == 0 || bag_count == 0 {
            return Err(format!(
                "volume_ml and quantidade_sacos must be positive, got {unit_volume_ml} x {bag_count}"
            ));
        }

        Ok(Movement {
            kind,
            date,
            unit_volume_ml,
            bag_count,
            location: row.local,
            extraction_date: parse_optional_date("data_ordenha", &row.data_ordenha).map_err(reason)?,
            expiry_date: parse_optional_date("validade", &row.validade).map_err(reason)?,
            note: row.observacao,
        })
    }
}

/// Movement log kept in a single CSV file.
///
/// The path is plain configuration; nothing is cached between calls, so every
/// `load_all` reflects what is on disk.
#[derive(Debug, Clone)]
pub struct CsvMovementStore {
    path: PathBuf,
}

impl CsvMovementStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it is missing or empty.
    pub fn ensure_initialized(&self) -> Result<(), MovementStoreError> {
        let is_empty = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };
        if !is_empty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        tracing::debug!(path = %self.path.display(), "initialized empty movement log");
        Ok(())
    }

    /// Serialize every row first, then land them with one write so a bad row
    /// or a failed write never leaves part of the batch in the file.
    fn write_rows(&self, movements: &[Movement]) -> Result<(), MovementStoreError> {
        self.ensure_initialized()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for m in movements {
            writer.serialize(MovementRow::from(m))?;
        }
        let rows = writer.into_inner().map_err(|e| e.into_error())?;

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        let mut bytes = Vec::with_capacity(rows.len() + 1);
        if Self::needs_leading_newline(&mut file)? {
            bytes.push(b'\n');
        }
        bytes.extend_from_slice(&rows);

        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(())
    }

    /// `true` when the file is non-empty and its last byte is not a newline.
    fn needs_leading_newline(file: &mut File) -> std::io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

impl MovementStore for CsvMovementStore {
    fn load_all(&self) -> Result<Vec<Movement>, MovementStoreError> {
        self.ensure_initialized()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if !headers.iter().eq(HEADER.iter().copied()) {
            return Err(MovementStoreError::malformed(
                1,
                format!(
                    "unexpected header '{}' (expected '{}')",
                    headers.iter().collect::<Vec<_>>().join(","),
                    HEADER.join(",")
                ),
            ));
        }

        let mut movements = Vec::new();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    return Err(MovementStoreError::malformed(line, e.to_string()));
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            let row: MovementRow = record
                .deserialize(Some(&headers))
                .map_err(|e| MovementStoreError::malformed(line, e.to_string()))?;
            let movement =
                Movement::try_from(row).map_err(|reason| MovementStoreError::malformed(line, reason))?;
            movements.push(movement);
        }

        tracing::debug!(path = %self.path.display(), count = movements.len(), "loaded movement log");
        Ok(movements)
    }

    fn append(&self, movement: &Movement) -> Result<(), MovementStoreError> {
        self.write_rows(std::slice::from_ref(movement))?;
        tracing::info!(
            path = %self.path.display(),
            kind = %movement.kind,
            total_ml = movement.total_ml(),
            "appended movement"
        );
        Ok(())
    }

    fn append_batch(&self, movements: &[Movement]) -> Result<(), MovementStoreError> {
        if movements.is_empty() {
            return Ok(());
        }
        self.write_rows(movements)?;
        tracing::info!(path = %self.path.display(), count = movements.len(), "appended movements");
        Ok(())
    }
}
