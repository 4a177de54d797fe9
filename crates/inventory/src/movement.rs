use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use milkstock_core::{DomainError, ValueObject};

/// Date format used everywhere a date is read or written (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a movement.
///
/// Persisted as `entrada` / `saida`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "entrada")]
    Intake,
    #[serde(rename = "saida")]
    Withdrawal,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Intake => "entrada",
            MovementKind::Withdrawal => "saida",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entrada" => Ok(MovementKind::Intake),
            "saida" => Ok(MovementKind::Withdrawal),
            other => Err(DomainError::invalid_input(format!(
                "unknown movement kind '{other}' (expected 'entrada' or 'saida')"
            ))),
        }
    }
}

/// One immutable inventory event: bags going into or out of storage.
///
/// Field names on the wire follow the persisted log columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    /// Logical date of the event.
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "volume_ml")]
    pub unit_volume_ml: u32,
    #[serde(rename = "quantidade_sacos")]
    pub bag_count: u32,
    /// Storage location (intake only; empty for withdrawals).
    #[serde(rename = "local", default)]
    pub location: String,
    /// When the milk was expressed (intake only).
    #[serde(rename = "data_ordenha", default, with = "optional_date")]
    pub extraction_date: Option<NaiveDate>,
    #[serde(rename = "validade", default, with = "optional_date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "observacao", default)]
    pub note: String,
}

impl ValueObject for Movement {}

impl Movement {
    pub fn is_intake(&self) -> bool {
        self.kind == MovementKind::Intake
    }

    pub fn is_withdrawal(&self) -> bool {
        self.kind == MovementKind::Withdrawal
    }

    /// Volume of the whole batch: unit volume × bag count.
    pub fn total_ml(&self) -> i64 {
        i64::from(self.unit_volume_ml) * i64::from(self.bag_count)
    }

    /// `total_ml` signed by direction (+ intake, − withdrawal).
    pub fn signed_ml(&self) -> i64 {
        match self.kind {
            MovementKind::Intake => self.total_ml(),
            MovementKind::Withdrawal => -self.total_ml(),
        }
    }

    /// FIFO key: extraction date when known, entry date otherwise.
    pub fn allocation_date(&self) -> NaiveDate {
        self.extraction_date.unwrap_or(self.date)
    }
}

/// Optional dates travel as `""` when unset, matching the persisted log.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn intake(unit: u32, bags: u32) -> Movement {
        Movement {
            kind: MovementKind::Intake,
            date: date("2023-01-05"),
            unit_volume_ml: unit,
            bag_count: bags,
            location: "freezer".to_string(),
            extraction_date: None,
            expiry_date: None,
            note: String::new(),
        }
    }

    #[test]
    fn total_is_unit_volume_times_bag_count() {
        assert_eq!(intake(150, 3).total_ml(), 450);
        assert_eq!(intake(150, 3).signed_ml(), 450);
    }

    #[test]
    fn withdrawal_is_signed_negative() {
        let mut m = intake(100, 2);
        m.kind = MovementKind::Withdrawal;
        assert_eq!(m.total_ml(), 200);
        assert_eq!(m.signed_ml(), -200);
    }

    #[test]
    fn total_does_not_overflow_u32() {
        assert_eq!(intake(u32::MAX, 2).total_ml(), i64::from(u32::MAX) * 2);
    }

    #[test]
    fn allocation_date_prefers_extraction_date() {
        let mut m = intake(100, 1);
        assert_eq!(m.allocation_date(), date("2023-01-05"));
        m.extraction_date = Some(date("2022-12-30"));
        assert_eq!(m.allocation_date(), date("2022-12-30"));
    }

    #[test]
    fn kind_round_trips_through_its_persisted_name() {
        assert_eq!("entrada".parse::<MovementKind>().unwrap(), MovementKind::Intake);
        assert_eq!(" saida ".parse::<MovementKind>().unwrap(), MovementKind::Withdrawal);
        assert_eq!(MovementKind::Withdrawal.to_string(), "saida");
        match "ajuste".parse::<MovementKind>() {
            Err(DomainError::InvalidInput(msg)) if msg.contains("ajuste") => {}
            other => panic!("expected invalid input, got {other:?}"),
        }
    }
}
