use std::io::{self, Write};

use serde::Serialize;

use milkstock_inventory::{
    balance_by_unit_volume, suggested_consumption_order, total_balance, BatchRemainder, Movement,
};

use super::recent;

/// How much of each list the report shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    /// Entries of the use-first list.
    pub top_n: usize,
    /// Tail of the raw ledger.
    pub recent: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { top_n: 5, recent: 5 }
    }
}

/// Net balance of one bag size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeBalance {
    pub unit_volume_ml: u32,
    pub net_ml: i64,
}

/// Snapshot of the stock for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReport<'a> {
    pub total_ml: i64,
    /// Ascending by bag size.
    pub by_unit_volume: Vec<VolumeBalance>,
    /// Use-first batches, truncated to `top_n`.
    pub suggestions: Vec<BatchRemainder<'a>>,
    pub recent: &'a [Movement],
}

impl<'a> StockReport<'a> {
    pub fn build(movements: &'a [Movement], options: &ReportOptions) -> Self {
        let by_unit_volume = balance_by_unit_volume(movements)
            .into_iter()
            .map(|(unit_volume_ml, net_ml)| VolumeBalance {
                unit_volume_ml,
                net_ml,
            })
            .collect();

        let mut suggestions = suggested_consumption_order(movements);
        suggestions.truncate(options.top_n);

        Self {
            total_ml: total_balance(movements),
            by_unit_volume,
            suggestions,
            recent: recent(movements, options.recent),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "=== STOCK REPORT ===")?;
        writeln!(out, "Total balance: {} ml", self.total_ml)?;
        writeln!(out, "Balance by bag size:")?;
        for v in &self.by_unit_volume {
            writeln!(out, "  {} ml -> {} ml", v.unit_volume_ml, v.net_ml)?;
        }

        writeln!(out)?;
        writeln!(out, "Use first (expiry / FIFO):")?;
        if self.suggestions.is_empty() {
            writeln!(out, "  No batch with remaining stock.")?;
        }
        for b in &self.suggestions {
            let m = b.movement;
            let expiry = m
                .expiry_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "n/a".to_string());
            writeln!(
                out,
                "  Date: {} | Volume: {} ml | Bags: {} | Remaining: {} ml | Expiry: {}",
                m.date, m.unit_volume_ml, m.bag_count, b.remaining_ml, expiry
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Recent movements:")?;
        for m in self.recent {
            let note = if m.note.is_empty() { "-" } else { m.note.as_str() };
            writeln!(out, "  [{}] {} | {} ml | Note: {}", m.kind, m.date, m.total_ml(), note)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use milkstock_inventory::{MovementKind, DATE_FORMAT};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn movement(kind: MovementKind, on: &str, unit: u32, bags: u32) -> Movement {
        Movement {
            kind,
            date: date(on),
            unit_volume_ml: unit,
            bag_count: bags,
            location: String::new(),
            extraction_date: None,
            expiry_date: None,
            note: String::new(),
        }
    }

    fn scenario() -> Vec<Movement> {
        let mut b = movement(MovementKind::Intake, "2023-01-05", 150, 1);
        b.expiry_date = Some(date("2023-02-01"));
        let mut w = movement(MovementKind::Withdrawal, "2023-01-10", 250, 1);
        w.note = "daycare".to_string();
        vec![movement(MovementKind::Intake, "2023-01-01", 100, 2), b, w]
    }

    #[test]
    fn text_report_lists_balances_suggestions_and_recent() {
        let movements = scenario();
        let report = StockReport::build(&movements, &ReportOptions::default());
        let mut out = Vec::new();
        report.render_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total balance: 100 ml"));
        assert!(text.contains("  100 ml -> 200 ml\n  150 ml -> 150 ml\n  250 ml -> -250 ml"));
        assert!(text.contains(
            "  Date: 2023-01-05 | Volume: 150 ml | Bags: 1 | Remaining: 100 ml | Expiry: 2023-02-01"
        ));
        assert!(text.contains("  [entrada] 2023-01-01 | 200 ml | Note: -"));
        assert!(text.contains("  [saida] 2023-01-10 | 250 ml | Note: daycare"));
    }

    #[test]
    fn empty_ledger_says_nothing_is_available() {
        let report = StockReport::build(&[], &ReportOptions::default());
        let mut out = Vec::new();
        report.render_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total balance: 0 ml"));
        assert!(text.contains("No batch with remaining stock."));
    }

    #[test]
    fn lists_are_truncated_by_options() {
        let movements: Vec<Movement> = (1..=9)
            .map(|day| movement(MovementKind::Intake, &format!("2023-01-0{day}"), 100, 1))
            .collect();
        let report = StockReport::build(&movements, &ReportOptions { top_n: 2, recent: 3 });
        assert_eq!(report.suggestions.len(), 2);
        assert_eq!(report.suggestions[0].movement.date, date("2023-01-01"));
        assert_eq!(report.recent, &movements[6..]);
    }

    #[test]
    fn json_report_carries_the_same_facts() {
        let movements = scenario();
        let report = StockReport::build(&movements, &ReportOptions::default());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["total_ml"], 100);
        assert_eq!(value["by_unit_volume"][0]["unit_volume_ml"], 100);
        assert_eq!(value["suggestions"][0]["remaining_ml"], 100);
        assert_eq!(value["suggestions"][0]["movement"]["validade"], "2023-02-01");
        assert_eq!(value["recent"].as_array().unwrap().len(), 3);
    }
}
