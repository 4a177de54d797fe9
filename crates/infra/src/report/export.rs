//! Flat CSV snapshot of the stock summary.
//!
//! Layout:
//!
//! ```text
//! tipo,descricao,valor
//! saldo_total_ml,Saldo total,<total>
//! saldo_volume_ml,<volume> ml,<net>        (one per bag size, ascending)
//!
//! tipo,data,total_ml,observacao
//! <last N movements in ledger order>
//! ```

use std::io::Write;
use std::path::Path;

use milkstock_inventory::{balance_by_unit_volume, total_balance, Movement, DATE_FORMAT};

use super::recent;

/// Movements included in an export unless configured otherwise.
pub const DEFAULT_EXPORT_RECENT: usize = 10;

pub fn export_summary<W: Write>(movements: &[Movement], recent_count: usize, mut out: W) -> csv::Result<()> {
    {
        let mut writer = csv::Writer::from_writer(&mut out);
        writer.write_record(["tipo", "descricao", "valor"])?;
        writer.write_record([
            "saldo_total_ml",
            "Saldo total",
            total_balance(movements).to_string().as_str(),
        ])?;
        for (volume, net) in balance_by_unit_volume(movements) {
            writer.write_record([
                "saldo_volume_ml",
                format!("{volume} ml").as_str(),
                net.to_string().as_str(),
            ])?;
        }
        writer.flush()?;
    }

    out.write_all(b"\n")?;

    let mut writer = csv::Writer::from_writer(&mut out);
    writer.write_record(["tipo", "data", "total_ml", "observacao"])?;
    for m in recent(movements, recent_count) {
        writer.write_record([
            m.kind.as_str(),
            m.date.format(DATE_FORMAT).to_string().as_str(),
            m.total_ml().to_string().as_str(),
            m.note.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Overwrite `path` with a fresh summary.
pub fn export_summary_to_path(movements: &[Movement], recent_count: usize, path: &Path) -> csv::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    export_summary(movements, recent_count, &mut file)?;
    file.flush()?;
    tracing::info!(path = %path.display(), "exported stock summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use milkstock_inventory::MovementKind;

    fn movement(kind: MovementKind, day: u32, unit: u32, bags: u32, note: &str) -> Movement {
        Movement {
            kind,
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
            unit_volume_ml: unit,
            bag_count: bags,
            location: String::new(),
            extraction_date: None,
            expiry_date: None,
            note: note.to_string(),
        }
    }

    #[test]
    fn summary_has_balances_blank_line_and_recent_movements() {
        let movements = vec![
            movement(MovementKind::Intake, 1, 100, 2, ""),
            movement(MovementKind::Intake, 5, 150, 1, "noite"),
            movement(MovementKind::Withdrawal, 10, 100, 1, "creche, manhã"),
        ];
        let mut out = Vec::new();
        export_summary(&movements, DEFAULT_EXPORT_RECENT, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tipo,descricao,valor\n\
             saldo_total_ml,Saldo total,250\n\
             saldo_volume_ml,100 ml,100\n\
             saldo_volume_ml,150 ml,150\n\
             \n\
             tipo,data,total_ml,observacao\n\
             entrada,2023-01-01,200,\n\
             entrada,2023-01-05,150,noite\n\
             saida,2023-01-10,100,\"creche, manhã\"\n"
        );
    }

    #[test]
    fn only_the_last_movements_are_exported() {
        let movements: Vec<Movement> = (1..=12)
            .map(|day| movement(MovementKind::Intake, day, 100, 1, ""))
            .collect();
        let mut out = Vec::new();
        export_summary(&movements, DEFAULT_EXPORT_RECENT, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let rows: Vec<_> = text.split("\n\n").nth(1).unwrap().lines().skip(1).collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], "entrada,2023-01-03,100,");
        assert_eq!(rows[9], "entrada,2023-01-12,100,");
    }

    #[test]
    fn export_to_path_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumo.csv");
        std::fs::write(&path, "stale").unwrap();

        export_summary_to_path(&[], DEFAULT_EXPORT_RECENT, &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "tipo,descricao,valor\nsaldo_total_ml,Saldo total,0\n\ntipo,data,total_ml,observacao\n"
        );
    }
}
