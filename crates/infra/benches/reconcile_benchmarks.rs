use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{Duration, NaiveDate};
use milkstock_infra::movement_store::{CsvMovementStore, InMemoryMovementStore, MovementStore};
use milkstock_inventory::{
    balance_by_unit_volume, batches_with_remainder, suggested_consumption_order, total_balance,
    Movement, MovementKind,
};

/// A plausible ledger: daily intakes of mixed bag sizes, a withdrawal every third day.
fn synthetic_ledger(len: usize) -> Vec<Movement> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let sizes = [50u32, 100, 150, 200];
    (0..len)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            if i % 3 == 2 {
                Movement {
                    kind: MovementKind::Withdrawal,
                    date,
                    unit_volume_ml: 100,
                    bag_count: 1,
                    location: String::new(),
                    extraction_date: None,
                    expiry_date: None,
                    note: String::new(),
                }
            } else {
                Movement {
                    kind: MovementKind::Intake,
                    date,
                    unit_volume_ml: sizes[i % sizes.len()],
                    bag_count: 1 + (i % 3) as u32,
                    location: "freezer".to_string(),
                    extraction_date: Some(date - Duration::days((i % 4) as i64)),
                    expiry_date: (i % 5 != 0).then(|| date + Duration::days(90 - (i % 30) as i64)),
                    note: String::new(),
                }
            }
        })
        .collect()
}

fn bench_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation");

    for len in [100usize, 1_000, 10_000].iter() {
        let ledger = synthetic_ledger(*len);
        group.throughput(Throughput::Elements(*len as u64));

        group.bench_with_input(BenchmarkId::new("balances", len), &ledger, |b, ledger| {
            b.iter(|| {
                black_box(total_balance(black_box(ledger)));
                black_box(balance_by_unit_volume(black_box(ledger)));
            });
        });

        group.bench_with_input(BenchmarkId::new("batches_with_remainder", len), &ledger, |b, ledger| {
            b.iter(|| black_box(batches_with_remainder(black_box(ledger)).len()));
        });

        group.bench_with_input(BenchmarkId::new("suggested_order", len), &ledger, |b, ledger| {
            b.iter(|| black_box(suggested_consumption_order(black_box(ledger)).len()));
        });
    }

    group.finish();
}

fn bench_load_and_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_and_reconcile");

    for len in [100usize, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*len as u64));

        let memory = InMemoryMovementStore::with_movements(synthetic_ledger(*len));
        group.bench_with_input(BenchmarkId::new("in_memory", len), &memory, |b, store| {
            b.iter(|| {
                let movements = store.load_all().unwrap();
                black_box(suggested_consumption_order(&movements).len());
            });
        });

        // Seeding appends row by row; keep the file-backed case small.
        if *len > 1_000 {
            continue;
        }
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvMovementStore::new(dir.path().join("leite_estoque.csv"));
        for m in synthetic_ledger(*len) {
            csv.append(&m).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("csv_file", len), &csv, |b, store| {
            b.iter(|| {
                let movements = store.load_all().unwrap();
                black_box(suggested_consumption_order(&movements).len());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconciliation, bench_load_and_reconcile);
criterion_main!(benches);
