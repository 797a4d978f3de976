use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rust_decimal::Decimal;
use stockaudit_inventory::{TheoreticalInventory, TheoreticalItem};
use stockaudit_reconciliation::ReconciliationEngine;

/// Warehouse with `keys` products spread over 3 locations each.
fn warehouse(keys: usize) -> TheoreticalInventory {
    let items = (0..keys)
        .map(|i| {
            let locations = (0..3u8).map(|j| format!("R{}{}-B-{}", i % 100, (b'A' + j) as char, i % 37));
            TheoreticalItem::new(format!("P{i:05}"), format!("REF{}", i % 17), Decimal::from(i as u64 % 50), locations)
                .expect("non-negative quantity")
        })
        .collect();
    TheoreticalInventory::from_items("BENCH", items).expect("unique keys")
}

/// Mix of exact-suffix, structural-fallback and unattributable scans.
fn scans(keys: usize, count: usize) -> Vec<String> {
    (0..count)
        .map(|n| {
            let i = (n * 7919) % keys;
            match n % 4 {
                0 | 1 => format!("P{i:05}REF{}R{}A-B-{}", i % 17, i % 100, i % 37),
                2 => format!("P{i:05}REF{}R999-Z-Z", i % 17),
                _ => format!("UNKNOWN{n}"),
            }
        })
        .collect()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    for keys in [100usize, 500, 2_000] {
        let engine = ReconciliationEngine::new(warehouse(keys));
        let scans = scans(keys, 1_000);
        group.throughput(Throughput::Elements(scans.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(keys), &scans, |b, scans| {
            b.iter(|| {
                for scan in scans {
                    black_box(engine.decompose(black_box(scan)));
                }
            })
        });
    }
    group.finish();
}

fn bench_passes(c: &mut Criterion) {
    let engine = ReconciliationEngine::new(warehouse(500));
    let scans = scans(500, 5_000);

    c.bench_function("record_pass_5000_scans", |b| {
        b.iter(|| black_box(engine.reconcile_records(black_box(&scans))))
    });
    c.bench_function("location_pass_5000_scans", |b| {
        b.iter(|| black_box(engine.reconcile_locations(black_box(&scans))))
    });
}

criterion_group!(benches, bench_decompose, bench_passes);
criterion_main!(benches);
