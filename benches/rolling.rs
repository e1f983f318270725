use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

use kitting::{
    BomLine, DeductionPolicy, InventorySnapshot, KittingCalculator, KittingConfig, PlanLine,
    WorkOrder, WorkOrderDirectory, WorkOrderKey,
};

/// 合成資料：工單數 × 每單 8 項物料（物料池 64 項共用），排 10 天
fn fixture(orders: usize) -> (Vec<PlanLine>, WorkOrderDirectory, InventorySnapshot) {
    let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();

    let directory: WorkOrderDirectory = (0..orders)
        .map(|i| {
            let mut order = WorkOrder::new(
                WorkOrderKey::new("5101", &format!("{:06}", i)),
                Decimal::from(500),
            );
            for j in 0..8 {
                let component = (i * 7 + j * 13) % 64;
                order.add_bom_line(BomLine::new(
                    format!("C{:03}", component),
                    Decimal::from(500 * (j as i64 + 1)),
                    Decimal::from((i % 5) as i64 * 10),
                ));
            }
            order
        })
        .collect();

    let snapshot: InventorySnapshot = (0..64)
        .map(|c| (format!("C{:03}", c), Decimal::from(20_000)))
        .collect();

    let plan_lines: Vec<PlanLine> = (0..orders * 10)
        .map(|n| {
            let order = n % orders;
            PlanLine::new(
                start + Duration::days((n / orders) as i64),
                WorkOrderKey::new("5101", &format!("{:06}", order)),
                40 + (n % 30) as u64,
            )
            .with_source_row(order + 4)
        })
        .collect();

    (plan_lines, directory, snapshot)
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_calculate");

    for orders in [50usize, 200, 1000] {
        let (plan_lines, directory, snapshot) = fixture(orders);
        let calculator = KittingCalculator::default();

        group.bench_with_input(BenchmarkId::from_parameter(orders), &orders, |b, _| {
            b.iter(|| {
                let run = calculator.calculate(
                    black_box(&plan_lines),
                    black_box(&directory),
                    black_box(&snapshot),
                );
                assert_eq!(run.results.len(), plan_lines.len());
            });
        });
    }

    group.finish();
}

fn bench_row_reports(c: &mut Criterion) {
    let (plan_lines, directory, snapshot) = fixture(200);
    let calculator = KittingCalculator::new(
        KittingConfig::new().with_deduction_policy(DeductionPolicy::Conservative),
    );
    let run = calculator.calculate(&plan_lines, &directory, &snapshot);

    c.bench_function("row_reports_200", |b| {
        b.iter(|| {
            let rows = black_box(&run).row_reports();
            assert_eq!(rows.len(), 200);
        });
    });
}

criterion_group!(benches, bench_calculate, bench_row_reports);
criterion_main!(benches);
