//! Performance benchmarks for the Payroll Engine.
//!
//! Covers the per-employee calculator, aggregation, and full run creation
//! for growing head counts.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use payroll_engine::calculation::{aggregate_lines, calculate_payroll_line};
use payroll_engine::config::{PolicyConfig, TaxTable};
use payroll_engine::lifecycle::{InMemoryDirectory, InMemoryLedger, PayrollRunManager};
use payroll_engine::models::{CompensationInput, PayrollLine, RunConfiguration};

fn run_config(month: u32) -> RunConfiguration {
    RunConfiguration {
        month,
        year: 2025,
        include_13th_month: month == 12,
        airtime_data_percentage: Decimal::from(2),
    }
}

/// Creates a head count with salaries spread across every PAYE band.
fn create_staff(count: usize) -> Vec<CompensationInput> {
    (0..count)
        .map(|i| CompensationInput {
            employee_id: format!("emp_{:05}", i),
            employee_name: format!("Employee {}", i),
            annual_basic_salary: Decimal::from(300_000 + (i as i64 % 97) * 75_000),
            bank: (i % 50 != 0).then(|| "GTBank".to_string()),
            account_number: (i % 50 != 0).then(|| format!("{:010}", i)),
        })
        .collect()
}

/// Benchmark: one payslip.
fn bench_single_payslip(c: &mut Criterion) {
    let policy = PolicyConfig::standard();
    let table = TaxTable::standard();
    let config = run_config(3);
    let staff = create_staff(1);
    let input = &staff[0];

    c.bench_function("single_payslip", |b| {
        b.iter(|| {
            black_box(calculate_payroll_line(
                black_box(input),
                &config,
                policy.rates(),
                &table,
            ))
        })
    });
}

/// Benchmark: aggregating 1000 lines.
fn bench_aggregate_1000(c: &mut Criterion) {
    let policy = PolicyConfig::standard();
    let table = TaxTable::standard();
    let config = run_config(3);
    let lines: Vec<PayrollLine> = create_staff(1000)
        .iter()
        .map(|input| calculate_payroll_line(input, &config, policy.rates(), &table).line)
        .collect();

    let mut group = c.benchmark_group("aggregation");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("aggregate_1000", |b| {
        b.iter(|| black_box(aggregate_lines(black_box(&lines))))
    });
    group.finish();
}

/// Benchmark: creating a draft run for various head counts.
///
/// Each iteration uses a fresh manager so the period is always free.
fn bench_create_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_run");
    group.sample_size(20);

    for head_count in [10usize, 100, 1000].iter() {
        let directory = Arc::new(InMemoryDirectory::new(create_staff(*head_count)));

        group.throughput(Throughput::Elements(*head_count as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", head_count),
            head_count,
            |b, _| {
                b.iter(|| {
                    let manager = PayrollRunManager::new(
                        PolicyConfig::standard(),
                        directory.clone(),
                        Arc::new(InMemoryLedger::new()),
                    );
                    black_box(manager.create_run(run_config(3)))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_payslip,
    bench_aggregate_1000,
    bench_create_run,
);
criterion_main!(benches);
