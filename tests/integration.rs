//! Integration tests for the Payroll Engine.
//!
//! This test suite covers:
//! - Payslip calculation for reference salaries
//! - Run creation, period uniqueness and recomputation
//! - Processing, ledger posting and rollback on ledger failure
//! - Disbursement export
//! - Concurrent callers on the same period and the same run
//! - The HTTP surface

use std::str::FromStr;
use std::sync::{Arc, Barrier};
use std::thread;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::calculation::{aggregate_lines, calculate_payroll_line};
use payroll_engine::config::{ConfigLoader, PolicyConfig, TaxTable};
use payroll_engine::error::EngineError;
use payroll_engine::lifecycle::{
    CallerContext, InMemoryDirectory, InMemoryLedger, PayrollRunManager,
};
use payroll_engine::models::{CompensationInput, RunConfiguration, RunStatus, WarningCode};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn employee(id: &str, name: &str, annual: &str) -> CompensationInput {
    CompensationInput {
        employee_id: id.to_string(),
        employee_name: name.to_string(),
        annual_basic_salary: decimal(annual),
        bank: Some("GTBank".to_string()),
        account_number: Some("0123456789".to_string()),
    }
}

fn staff() -> Vec<CompensationInput> {
    vec![
        employee("emp_001", "Ada Obi", "1200000"),
        employee("emp_002", "Tunde Bello", "3600000"),
        employee("emp_003", "Chioma Eze", "480000"),
        employee("emp_004", "Musa Ibrahim", "9999999.99"),
    ]
}

fn run_config(month: u32, year: i32) -> RunConfiguration {
    RunConfiguration {
        month,
        year,
        include_13th_month: false,
        airtime_data_percentage: Decimal::ZERO,
    }
}

struct Harness {
    manager: Arc<PayrollRunManager>,
    directory: Arc<InMemoryDirectory>,
    ledger: Arc<InMemoryLedger>,
}

fn harness(employees: Vec<CompensationInput>) -> Harness {
    let directory = Arc::new(InMemoryDirectory::new(employees));
    let ledger = Arc::new(InMemoryLedger::new());
    let manager = Arc::new(PayrollRunManager::new(
        PolicyConfig::standard(),
        directory.clone(),
        ledger.clone(),
    ));
    Harness {
        manager,
        directory,
        ledger,
    }
}

fn approver() -> CallerContext {
    CallerContext::new("finance.lead")
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// =============================================================================
// Payslip Calculation
// =============================================================================

#[test]
fn test_reference_salary_payslip() {
    let input = employee("emp_001", "Ada Obi", "1200000");
    let result = calculate_payroll_line(
        &input,
        &run_config(3, 2025),
        PolicyConfig::standard().rates(),
        &TaxTable::standard(),
    );
    let line = result.line;

    assert_eq!(line.basic_salary, decimal("100000"));
    assert_eq!(line.allowances, decimal("50000"));
    assert_eq!(line.gross_pay, decimal("150000"));
    assert_eq!(line.pension, decimal("12000"));
    assert_eq!(line.nhf, decimal("2500"));
    assert_eq!(line.cra, decimal("560000"));
    assert_eq!(line.taxable_income, decimal("1066000"));
    assert_eq!(line.paye, decimal("10325"));
    assert_eq!(line.net_pay, decimal("125175"));

    let band_total: Decimal = result.paye_bands.iter().map(|b| b.tax).sum();
    assert_eq!(band_total, decimal("123900"));
}

#[test]
fn test_zero_salary_payslip() {
    let input = employee("emp_000", "Intern", "0");
    let result = calculate_payroll_line(
        &input,
        &run_config(3, 2025),
        PolicyConfig::standard().rates(),
        &TaxTable::standard(),
    );
    let line = result.line;

    assert_eq!(line.gross_pay, Decimal::ZERO);
    assert_eq!(line.cra, decimal("200000"));
    assert_eq!(line.taxable_income, Decimal::ZERO);
    assert_eq!(line.paye, Decimal::ZERO);
    assert_eq!(line.pension, Decimal::ZERO);
    assert_eq!(line.nhf, Decimal::ZERO);
    assert_eq!(line.net_pay, Decimal::ZERO);
}

#[test]
fn test_loaded_configuration_matches_standard_policy() {
    let loader = ConfigLoader::load("./config/ng_paye").expect("Failed to load config");
    let input = employee("emp_002", "Tunde Bello", "3600000");

    let from_files = calculate_payroll_line(
        &input,
        &run_config(3, 2025),
        loader.rates(),
        loader.tax_table_for(chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap(),
    );
    let standard = calculate_payroll_line(
        &input,
        &run_config(3, 2025),
        PolicyConfig::standard().rates(),
        &TaxTable::standard(),
    );

    assert_eq!(from_files.line, standard.line);
}

// =============================================================================
// Run Creation
// =============================================================================

#[test]
fn test_run_totals_equal_sum_of_lines() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();

    let lines = &created.lines;
    let totals = &created.run.totals;
    assert_eq!(totals.employee_count as usize, lines.len());
    assert_eq!(totals.total_gross, lines.iter().map(|l| l.gross_pay).sum::<Decimal>());
    assert_eq!(totals.total_paye, lines.iter().map(|l| l.paye).sum::<Decimal>());
    assert_eq!(totals.total_pension, lines.iter().map(|l| l.pension).sum::<Decimal>());
    assert_eq!(totals.total_nhf, lines.iter().map(|l| l.nhf).sum::<Decimal>());
    assert_eq!(totals.total_net, lines.iter().map(|l| l.net_pay).sum::<Decimal>());

    for line in lines {
        assert_eq!(
            line.gross_pay,
            line.basic_salary + line.allowances + line.bonus + line.cash_benefits
        );
        assert_eq!(line.net_pay, line.gross_pay - line.paye - line.pension - line.nhf);
    }
}

#[test]
fn test_duplicate_create_leaves_exactly_one_draft() {
    let h = harness(staff());

    let first = h.manager.create_run(run_config(3, 2025)).unwrap();
    let second = h.manager.create_run(run_config(3, 2025));

    assert!(matches!(
        second,
        Err(EngineError::DuplicateRun {
            month: 3,
            year: 2025
        })
    ));
    let runs = h.manager.list_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, first.run.id);
    assert_eq!(runs[0].status, RunStatus::Draft);
}

#[test]
fn test_thirteenth_month_and_airtime_flow_into_gross() {
    let h = harness(vec![employee("emp_001", "Ada Obi", "1200000")]);
    let created = h
        .manager
        .create_run(RunConfiguration {
            month: 12,
            year: 2025,
            include_13th_month: true,
            airtime_data_percentage: decimal("5"),
        })
        .unwrap();

    let line = &created.lines[0];
    assert_eq!(line.bonus, decimal("100000"));
    assert_eq!(line.cash_benefits, decimal("5000"));
    assert_eq!(line.gross_pay, decimal("255000"));
}

#[test]
fn test_recompute_picks_up_directory_changes() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();

    h.directory.deactivate("emp_004");
    let recomputed = h.manager.recompute_run(created.run.id).unwrap();

    assert_eq!(recomputed.lines.len(), 3);
    assert_eq!(recomputed.run.totals, aggregate_lines(&recomputed.lines));
    assert!(recomputed.run.totals.total_gross < created.run.totals.total_gross);
}

// =============================================================================
// Processing
// =============================================================================

#[test]
fn test_process_posts_balanced_journal() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();

    let processed = h.manager.process_run(created.run.id, &approver()).unwrap();
    assert_eq!(processed.status, RunStatus::Processed);
    assert!(processed.processed_at.is_some());

    let journals = h.ledger.journals();
    assert_eq!(journals.len(), 1);
    assert_eq!(journals[0].reference, "PAYROLL-2025-03");
    assert_eq!(journals[0].total_debits(), journals[0].total_credits());
    assert_eq!(journals[0].total_debits(), processed.totals.total_gross);
}

#[test]
fn test_second_process_fails_and_changes_nothing() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();
    h.manager.process_run(created.run.id, &approver()).unwrap();

    let before = h.manager.get_run(created.run.id).unwrap();
    let second = h.manager.process_run(created.run.id, &CallerContext::new("someone.else"));

    assert!(matches!(second, Err(EngineError::InvalidState { .. })));
    let after = h.manager.get_run(created.run.id).unwrap();
    assert_eq!(before, after);
    assert_eq!(after.run.processed_by.as_deref(), Some("finance.lead"));
    assert_eq!(h.ledger.journals().len(), 1);
}

#[test]
fn test_failed_ledger_post_leaves_draft_without_entries() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();
    h.ledger.set_failing(true);

    let result = h.manager.process_run(created.run.id, &approver());

    assert!(matches!(
        result,
        Err(EngineError::LedgerPostingFailure { .. })
    ));
    let run = h.manager.get_run(created.run.id).unwrap().run;
    assert_eq!(run.status, RunStatus::Draft);
    assert!(run.processed_at.is_none());
    assert!(run.journal_reference.is_none());
    assert!(h.ledger.journals().is_empty());
}

// =============================================================================
// Disbursement Export
// =============================================================================

#[test]
fn test_export_before_and_after_processing() {
    let h = harness(staff());
    let created = h.manager.create_run(run_config(3, 2025)).unwrap();

    assert!(matches!(
        h.manager.export_disbursement(created.run.id),
        Err(EngineError::NotProcessed { .. })
    ));

    h.manager.process_run(created.run.id, &approver()).unwrap();
    let rows = h.manager.export_disbursement(created.run.id).unwrap();

    assert_eq!(rows.len(), created.lines.len());
    for (row, line) in rows.iter().zip(&created.lines) {
        assert_eq!(row.employee_name, line.employee_name);
        assert_eq!(row.net_pay, line.net_pay);
    }
}

#[test]
fn test_export_includes_employee_without_bank_details() {
    let mut unbanked = employee("emp_005", "Bola Ade", "600000");
    unbanked.bank = None;
    unbanked.account_number = None;
    let h = harness(vec![unbanked]);

    let created = h.manager.create_run(run_config(3, 2025)).unwrap();
    assert!(created.lines[0].has_warning(WarningCode::MissingBankDetails));
    h.manager.process_run(created.run.id, &approver()).unwrap();

    let csv = h.manager.export_disbursement_csv(created.run.id).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Bola Ade,,,"));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_create_for_same_period_yields_one_run() {
    let h = harness(staff());
    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));

    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let manager = h.manager.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                manager.create_run(run_config(6, 2025))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    let created = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(EngineError::DuplicateRun { .. })))
        .count();

    assert_eq!(created, 1);
    assert_eq!(duplicates, callers - 1);
    assert_eq!(h.manager.list_runs().len(), 1);
}

#[test]
fn test_concurrent_process_posts_once() {
    let h = harness(staff());
    let run_id = h.manager.create_run(run_config(7, 2025)).unwrap().run.id;
    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));

    let handles: Vec<_> = (0..callers)
        .map(|i| {
            let manager = h.manager.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                manager.process_run(run_id, &CallerContext::new(format!("approver.{}", i)))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    let processed = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(EngineError::InvalidState { .. })))
        .count();

    assert_eq!(processed, 1);
    assert_eq!(rejected, callers - 1);
    assert_eq!(h.ledger.journals().len(), 1);
}

// =============================================================================
// HTTP API
// =============================================================================

#[tokio::test]
async fn test_http_run_lifecycle() {
    let h = harness(staff());
    let router = create_router(AppState::from_shared(h.manager.clone()));

    let (status, body) = send(
        router.clone(),
        "POST",
        "/runs",
        Some(json!({ "month": 3, "year": 2025, "airtime_data_percentage": "2.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    let run_id = created["run"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["run"]["status"], "DRAFT");
    assert_eq!(created["lines"].as_array().unwrap().len(), 4);

    let (status, _) = send(
        router.clone(),
        "POST",
        "/runs",
        Some(json!({ "month": 3, "year": 2025 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        router.clone(),
        "POST",
        &format!("/runs/{}/recompute", run_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        router.clone(),
        "POST",
        &format!("/runs/{}/process", run_id),
        Some(json!({ "actor": "finance.lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let processed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(processed["status"], "PROCESSED");
    assert_eq!(processed["journal_reference"], "PAYROLL-2025-03");

    let (status, body) = send(
        router.clone(),
        "POST",
        &format!("/runs/{}/process", run_id),
        Some(json!({ "actor": "finance.lead" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["code"], "INVALID_STATE");

    let (status, _) = send(
        router.clone(),
        "POST",
        &format!("/runs/{}/recompute", run_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, csv) = send(
        router.clone(),
        "GET",
        &format!("/runs/{}/disbursement", run_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(csv.lines().count(), 5);

    let (status, body) = send(router, "GET", "/runs", None).await;
    assert_eq!(status, StatusCode::OK);
    let runs: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(runs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_http_missing_field_returns_validation_error() {
    let h = harness(staff());
    let router = create_router(AppState::from_shared(h.manager.clone()));

    let (status, body) = send(router, "POST", "/runs", Some(json!({ "month": 3 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("year"));
}
