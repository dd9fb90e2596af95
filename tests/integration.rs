//! Integration tests for the payroll engine.
//!
//! This test suite covers:
//! - The HTTP endpoints (single computation and pay runs)
//! - Earnings and overtime
//! - Social Security wage base and Additional Medicare threshold
//! - Deduction annual limits and YTD deltas
//! - Withholding elections and low-wage zero tax
//! - Local tax residency
//! - Multi-period runs with accumulators carried forward
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{PayrollEngine, hourly_equivalent};
use payroll_engine::config::{
    BracketConfig, ByFilingStatus, ConfigLoader, PflCapMode, TaxSchedule, TaxYearRules,
};
use payroll_engine::models::{
    AmountKind, DeductionDefinition, DeductionType, FilingStatus, LocalResidency, PayrollInput,
    WithholdingElection, YearToDate,
};
use payroll_engine::money::format_currency;

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/us-ny").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn rules_2025() -> TaxYearRules {
    load_config()
        .rules_for_year(2025)
        .expect("2025 rules")
        .clone()
}

fn engine() -> PayrollEngine {
    PayrollEngine::new(rules_2025()).unwrap()
}

/// A 2025 rule set with every rate set to zero.
fn zero_rate_engine() -> PayrollEngine {
    let zero_schedule = || {
        TaxSchedule::try_from(vec![BracketConfig {
            floor: Decimal::ZERO,
            rate: Decimal::ZERO,
        }])
        .unwrap()
    };

    let mut rules = rules_2025();
    for income_tax in [&mut rules.federal, &mut rules.state] {
        income_tax.schedules = ByFilingStatus {
            single_or_head_of_household: zero_schedule(),
            married: zero_schedule(),
        };
    }
    rules.fica.social_security_rate = Decimal::ZERO;
    rules.fica.medicare_rate = Decimal::ZERO;
    rules.fica.additional_medicare_rate = Decimal::ZERO;
    rules.state_insurance.disability_rate = Decimal::ZERO;
    rules.state_insurance.paid_family_leave_rate = Decimal::ZERO;
    rules.unemployment.futa_default_rate_percent = Decimal::ZERO;

    PayrollEngine::new(rules).unwrap()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn deduction(
    id: &str,
    deduction_type: DeductionType,
    amount_kind: AmountKind,
    amount: &str,
    is_pre_tax: bool,
    annual_limit: Option<&str>,
    ytd_amount: &str,
) -> DeductionDefinition {
    DeductionDefinition {
        id: id.to_string(),
        deduction_type,
        amount_kind,
        amount: decimal(amount),
        is_pre_tax,
        annual_limit: annual_limit.map(decimal),
        ytd_amount: decimal(ytd_amount),
    }
}

fn weekly_input(hours: &str, rate: &str) -> PayrollInput {
    PayrollInput::new(decimal(hours), decimal(rate))
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_money(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn scenario_request_body() -> Value {
    json!({
        "employee_id": "emp_001",
        "pay_date": "2025-03-07",
        "input": {
            "regular_hours": "40",
            "overtime_hours": "5",
            "hourly_rate": "30",
            "overtime_multiplier": "1.5",
            "federal": {"filing_status": "married", "allowances": 2},
            "state": {"filing_status": "married", "allowances": 2},
            "year_to_date": {"gross_pay": "5000"},
            "sui_rate_percent": "3.4",
            "deductions": [
                {
                    "id": "ret_001",
                    "type": "retirement",
                    "amount_kind": "percentage_of_gross",
                    "amount": "5",
                    "is_pre_tax": true,
                    "annual_limit": "23500",
                    "ytd_amount": "2500"
                },
                {
                    "id": "med_001",
                    "type": "health_insurance",
                    "amount_kind": "fixed",
                    "amount": "125",
                    "is_pre_tax": true
                }
            ]
        }
    })
}

// =============================================================================
// SECTION 1: HTTP API
// =============================================================================

#[tokio::test]
async fn test_compute_endpoint_end_to_end() {
    let (status, body) =
        post_json(create_router_for_test(), "/payroll/compute", scenario_request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["employee_id"], "emp_001");
    assert_eq!(body["tax_year"], 2025);
    assert!(body["calculation_id"].is_string());

    let result = &body["result"];
    assert_money(&result["earnings"]["gross_pay"], "1425.00");
    assert_money(&result["total_pre_tax_deductions"], "196.25");
    assert_money(&result["taxable_wages"], "1228.75");
    assert_money(&result["taxes"]["federal_income_tax"], "49.20");
    assert_money(&result["taxes"]["state_income_tax"], "50.66");
    assert_money(&result["net_pay"], "1013.75");
    assert_money(&result["employer"]["total"], "166.01");
    assert_eq!(result["pre_tax_deductions"][1]["type"], "health_insurance");
}

#[tokio::test]
async fn test_compute_endpoint_uses_rules_for_pay_date() {
    let mut body = scenario_request_body();
    body["pay_date"] = json!("2024-12-27");
    let (status, body) = post_json(create_router_for_test(), "/payroll/compute", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tax_year"], 2024);
}

#[tokio::test]
async fn test_unknown_deduction_type_buckets_as_other() {
    let mut body = scenario_request_body();
    body["input"]["deductions"][1]["type"] = json!("commuter_benefit");
    let (status, body) = post_json(create_router_for_test(), "/payroll/compute", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["pre_tax_deductions"][1]["type"], "other");
}

#[tokio::test]
async fn test_unknown_filing_status_returns_400() {
    let mut body = scenario_request_body();
    body["input"]["federal"]["filing_status"] = json!("widowed");
    let (status, body) = post_json(create_router_for_test(), "/payroll/compute", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_negative_rate_returns_422_with_field() {
    let mut body = scenario_request_body();
    body["input"]["deductions"][0]["amount"] = json!("-5");
    let (status, body) = post_json(create_router_for_test(), "/payroll/compute", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("deductions[ret_001].amount"));
}

#[tokio::test]
async fn test_pay_run_endpoint_totals() {
    let body = json!({
        "pay_date": "2025-03-07",
        "employees": [
            {"employee_id": "emp_001", "input": {"regular_hours": "40", "hourly_rate": "25"}},
            {"employee_id": "emp_002", "input": {"regular_hours": "40", "hourly_rate": "25",
                "local_residency": {"flat_rate_locality": true}}},
            {"employee_id": "emp_003", "input": {"regular_hours": "-1", "hourly_rate": "25"}}
        ]
    });
    let (status, body) = post_json(create_router_for_test(), "/payroll/pay-run", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["failures"][0]["employee_id"], "emp_003");
    assert_eq!(body["totals"]["employees"], 2);
    assert_money(&body["totals"]["gross_pay"], "2000");
    // 794.22 + 755.46
    assert_money(&body["totals"]["net_pay"], "1549.68");
}

#[tokio::test]
async fn test_pay_run_before_rules_returns_422() {
    let body = json!({"pay_date": "2019-01-04", "employees": []});
    let (status, body) = post_json(create_router_for_test(), "/payroll/pay-run", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "TAX_YEAR_NOT_FOUND");
}

// =============================================================================
// SECTION 2: Earnings
// =============================================================================

#[test]
fn test_forty_hours_with_zero_rates_nets_gross() {
    let result = zero_rate_engine().compute(&weekly_input("40", "25")).unwrap();

    assert_eq!(result.earnings.regular_pay, decimal("1000"));
    assert_eq!(result.gross_pay(), decimal("1000"));
    assert_eq!(result.net_pay, decimal("1000"));
    assert_eq!(result.taxes.total, Decimal::ZERO);
}

#[test]
fn test_overtime_at_time_and_a_half() {
    let input = PayrollInput {
        overtime_hours: decimal("10"),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert_eq!(result.earnings.overtime_pay, decimal("375"));
    assert_eq!(result.gross_pay(), decimal("1375"));
}

#[test]
fn test_zero_hours_yields_zero_everywhere() {
    let result = engine().compute(&weekly_input("0", "25")).unwrap();

    assert_eq!(result.gross_pay(), Decimal::ZERO);
    assert_eq!(result.taxes.total, Decimal::ZERO);
    assert_eq!(result.net_pay, Decimal::ZERO);
    assert_eq!(result.employer.total, Decimal::ZERO);
}

#[test]
fn test_salaried_employee_hourly_equivalent() {
    let rate = hourly_equivalent(decimal("65000"), decimal("40"), 52).unwrap();
    let input = PayrollInput {
        hourly_rate: rate,
        ..weekly_input("40", "0")
    };
    let result = engine().compute(&input).unwrap();
    assert_eq!(result.gross_pay(), decimal("1250"));
}

// =============================================================================
// SECTION 3: FICA wage base and threshold
// =============================================================================

#[test]
fn test_social_security_stops_at_wage_base() {
    let input = PayrollInput {
        year_to_date: YearToDate::from_gross(decimal("176100")),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert_eq!(result.taxes.social_security_employee, Decimal::ZERO);
    assert_eq!(result.employer.social_security_employer, Decimal::ZERO);
    assert_eq!(result.taxes.medicare_employee, decimal("14.50"));
}

#[test]
fn test_social_security_taxes_remainder_under_wage_base() {
    let input = PayrollInput {
        year_to_date: YearToDate::from_gross(decimal("175500")),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    // 600 × 0.062
    assert_eq!(result.taxes.social_security_employee, decimal("37.20"));
    assert_eq!(result.employer.social_security_employer, decimal("37.20"));
}

#[test]
fn test_additional_medicare_on_threshold_crossing() {
    let input = PayrollInput {
        year_to_date: YearToDate::from_gross(decimal("199500")),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    // 500 × 0.009
    assert_eq!(result.taxes.additional_medicare, decimal("4.50"));
    // employer does not match Additional Medicare
    assert_eq!(result.employer.medicare_employer, decimal("14.50"));
}

// =============================================================================
// SECTION 4: Deductions
// =============================================================================

#[test]
fn test_exhausted_limit_omits_deduction() {
    let input = PayrollInput {
        deductions: vec![deduction(
            "ret_001",
            DeductionType::Retirement,
            AmountKind::Fixed,
            "100",
            true,
            Some("23500"),
            "23500",
        )],
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert!(result.pre_tax_deductions.is_empty());
    assert_eq!(result.total_pre_tax_deductions, Decimal::ZERO);
    assert!(result.deduction_deltas.is_empty());
    assert_eq!(
        result.audit_trace.warnings[0].code,
        "DEDUCTION_LIMIT_REACHED"
    );
}

#[test]
fn test_limit_clamps_to_remaining_room() {
    let input = PayrollInput {
        deductions: vec![deduction(
            "ret_001",
            DeductionType::Retirement,
            AmountKind::Fixed,
            "100",
            true,
            Some("23500"),
            "23450",
        )],
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert_eq!(result.total_pre_tax_deductions, decimal("50"));
    assert_eq!(result.taxable_wages, decimal("950"));
}

#[test]
fn test_post_tax_deductions_do_not_reduce_taxable_wages() {
    let input = PayrollInput {
        deductions: vec![
            deduction(
                "garn_001",
                DeductionType::Garnishment,
                AmountKind::Fixed,
                "50",
                false,
                None,
                "0",
            ),
            deduction(
                "cs_001",
                DeductionType::ChildSupport,
                AmountKind::PercentageOfGross,
                "10",
                false,
                None,
                "0",
            ),
        ],
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert_eq!(result.taxable_wages, decimal("1000"));
    assert_eq!(result.total_post_tax_deductions, decimal("150"));
    // 794.22 without deductions
    assert_eq!(result.net_pay, decimal("644.22"));

    let by_type = result.deductions_by_type();
    assert_eq!(by_type[&DeductionType::ChildSupport], decimal("100"));
}

#[test]
fn test_deltas_carry_forward_to_next_period() {
    let retirement = deduction(
        "ret_001",
        DeductionType::Retirement,
        AmountKind::Fixed,
        "600",
        true,
        Some("1000"),
        "0",
    );
    let mut input = PayrollInput {
        deductions: vec![retirement],
        ..weekly_input("40", "25")
    };

    let engine = engine();
    let first = engine.compute(&input).unwrap();
    assert_eq!(first.total_pre_tax_deductions, decimal("600"));

    input.deductions[0] = input.deductions[0].apply_deltas(&first.deduction_deltas);
    input.year_to_date = input.year_to_date.advance(&first);
    let second = engine.compute(&input).unwrap();
    assert_eq!(second.total_pre_tax_deductions, decimal("400"));

    input.deductions[0] = input.deductions[0].apply_deltas(&second.deduction_deltas);
    input.year_to_date = input.year_to_date.advance(&second);
    let third = engine.compute(&input).unwrap();
    assert!(third.pre_tax_deductions.is_empty());
    assert_eq!(input.year_to_date.gross_pay, decimal("2000"));
}

// =============================================================================
// SECTION 5: Withholding elections
// =============================================================================

#[test]
fn test_withholding_suppression_flags() {
    let input = PayrollInput {
        federal: WithholdingElection::exempt(FilingStatus::Single),
        state: WithholdingElection::exempt(FilingStatus::Single),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    assert_eq!(result.taxes.federal_income_tax, Decimal::ZERO);
    assert_eq!(result.taxes.state_income_tax, Decimal::ZERO);
    assert_eq!(result.taxes.social_security_employee, decimal("62.00"));
}

#[test]
fn test_wages_below_standard_deduction_owe_no_federal_tax() {
    // 150 × 52 = 7800 < 15000
    let result = engine().compute(&weekly_input("10", "15")).unwrap();
    assert_eq!(result.taxes.federal_income_tax, Decimal::ZERO);
}

#[test]
fn test_state_filing_status_independent_of_federal() {
    let input = PayrollInput {
        federal: WithholdingElection::new(FilingStatus::Married, 0),
        state: WithholdingElection::new(FilingStatus::Single, 0),
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();

    // state single: (52000 - 7400) → 2288 / 52
    assert_eq!(result.taxes.state_income_tax, decimal("44.00"));
}

#[test]
fn test_head_of_household_uses_single_tables() {
    let single = engine().compute(&weekly_input("40", "25")).unwrap();
    let hoh = engine()
        .compute(&PayrollInput {
            federal: WithholdingElection::new(FilingStatus::HeadOfHousehold, 0),
            ..weekly_input("40", "25")
        })
        .unwrap();
    assert_eq!(single.taxes.federal_income_tax, hoh.taxes.federal_income_tax);
    assert_eq!(hoh.taxes.federal_income_tax, decimal("80.80"));
}

// =============================================================================
// SECTION 6: Local tax
// =============================================================================

#[test]
fn test_flat_rate_locality_resident() {
    let input = PayrollInput {
        local_residency: LocalResidency {
            flat_rate_locality: true,
            state_surcharge_locality: false,
        },
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();
    assert_eq!(result.taxes.local_tax, decimal("38.76"));
}

#[test]
fn test_surcharge_locality_resident() {
    let input = PayrollInput {
        local_residency: LocalResidency {
            flat_rate_locality: false,
            state_surcharge_locality: true,
        },
        ..weekly_input("40", "25")
    };
    let result = engine().compute(&input).unwrap();
    // 44.00 state tax × 16.75%
    assert_eq!(result.taxes.local_tax, decimal("7.37"));
}

// =============================================================================
// SECTION 7: Paid family leave cap modes
// =============================================================================

#[test]
fn test_pfl_year_to_date_mode_stops_at_annual_cap() {
    let rules = rules_2025().with_pfl_cap_mode(PflCapMode::YearToDate);
    let engine = PayrollEngine::new(rules).unwrap();

    let input = PayrollInput {
        year_to_date: YearToDate {
            paid_family_leave: decimal("352.00"),
            ..YearToDate::from_gross(decimal("90000"))
        },
        ..weekly_input("40", "25")
    };
    let result = engine.compute(&input).unwrap();
    assert_eq!(result.taxes.paid_family_leave, decimal("2.53"));

    let per_period = self::engine().compute(&input).unwrap();
    assert_eq!(per_period.taxes.paid_family_leave, decimal("3.88"));
}

// =============================================================================
// SECTION 8: Currency formatting
// =============================================================================

#[test]
fn test_format_result_amounts() {
    let result = engine().compute(&weekly_input("40", "25")).unwrap();
    assert_eq!(format_currency(result.net_pay), "$794.22");
    assert_eq!(format_currency(decimal("1234567.891")), "$1,234,567.89");
    assert_eq!(format_currency(-result.net_pay), "-$794.22");
}

// =============================================================================
// SECTION 9: Rule set selection
// =============================================================================

#[test]
fn test_rules_selected_by_effective_date() {
    let config = load_config();
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    assert_eq!(config.rules_for(date(2024, 12, 31)).unwrap().tax_year, 2024);
    assert_eq!(config.rules_for(date(2025, 1, 1)).unwrap().tax_year, 2025);
    assert_eq!(config.rules_for(date(2026, 6, 1)).unwrap().tax_year, 2025);
    assert!(config.rules_for(date(2023, 12, 31)).is_err());
}
