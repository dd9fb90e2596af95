//! The payroll engine.
//!
//! [`PayrollEngine`] runs the step functions in order against one tax-year
//! rule set and assembles the itemized [`PayrollResult`]. It holds no mutable
//! state, so one engine can serve any number of threads.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::deductions::apply_deductions;
use super::earnings::calculate_earnings;
use super::employer::calculate_employer_costs;
use super::fica::calculate_fica;
use super::local_tax::calculate_local_tax;
use super::state_insurance::calculate_state_insurance;
use super::withholding::{TaxAuthority, calculate_income_tax};
use crate::config::TaxYearRules;
use crate::error::EngineResult;
use crate::models::{AuditTrace, PayrollInput, PayrollResult, TaxWithholdings};
use crate::money::round_currency;

/// Computes pay for one employee and one pay period at a time.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use payroll_engine::calculation::PayrollEngine;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::PayrollInput;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/us-ny").unwrap();
/// let rules = config.rules_for(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()).unwrap();
/// let engine = PayrollEngine::new(rules.clone()).unwrap();
///
/// let result = engine
///     .compute(&PayrollInput::new(Decimal::new(40, 0), Decimal::new(25, 0)))
///     .unwrap();
/// println!("Net pay: {}", result.net_pay);
/// ```
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    rules: TaxYearRules,
}

impl PayrollEngine {
    /// Creates an engine for a rule set, validating it first.
    pub fn new(rules: TaxYearRules) -> EngineResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Returns the rule set this engine calculates against.
    pub fn rules(&self) -> &TaxYearRules {
        &self.rules
    }

    /// Computes the itemized payroll result for one pay period.
    ///
    /// The input is validated first; any contract violation is returned as
    /// [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
    /// and nothing is computed.
    pub fn compute(&self, input: &PayrollInput) -> EngineResult<PayrollResult> {
        input.validate()?;

        let rules = &self.rules;
        let periods = rules.pay_periods_per_year;
        let mut trace = AuditTrace::default();
        let mut step_number: u32 = 1;

        let earnings = calculate_earnings(input, step_number)?;
        trace.steps.push(earnings.audit_step);
        step_number += 1;
        let earnings = earnings.earnings;
        let gross_pay = earnings.gross_pay;

        let deductions = apply_deductions(&input.deductions, gross_pay, step_number);
        trace.steps.push(deductions.audit_step);
        trace.warnings.extend(deductions.warnings);
        step_number += 1;

        let taxable_wages = gross_pay - deductions.total_pre_tax;

        let federal = calculate_income_tax(
            TaxAuthority::Federal,
            taxable_wages,
            &input.federal,
            &rules.federal,
            periods,
            step_number,
        );
        trace.steps.push(federal.audit_step);
        step_number += 1;

        let state = calculate_income_tax(
            TaxAuthority::State,
            taxable_wages,
            &input.state,
            &rules.state,
            periods,
            step_number,
        );
        trace.steps.push(state.audit_step);
        step_number += 1;

        let local = calculate_local_tax(
            taxable_wages,
            state.tax,
            &input.local_residency,
            &rules.local,
            periods,
            step_number,
        );
        if let Some(warning) = local.warning {
            warn!(code = %warning.code, "{}", warning.message);
            trace.warnings.push(warning);
        }
        trace.steps.push(local.audit_step);
        step_number += 1;

        let fica = calculate_fica(gross_pay, &input.year_to_date, &rules.fica, step_number);
        for step in &fica.audit_steps {
            trace.steps.push(step.clone());
            step_number += 1;
        }

        let insurance = calculate_state_insurance(
            gross_pay,
            input.year_to_date.paid_family_leave,
            &rules.state_insurance,
            step_number,
        );
        trace.steps.push(insurance.audit_step);
        step_number += 1;

        let employer = calculate_employer_costs(
            gross_pay,
            input,
            &fica,
            &rules.unemployment,
            step_number,
        );
        trace.steps.push(employer.audit_step);

        let mut taxes = TaxWithholdings {
            federal_income_tax: federal.tax,
            state_income_tax: state.tax,
            local_tax: local.tax,
            social_security_employee: fica.social_security_employee,
            medicare_employee: fica.medicare_employee,
            additional_medicare: fica.additional_medicare,
            disability_insurance: insurance.disability_insurance,
            paid_family_leave: insurance.paid_family_leave,
            total: Decimal::ZERO,
        };
        taxes.total = taxes.sum();

        let total_deductions = deductions.total_pre_tax + taxes.total + deductions.total_post_tax;
        let net_pay = round_currency(gross_pay - total_deductions);

        debug!(
            tax_year = rules.tax_year,
            gross_pay = %gross_pay,
            total_taxes = %taxes.total,
            net_pay = %net_pay,
            employer_total = %employer.costs.total,
            warnings = trace.warnings.len(),
            "Payroll computed"
        );

        Ok(PayrollResult {
            earnings,
            pre_tax_deductions: deductions.pre_tax,
            total_pre_tax_deductions: deductions.total_pre_tax,
            taxable_wages,
            taxes,
            post_tax_deductions: deductions.post_tax,
            total_post_tax_deductions: deductions.total_post_tax,
            total_deductions,
            net_pay,
            employer: employer.costs,
            deduction_deltas: deductions.deltas,
            audit_trace: trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::error::EngineError;
    use crate::models::{
        AmountKind, DeductionDefinition, DeductionType, FilingStatus, LocalResidency,
        MAX_AMOUNT, MAX_OVERTIME_MULTIPLIER, MAX_PERIOD_HOURS, WithholdingElection, YearToDate,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn engine_2025() -> PayrollEngine {
        let config = ConfigLoader::load("./config/us-ny").expect("Failed to load config");
        let rules = config.rules_for_year(2025).expect("2025 rules").clone();
        PayrollEngine::new(rules).unwrap()
    }

    fn scenario_input() -> PayrollInput {
        PayrollInput {
            overtime_hours: dec("5"),
            federal: WithholdingElection::new(FilingStatus::Married, 2),
            state: WithholdingElection::new(FilingStatus::Married, 2),
            year_to_date: YearToDate::from_gross(dec("5000")),
            sui_rate_percent: dec("3.4"),
            deductions: vec![
                DeductionDefinition {
                    id: "ret_001".to_string(),
                    deduction_type: DeductionType::Retirement,
                    amount_kind: AmountKind::PercentageOfGross,
                    amount: dec("5"),
                    is_pre_tax: true,
                    annual_limit: Some(dec("23500")),
                    ytd_amount: dec("2500"),
                },
                DeductionDefinition {
                    id: "med_001".to_string(),
                    deduction_type: DeductionType::HealthInsurance,
                    amount_kind: AmountKind::Fixed,
                    amount: dec("125"),
                    is_pre_tax: true,
                    annual_limit: None,
                    ytd_amount: Decimal::ZERO,
                },
            ],
            ..PayrollInput::new(dec("40"), dec("30"))
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let result = engine_2025().compute(&scenario_input()).unwrap();

        assert_eq!(result.earnings.regular_pay, dec("1200"));
        assert_eq!(result.earnings.overtime_pay, dec("225"));
        assert_eq!(result.gross_pay(), dec("1425"));
        assert_eq!(result.total_pre_tax_deductions, dec("196.25"));
        assert_eq!(result.taxable_wages, dec("1228.75"));

        assert_eq!(result.taxes.federal_income_tax, dec("49.20"));
        // (63895 - 7950 - 2000) through the married state schedule / 52 = 50.663
        assert_eq!(result.taxes.state_income_tax, dec("50.66"));
        assert_eq!(result.taxes.social_security_employee, dec("88.35"));
        assert_eq!(result.taxes.medicare_employee, dec("20.66"));
        assert_eq!(result.taxes.additional_medicare, Decimal::ZERO);
        assert_eq!(result.taxes.disability_insurance, dec("0.60"));
        assert_eq!(result.taxes.paid_family_leave, dec("5.53"));
        assert_eq!(result.taxes.local_tax, Decimal::ZERO);

        assert_eq!(result.taxes.total, dec("215.00"));
        assert_eq!(result.net_pay, dec("1013.75"));

        assert_eq!(result.employer.sui_employer, dec("48.45"));
        assert_eq!(result.employer.futa_employer, dec("8.55"));
        assert_eq!(result.employer.total, dec("166.01"));
    }

    #[test]
    fn test_totals_reconcile() {
        let result = engine_2025().compute(&scenario_input()).unwrap();

        assert_eq!(result.taxes.total, result.taxes.sum());
        assert_eq!(
            result.total_deductions,
            result.total_pre_tax_deductions + result.taxes.total + result.total_post_tax_deductions
        );
        assert_eq!(result.net_pay, result.gross_pay() - result.total_deductions);
        assert_eq!(
            result.employer.total,
            result.employer.social_security_employer
                + result.employer.medicare_employer
                + result.employer.sui_employer
                + result.employer.futa_employer
        );
    }

    #[test]
    fn test_audit_steps_numbered_in_order() {
        let result = engine_2025().compute(&scenario_input()).unwrap();
        let steps = &result.audit_trace.steps;

        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        let ids: Vec<&str> = steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "earnings",
                "deductions",
                "federal_income_tax",
                "state_income_tax",
                "local_tax",
                "social_security",
                "medicare",
                "additional_medicare",
                "state_insurance",
                "employer_costs",
            ]
        );
    }

    #[test]
    fn test_deltas_cover_applied_deductions() {
        let result = engine_2025().compute(&scenario_input()).unwrap();
        assert_eq!(result.deduction_deltas.len(), 2);
        assert_eq!(result.deduction_deltas[0].amount, dec("71.25"));
        assert_eq!(result.deduction_deltas[1].amount, dec("125"));
    }

    #[test]
    fn test_residency_conflict_recorded_as_warning() {
        let input = PayrollInput {
            local_residency: LocalResidency {
                flat_rate_locality: true,
                state_surcharge_locality: true,
            },
            ..scenario_input()
        };
        let result = engine_2025().compute(&input).unwrap();

        // 1228.75 × 0.03876 = 47.6263
        assert_eq!(result.taxes.local_tax, dec("47.63"));
        assert!(
            result
                .audit_trace
                .warnings
                .iter()
                .any(|w| w.code == "LOCAL_RESIDENCY_CONFLICT")
        );
    }

    #[test]
    fn test_invalid_input_rejected() {
        let input = PayrollInput::new(dec("-40"), dec("25"));
        let result = engine_2025().compute(&input);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_oversized_input_rejected_without_panicking() {
        let input = PayrollInput::new(dec("1000000000000000"), dec("1000000000000000"));
        let result = engine_2025().compute(&input);
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput { ref field, .. }) if field == "regular_hours"
        ));
    }

    #[test]
    fn test_largest_accepted_input_computes() {
        let input = PayrollInput {
            overtime_hours: MAX_PERIOD_HOURS,
            overtime_multiplier: MAX_OVERTIME_MULTIPLIER,
            other_earnings: MAX_AMOUNT,
            year_to_date: YearToDate::from_gross(MAX_AMOUNT),
            deductions: vec![DeductionDefinition {
                id: "ret_001".to_string(),
                deduction_type: DeductionType::Retirement,
                amount_kind: AmountKind::PercentageOfGross,
                amount: dec("100"),
                is_pre_tax: false,
                annual_limit: None,
                ytd_amount: Decimal::ZERO,
            }],
            ..PayrollInput::new(MAX_PERIOD_HOURS, MAX_AMOUNT)
        };
        let result = engine_2025().compute(&input).unwrap();
        assert_eq!(
            result.total_deductions,
            result.total_pre_tax_deductions + result.taxes.total + result.total_post_tax_deductions
        );
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let mut rules = engine_2025().rules().clone();
        rules.pay_periods_per_year = 0;
        assert!(matches!(
            PayrollEngine::new(rules),
            Err(EngineError::InvalidRules { .. })
        ));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PayrollEngine>();
    }
}
