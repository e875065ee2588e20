//! Monthly salary computation.
//!
//! Turns a worker's aggregated labor for a month into pay figures. Wages are
//! paid per man-day; withholding is a flat rate on the gross.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregation::{WorkerLaborSummary, MAN_DAY_PRECISION};
use crate::config::PayrollPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollMonth, SalaryComputation, Worker};

/// Monetary amounts are kept to this many decimal places.
pub const MONEY_PRECISION: u32 = 2;

fn out_of_range(worker: &Worker, message: String) -> PayrollError {
    PayrollError::PayOutOfRange {
        worker_id: worker.id.clone(),
        message,
    }
}

fn man_days_to_decimal(worker: &Worker, value: f64) -> PayrollResult<Decimal> {
    Decimal::try_from(value)
        .map(|man_days| man_days.round_dp(MAN_DAY_PRECISION as u32))
        .map_err(|_| out_of_range(worker, format!("man-day total {value} is not representable")))
}

/// Computes a worker's pay for a month.
///
/// `summary` is the worker's entry from
/// [`aggregate_by_worker`](super::aggregate_by_worker); `None` means no labor
/// was booked and yields a zero computation.
///
/// Fails with `PayOutOfRange` when the man-day total or any derived amount
/// does not fit in a [`Decimal`].
///
/// # Rules
///
/// - gross = man-days × daily wage, rounded half away from zero
/// - withholding = gross × withholding rate, truncated
/// - net = gross − withholding
///
/// # Example
///
/// ```
/// use site_payroll::calculation::{aggregate_by_worker, compute_salary};
/// use site_payroll::config::PayrollPolicy;
/// use site_payroll::models::{PayrollMonth, WorkEntry, Worker};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let worker = Worker {
///     id: "w-001".to_string(),
///     name: "Sato".to_string(),
///     daily_wage: Decimal::from_str("15000").unwrap(),
///     active: true,
/// };
/// let month = PayrollMonth::new(2026, 1).unwrap();
/// let entries = vec![WorkEntry {
///     worker_id: "w-001".to_string(),
///     site_id: "site-a".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
///     labor: 12.0,
///     note: None,
/// }];
/// let summaries = aggregate_by_worker(&entries, month);
/// let policy = PayrollPolicy { withholding_rate: Decimal::from_str("0.1").unwrap() };
///
/// let result = compute_salary(&worker, summaries.first(), month, &policy).unwrap();
/// assert_eq!(result.gross_pay, Decimal::from_str("22500").unwrap());
/// assert_eq!(result.withholding, Decimal::from_str("2250").unwrap());
/// assert_eq!(result.net_pay, Decimal::from_str("20250").unwrap());
/// ```
pub fn compute_salary(
    worker: &Worker,
    summary: Option<&WorkerLaborSummary>,
    month: PayrollMonth,
    policy: &PayrollPolicy,
) -> PayrollResult<SalaryComputation> {
    let (total_man_days, days_worked, site_breakdown) = match summary {
        Some(summary) => (
            man_days_to_decimal(worker, summary.total_man_days)?,
            summary.days_worked,
            summary
                .sites
                .iter()
                .map(|(site, man_days)| Ok((site.clone(), man_days_to_decimal(worker, *man_days)?)))
                .collect::<PayrollResult<BTreeMap<_, _>>>()?,
        ),
        None => (Decimal::ZERO, 0, BTreeMap::new()),
    };

    let gross_pay = total_man_days
        .checked_mul(worker.daily_wage)
        .ok_or_else(|| out_of_range(worker, "gross pay overflowed".to_string()))?
        .round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    let withholding = gross_pay
        .checked_mul(policy.withholding_rate)
        .ok_or_else(|| out_of_range(worker, "withholding overflowed".to_string()))?
        .round_dp_with_strategy(MONEY_PRECISION, RoundingStrategy::ToZero);
    let net_pay = gross_pay - withholding;

    Ok(SalaryComputation {
        worker_id: worker.id.clone(),
        period: month,
        total_man_days,
        days_worked,
        site_breakdown,
        daily_wage: worker.daily_wage,
        gross_pay,
        withholding,
        net_pay,
    })
}
