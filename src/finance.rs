//! General functions related to finance.
//!
//! These are the per-period building blocks shared by every scenario calculator. They are pure
//! functions of their arguments; any state carried between periods is passed in explicitly.
use crate::units::{Dimensionless, Money};

/// Multiplicative escalation factor for an operating year: `(1 + rate)^(year - 1)`.
///
/// Year 1 is unescalated.
pub fn escalation_factor(rate: Dimensionless, year: u32) -> Dimensionless {
    (Dimensionless(1.0) + rate).powi(year.saturating_sub(1) as i32)
}

/// Present-value discount factor for a period: `1 / (1 + rate)^period`.
pub fn discount_factor(rate: Dimensionless, period: u32) -> Dimensionless {
    Dimensionless(1.0) / (Dimensionless(1.0) + rate).powi(period as i32)
}

/// One year of declining-balance depreciation on the remaining book value.
///
/// # Arguments
///
/// * `basis` - The original cost of the asset
/// * `cumulative` - Depreciation already recognised in earlier years
/// * `rate` - Fraction of remaining book value written off each year
pub fn declining_balance_depreciation(
    basis: Money,
    cumulative: Money,
    rate: Dimensionless,
) -> Money {
    (basis - cumulative) * rate
}

/// First-year depreciation under the half-year rule: half the normal rate on the full cost.
pub fn half_year_depreciation(basis: Money, rate: Dimensionless) -> Money {
    Dimensionless(0.5) * basis * rate
}

/// Remaining book value after `years` full years of declining-balance depreciation.
pub fn residual_value(cost: Money, rate: Dimensionless, years: u32) -> Money {
    cost * (Dimensionless(1.0) - rate).powi(years as i32)
}

/// Remaining book value after `years` years of depreciation with the half-year rule.
///
/// Charger residuals in purchase mode use the equivalent closed form
/// `cost * (1 - rate / 2) * (1 - rate)^(years - 1)`.
pub fn half_year_residual_value(cost: Money, rate: Dimensionless, years: u32) -> Money {
    let mut residual = cost;
    if years == 0 {
        return residual;
    }

    residual -= residual * rate * Dimensionless(0.5);
    for _ in 1..years {
        residual -= residual * rate;
    }

    residual
}

/// Geometric decay of a declining credit.
///
/// Credits are stored as negative values, so the magnitude shrinks towards zero.
pub fn decay_credit(previous: Money, decline_rate: Dimensionless) -> Money {
    previous * (Dimensionless(1.0) - decline_rate)
}

/// Calculates the capital recovery factor (CRF) for a number of periods and a periodic rate.
///
/// The CRF is the fraction of a principal which must be paid each period to amortise it over
/// the given number of periods.
pub fn capital_recovery_factor(periods: u32, rate: Dimensionless) -> Dimensionless {
    if periods == 0 {
        return Dimensionless(0.0);
    }
    if rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(periods as f64);
    }
    let factor = (Dimensionless(1.0) + rate).powi(periods as i32);
    (rate * factor) / (factor - Dimensionless(1.0))
}

/// Calculates the annual repayment on an amortising loan.
///
/// The instalment is computed per payment period and then annualised.
///
/// # Arguments
///
/// * `principal` - The amount financed
/// * `annual_rate` - Nominal annual interest rate
/// * `term_years` - Full loan term, which may be longer than the analysis horizon
/// * `payments_per_year` - Number of compounding/payment periods per year
pub fn annual_loan_payment(
    principal: Money,
    annual_rate: Dimensionless,
    term_years: u32,
    payments_per_year: u32,
) -> Money {
    let periodic_rate = annual_rate / Dimensionless(payments_per_year as f64);
    let periods = term_years * payments_per_year;
    let instalment = principal * capital_recovery_factor(periods, periodic_rate);

    instalment * Dimensionless(payments_per_year as f64)
}
