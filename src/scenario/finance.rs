//! The scenario in which both vehicles are financed with an amortising loan.
use super::{Acquisition, AcquisitionModel, Residuals, TcoResult, check_horizon, run};
use crate::finance::{annual_loan_payment, half_year_residual_value};
use crate::parameters::{ANALYSIS_YEARS, LoanTerms, ParameterSet, Vehicle};
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use log::{debug, warn};

/// A loan taken out for one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loan {
    /// Amount paid upfront in the first year
    pub down_payment: Money,
    /// Amount financed
    pub principal: Money,
    /// Repayments made in every operating year
    pub annual_payment: Money,
}

impl Loan {
    /// Work out the loan for a vehicle.
    ///
    /// # Arguments
    ///
    /// * `msrp` - Price of the vehicle
    /// * `rebate` - Purchase rebate which reduces the amount financed
    /// * `terms` - Loan terms
    pub fn new(msrp: Money, rebate: Money, terms: &LoanTerms) -> Self {
        let down_payment = msrp * terms.down_payment_fraction;
        let principal = msrp - rebate - down_payment;
        let annual_payment = annual_loan_payment(
            principal,
            terms.interest_rate,
            terms.term_years,
            terms.payments_per_year,
        );

        Self {
            down_payment,
            principal,
            annual_payment,
        }
    }

    fn acquisition(&self, year: u32) -> Acquisition {
        Acquisition {
            down_payment: if year == 1 {
                self.down_payment
            } else {
                Money(0.0)
            },
            loan_payment: self.annual_payment,
            ..Default::default()
        }
    }
}

/// Look up and check the loan terms for a vehicle
fn loan_terms<'a, E>(label: &str, vehicle: &'a Vehicle<E>) -> Result<&'a LoanTerms> {
    let terms = vehicle
        .financing
        .as_ref()
        .with_context(|| format!("{label} financing terms required for financing scenario"))?;
    ensure!(terms.term_years > 0, "{label} loan term must be positive");
    ensure!(
        terms.payments_per_year > 0,
        "{label} payments per year must be positive"
    );

    if terms.term_years > ANALYSIS_YEARS {
        warn!(
            "{label} loan term of {} years is longer than the {ANALYSIS_YEARS}-year horizon. \
            Payments after the horizon are not counted.",
            terms.term_years
        );
    } else if terms.term_years < ANALYSIS_YEARS {
        warn!(
            "{label} loan term of {} years is shorter than the {ANALYSIS_YEARS}-year horizon, \
            but a payment is still booked in every operating year.",
            terms.term_years
        );
    }

    Ok(terms)
}

/// Calculates the cost comparison when both vehicles are financed
#[derive(Debug, Clone, Copy)]
pub struct FinanceCalculator<'a> {
    params: &'a ParameterSet,
    ice_loan: Loan,
    ev_loan: Loan,
}

impl<'a> FinanceCalculator<'a> {
    /// Create a calculator for the given parameters, working out both loans.
    ///
    /// Fails if the analysis horizon is not [`ANALYSIS_YEARS`] or if either vehicle is missing
    /// usable loan terms.
    pub fn new(params: &'a ParameterSet) -> Result<Self> {
        check_horizon(params)?;

        let ice_terms = loan_terms("ICE", &params.ice)?;
        let ev_terms = loan_terms("EV", &params.ev)?;

        let ice_loan = Loan::new(params.ice.msrp, Money(0.0), ice_terms);
        let ev_loan = Loan::new(params.ev.msrp, params.incentives.federal_rebate, ev_terms);
        debug!(
            "Annual loan payments: ICE {:.2}, EV {:.2}",
            ice_loan.annual_payment.value(),
            ev_loan.annual_payment.value()
        );

        Ok(Self {
            params,
            ice_loan,
            ev_loan,
        })
    }

    /// The combustion vehicle loan
    pub fn ice_loan(&self) -> &Loan {
        &self.ice_loan
    }

    /// The electric vehicle loan
    pub fn ev_loan(&self) -> &Loan {
        &self.ev_loan
    }

    /// Produce the operating years, the salvage period and the aggregate row
    pub fn calculate(&self) -> TcoResult {
        run(self.params, self)
    }
}

impl AcquisitionModel for FinanceCalculator<'_> {
    fn ice_acquisition(&self, year: u32) -> Acquisition {
        self.ice_loan.acquisition(year)
    }

    fn ev_acquisition(&self, year: u32) -> Acquisition {
        self.ev_loan.acquisition(year)
    }

    /// Always zero: the federal rebate is taken off the amount financed instead
    fn ev_rebates(&self, _year: u32) -> Money {
        Money(0.0)
    }

    fn residuals(&self) -> Residuals {
        let params = self.params;
        let charger = &params.charger;

        Residuals {
            ice: half_year_residual_value(
                params.ice.msrp,
                params.ice.depreciation_rate,
                ANALYSIS_YEARS,
            ),
            ev: half_year_residual_value(
                params.ev.msrp,
                params.ev.depreciation_rate,
                ANALYSIS_YEARS,
            ),
            charger: half_year_residual_value(
                charger.allocated_cost(),
                charger.depreciation_rate,
                ANALYSIS_YEARS,
            ),
        }
    }
}
