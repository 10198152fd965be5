//! The scenario in which both vehicles are bought outright.
use super::{Acquisition, AcquisitionModel, Residuals, TcoResult, check_horizon, run};
use crate::finance::residual_value;
use crate::parameters::{ANALYSIS_YEARS, ParameterSet};
use crate::units::{Dimensionless, Money};
use anyhow::Result;

/// Calculates the cost comparison when both vehicles are purchased upfront
#[derive(Debug, Clone, Copy)]
pub struct PurchaseCalculator<'a> {
    params: &'a ParameterSet,
}

impl<'a> PurchaseCalculator<'a> {
    /// Create a calculator for the given parameters.
    ///
    /// Fails if the analysis horizon is not [`ANALYSIS_YEARS`].
    pub fn new(params: &'a ParameterSet) -> Result<Self> {
        check_horizon(params)?;
        Ok(Self { params })
    }

    /// Produce the operating years, the salvage period and the aggregate row
    pub fn calculate(&self) -> TcoResult {
        run(self.params, self)
    }
}

impl AcquisitionModel for PurchaseCalculator<'_> {
    fn ice_acquisition(&self, year: u32) -> Acquisition {
        purchase_in_first_year(self.params.ice.msrp, year)
    }

    fn ev_acquisition(&self, year: u32) -> Acquisition {
        purchase_in_first_year(self.params.ev.msrp, year)
    }

    /// The federal rebate and the charger incentive, as a one-off reduction in the first year
    fn ev_rebates(&self, year: u32) -> Money {
        if year != 1 {
            return Money(0.0);
        }

        let incentives = &self.params.incentives;
        -(incentives.federal_rebate + incentives.charger_incentive)
    }

    fn residuals(&self) -> Residuals {
        let params = self.params;
        let charger = &params.charger;

        // Half-year write-off in the first year then full-rate years
        let charger_rate = charger.depreciation_rate;
        let charger_residual = charger.allocated_cost()
            * (Dimensionless(1.0) - Dimensionless(0.5) * charger_rate)
            * (Dimensionless(1.0) - charger_rate).powi(ANALYSIS_YEARS as i32 - 1);

        Residuals {
            ice: residual_value(params.ice.msrp, params.ice.depreciation_rate, ANALYSIS_YEARS),
            ev: residual_value(params.ev.msrp, params.ev.depreciation_rate, ANALYSIS_YEARS),
            charger: charger_residual,
        }
    }
}

fn purchase_in_first_year(msrp: Money, year: u32) -> Acquisition {
    Acquisition {
        purchase: if year == 1 { msrp } else { Money(0.0) },
        ..Default::default()
    }
}
