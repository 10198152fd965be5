//! Functionality for running a cost of ownership scenario.
//!
//! A scenario steps through the operating years in order, carrying depreciation and credit state
//! from one year to the next, then appends a salvage period and an aggregate row. The two
//! calculators only differ in how the vehicles are acquired and how residual values are worked
//! out; everything else is shared in [`operating`].
use crate::finance::discount_factor;
use crate::parameters::{ANALYSIS_YEARS, ParameterSet};
use crate::record::{EvCosts, IceCosts, SALVAGE_PERIOD, YearRecord};
use crate::summary::ComparisonSummary;
use crate::units::Money;
use anyhow::{Result, bail, ensure};
use log::{debug, info};
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;

pub mod aggregate;
use aggregate::aggregate;
pub mod finance;
pub use finance::FinanceCalculator;
pub mod operating;
use operating::{RunState, operating_costs};
pub mod purchase;
pub use purchase::PurchaseCalculator;

/// How the vehicles are paid for
#[derive(
    DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display,
)]
pub enum ScenarioMode {
    /// Both vehicles are bought outright in the first year
    #[default]
    #[string = "purchase"]
    Purchase,
    /// Both vehicles are financed with a down payment and an amortising loan
    #[string = "finance"]
    Finance,
    /// Vehicles are financed and charging is bought as a service.
    ///
    /// Recognised in configuration, but there is no calculator for it.
    #[string = "charging_as_a_service"]
    ChargingAsAService,
}

impl ScenarioMode {
    /// Whether the mode needs loan terms for both vehicles
    pub fn is_financed(self) -> bool {
        matches!(self, Self::Finance | Self::ChargingAsAService)
    }
}

/// Lines of a vehicle acquisition for one operating year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acquisition {
    /// Upfront purchase price
    pub purchase: Money,
    /// Down payment on a loan
    pub down_payment: Money,
    /// Annual loan repayments
    pub loan_payment: Money,
}

/// Remaining book values at the end of the horizon (positive amounts)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Residuals {
    /// Combustion vehicle
    pub ice: Money,
    /// Electric vehicle
    pub ev: Money,
    /// Charger, attributed to the electric vehicle
    pub charger: Money,
}

/// The parts of a scenario which depend on how the vehicles are paid for
pub trait AcquisitionModel {
    /// Acquisition lines for the combustion vehicle in the given operating year
    fn ice_acquisition(&self, year: u32) -> Acquisition;

    /// Acquisition lines for the electric vehicle in the given operating year
    fn ev_acquisition(&self, year: u32) -> Acquisition;

    /// Rebates booked against the electric vehicle in the given year (negative)
    fn ev_rebates(&self, year: u32) -> Money;

    /// Residual values for the salvage period
    fn residuals(&self) -> Residuals;
}

/// The output of a scenario: seven operating years, the salvage period and the aggregate row
#[derive(Debug, Clone, PartialEq)]
pub struct TcoResult {
    records: Vec<YearRecord>,
}

impl TcoResult {
    /// All records in period order
    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    /// The operating years
    pub fn operating_years(&self) -> &[YearRecord] {
        &self.records[..ANALYSIS_YEARS as usize]
    }

    /// The salvage period
    pub fn salvage(&self) -> &YearRecord {
        &self.records[ANALYSIS_YEARS as usize]
    }

    /// The aggregate row
    pub fn aggregate(&self) -> &YearRecord {
        &self.records[ANALYSIS_YEARS as usize + 1]
    }

    /// Headline figures for the comparison
    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary::from_result(self)
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<YearRecord> {
        self.records
    }
}

/// Check that the parameters describe the horizon the calculators are built for
pub fn check_horizon(params: &ParameterSet) -> Result<()> {
    ensure!(
        params.analysis_years == ANALYSIS_YEARS,
        "Analysis horizon must be exactly {ANALYSIS_YEARS} operating years, but {} were given",
        params.analysis_years
    );

    Ok(())
}

/// Run every period of a scenario.
///
/// # Arguments
///
/// * `params` - Validated parameters
/// * `model` - Acquisition and salvage treatment for the scenario
pub fn run<M: AcquisitionModel>(params: &ParameterSet, model: &M) -> TcoResult {
    let mut records = Vec::with_capacity(ANALYSIS_YEARS as usize + 2);

    let mut state = RunState::default();
    for year in 1..=ANALYSIS_YEARS {
        let (record, next) = operating_year(params, model, year, &state);
        debug!(
            "Year {year}: ICE total {:.2}, EV total {:.2}, savings {:.2}",
            record.ice_total.value(),
            record.ev_total.value(),
            record.cumulative_savings.value()
        );
        records.push(record);
        state = next;
    }

    records.push(salvage_period(params, model, &state));
    records.push(aggregate(&records));

    TcoResult { records }
}

/// Compute the record for one operating year and the state to carry into the next
fn operating_year<M: AcquisitionModel>(
    params: &ParameterSet,
    model: &M,
    year: u32,
    state: &RunState,
) -> (YearRecord, RunState) {
    let (operating, mut next) = operating_costs(params, year, state);

    let ice_acquisition = model.ice_acquisition(year);
    let ice = IceCosts {
        purchase: ice_acquisition.purchase,
        down_payment: ice_acquisition.down_payment,
        loan_payment: ice_acquisition.loan_payment,
        ..operating.ice
    };

    let ev_acquisition = model.ev_acquisition(year);
    let ev = EvCosts {
        purchase: ev_acquisition.purchase,
        down_payment: ev_acquisition.down_payment,
        loan_payment: ev_acquisition.loan_payment,
        rebates: model.ev_rebates(year),
        ..operating.ev
    };

    let record = YearRecord::new(
        year,
        ice,
        ev,
        state.totals,
        discount_factor(params.discount_rate, year),
        params.depreciation_treatment,
    );
    next.totals = record.cumulative();

    (record, next)
}

/// Compute the salvage period, which holds only residual values
fn salvage_period<M: AcquisitionModel>(
    params: &ParameterSet,
    model: &M,
    state: &RunState,
) -> YearRecord {
    let residuals = model.residuals();
    let ice = IceCosts {
        salvage: -residuals.ice,
        ..Default::default()
    };
    let ev = EvCosts {
        vehicle_salvage: -residuals.ev,
        charger_salvage: -residuals.charger,
        ..Default::default()
    };

    YearRecord::new(
        SALVAGE_PERIOD,
        ice,
        ev,
        state.totals,
        discount_factor(params.discount_rate, SALVAGE_PERIOD),
        params.depreciation_treatment,
    )
}

/// Run the calculator for the given scenario mode.
///
/// The parameters are assumed to have been validated for `mode`; only the horizon and the
/// presence of loan terms are checked here.
pub fn run_scenario(params: &ParameterSet, mode: ScenarioMode) -> Result<TcoResult> {
    let result = match mode {
        ScenarioMode::Purchase => PurchaseCalculator::new(params)?.calculate(),
        ScenarioMode::Finance => FinanceCalculator::new(params)?.calculate(),
        ScenarioMode::ChargingAsAService => {
            bail!("No calculator is available for the Charging-as-a-Service scenario")
        }
    };

    let aggregate = result.aggregate();
    info!(
        "{mode} scenario: ICE total {:.2}, EV total {:.2}",
        aggregate.ice_total.value(),
        aggregate.ev_total.value()
    );

    Ok(result)
}

/// Load parameters from `model_dir` and run the calculator for the given scenario mode
pub fn run_from_path(model_dir: &Path, mode: ScenarioMode) -> Result<TcoResult> {
    let params = ParameterSet::from_path(model_dir, mode)?;
    info!("Loaded parameters from {}", model_dir.display());

    run_scenario(&params, mode)
}
