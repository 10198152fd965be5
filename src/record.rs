//! The per-period output of a scenario calculation.
use crate::parameters::{ANALYSIS_YEARS, DepreciationTreatment};
use crate::units::{Dimensionless, Money};
use serde::Serialize;

/// The period holding residual (salvage) values
pub const SALVAGE_PERIOD: u32 = ANALYSIS_YEARS + 1;

/// The period holding the sum of all other periods
pub const AGGREGATE_PERIOD: u32 = ANALYSIS_YEARS + 2;

/// Cost components of the combustion vehicle for one period.
///
/// Credits and salvage values are stored as negative amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, derive_more::Add)]
pub struct IceCosts {
    /// Upfront purchase price
    pub purchase: Money,
    /// Down payment on a financed vehicle
    pub down_payment: Money,
    /// Annual loan repayments
    pub loan_payment: Money,
    /// Fuel
    pub fuel: Money,
    /// Carbon tax on fuel
    pub carbon_tax: Money,
    /// Maintenance
    pub maintenance: Money,
    /// Insurance
    pub insurance: Money,
    /// Vehicle depreciation
    pub depreciation: Money,
    /// Residual value of the vehicle (negative)
    pub salvage: Money,
}

impl IceCosts {
    /// Depreciation components
    pub fn depreciation(&self) -> Money {
        self.depreciation
    }

    /// Signed sum of all components, with depreciation included according to `treatment`
    pub fn total(&self, treatment: DepreciationTreatment) -> Money {
        let cash = self.purchase
            + self.down_payment
            + self.loan_payment
            + self.fuel
            + self.carbon_tax
            + self.maintenance
            + self.insurance
            + self.salvage;

        match treatment {
            DepreciationTreatment::Expensed => cash + self.depreciation(),
            DepreciationTreatment::Reported => cash,
        }
    }
}

impl std::iter::Sum for IceCosts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}

/// Cost components of the electric vehicle and its charger for one period.
///
/// Credits, rebates and salvage values are stored as negative amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, derive_more::Add)]
pub struct EvCosts {
    /// Upfront purchase price
    pub purchase: Money,
    /// Down payment on a financed vehicle
    pub down_payment: Money,
    /// Annual loan repayments
    pub loan_payment: Money,
    /// Purchase and charger incentives (negative)
    pub rebates: Money,
    /// Declining fuel-standard credits (negative)
    pub credits: Money,
    /// Electricity
    pub charging: Money,
    /// Vehicle maintenance
    pub maintenance: Money,
    /// Charger capital cost allocated to the vehicle
    pub charger: Money,
    /// Charger maintenance
    pub charger_maintenance: Money,
    /// Insurance
    pub insurance: Money,
    /// Vehicle depreciation
    pub vehicle_depreciation: Money,
    /// Charger depreciation
    pub charger_depreciation: Money,
    /// Residual value of the vehicle (negative)
    pub vehicle_salvage: Money,
    /// Residual value of the charger (negative)
    pub charger_salvage: Money,
}

impl EvCosts {
    /// Depreciation components
    pub fn depreciation(&self) -> Money {
        self.vehicle_depreciation + self.charger_depreciation
    }

    /// Signed sum of all components, with depreciation included according to `treatment`
    pub fn total(&self, treatment: DepreciationTreatment) -> Money {
        let cash = self.purchase
            + self.down_payment
            + self.loan_payment
            + self.rebates
            + self.credits
            + self.charging
            + self.maintenance
            + self.charger
            + self.charger_maintenance
            + self.insurance
            + self.vehicle_salvage
            + self.charger_salvage;

        match treatment {
            DepreciationTreatment::Expensed => cash + self.depreciation(),
            DepreciationTreatment::Reported => cash,
        }
    }
}

impl std::iter::Sum for EvCosts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}

/// Running totals carried from one period to the next
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeTotals {
    /// Cumulative combustion vehicle cost
    pub ice: Money,
    /// Cumulative electric vehicle cost
    pub ev: Money,
}

/// One row of the cost comparison.
///
/// Periods `1..=7` are operating years, [`SALVAGE_PERIOD`] holds residual values and
/// [`AGGREGATE_PERIOD`] is the sum of all other periods. Records are never modified after they
/// are created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearRecord {
    /// Period index
    pub period: u32,
    /// Combustion vehicle components
    pub ice: IceCosts,
    /// Electric vehicle components
    pub ev: EvCosts,
    /// Combustion vehicle cost for the period
    pub ice_total: Money,
    /// Combustion vehicle cost up to and including this period
    pub ice_cumulative: Money,
    /// Electric vehicle cost for the period
    pub ev_total: Money,
    /// Electric vehicle cost up to and including this period
    pub ev_cumulative: Money,
    /// Present-value factor for the period (zero for the aggregate row)
    pub discount_factor: Dimensionless,
    /// `max(ice_cumulative - ev_cumulative, 0)`.
    ///
    /// The floor at zero hides periods in which the combustion vehicle is cheaper. Use
    /// [`ComparisonSummary`](crate::summary::ComparisonSummary) for signed savings.
    pub cumulative_savings: Money,
    /// Discounted combustion vehicle cost
    pub ice_discounted: Money,
    /// Discounted electric vehicle cost
    pub ev_discounted: Money,
}

impl YearRecord {
    /// Derive totals for a period from its components.
    ///
    /// # Arguments
    ///
    /// * `period` - Period index
    /// * `ice` - Combustion vehicle components
    /// * `ev` - Electric vehicle components
    /// * `previous` - Cumulative totals up to the previous period
    /// * `discount_factor` - Present-value factor for this period
    /// * `treatment` - Whether depreciation is part of the totals
    pub fn new(
        period: u32,
        ice: IceCosts,
        ev: EvCosts,
        previous: CumulativeTotals,
        discount_factor: Dimensionless,
        treatment: DepreciationTreatment,
    ) -> Self {
        let ice_total = ice.total(treatment);
        let ev_total = ev.total(treatment);
        let ice_cumulative = previous.ice + ice_total;
        let ev_cumulative = previous.ev + ev_total;

        Self {
            period,
            ice,
            ev,
            ice_total,
            ice_cumulative,
            ev_total,
            ev_cumulative,
            discount_factor,
            cumulative_savings: savings_floor(ice_cumulative, ev_cumulative),
            ice_discounted: ice_total * discount_factor,
            ev_discounted: ev_total * discount_factor,
        }
    }

    /// Cumulative totals to carry into the next period
    pub fn cumulative(&self) -> CumulativeTotals {
        CumulativeTotals {
            ice: self.ice_cumulative,
            ev: self.ev_cumulative,
        }
    }

    /// Whether this is one of the operating years
    pub fn is_operating(&self) -> bool {
        (1..=ANALYSIS_YEARS).contains(&self.period)
    }

    /// Whether this is the salvage period
    pub fn is_salvage(&self) -> bool {
        self.period == SALVAGE_PERIOD
    }

    /// Whether this is the aggregate row
    pub fn is_aggregate(&self) -> bool {
        self.period == AGGREGATE_PERIOD
    }
}

/// Savings of the electric vehicle, floored at zero
pub fn savings_floor(ice_cumulative: Money, ev_cumulative: Money) -> Money {
    (ice_cumulative - ev_cumulative).max(Money(0.0))
}
