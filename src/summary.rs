//! Headline figures for a cost comparison.
use crate::scenario::TcoResult;
use crate::units::Money;
use serde::Serialize;

/// Summary of a scenario result.
///
/// Unlike [`YearRecord::cumulative_savings`](crate::record::YearRecord::cumulative_savings), the
/// savings here are signed: a negative value means the combustion vehicle is cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonSummary {
    /// Nominal cost of the combustion vehicle over the horizon, net of salvage
    pub ice_total: Money,
    /// Nominal cost of the electric vehicle over the horizon, net of salvage
    pub ev_total: Money,
    /// `ice_total - ev_total`
    pub savings: Money,
    /// Present value of the combustion vehicle costs
    pub ice_present_value: Money,
    /// Present value of the electric vehicle costs
    pub ev_present_value: Money,
    /// `ice_present_value - ev_present_value`
    pub present_value_savings: Money,
    /// First period at which the electric vehicle's cumulative cost is below the combustion
    /// vehicle's, if there is one
    pub breakeven_period: Option<u32>,
}

impl ComparisonSummary {
    /// Summarise a scenario result
    pub fn from_result(result: &TcoResult) -> Self {
        let aggregate = result.aggregate();
        let breakeven_period = result
            .records()
            .iter()
            .filter(|record| !record.is_aggregate())
            .find(|record| record.ev_cumulative < record.ice_cumulative)
            .map(|record| record.period);

        Self {
            ice_total: aggregate.ice_total,
            ev_total: aggregate.ev_total,
            savings: aggregate.ice_total - aggregate.ev_total,
            ice_present_value: aggregate.ice_discounted,
            ev_present_value: aggregate.ev_discounted,
            present_value_savings: aggregate.ice_discounted - aggregate.ev_discounted,
            breakeven_period,
        }
    }

    /// Whether the electric vehicle is cheaper in present-value terms
    pub fn ev_is_cheaper(&self) -> bool {
        self.present_value_savings > Money(0.0)
    }
}
