//! The aggregate row, a reduction over the operating years and the salvage period.
use crate::record::{AGGREGATE_PERIOD, EvCosts, IceCosts, YearRecord, savings_floor};
use crate::units::{Dimensionless, Money};

/// Sum every component and total over `records`.
///
/// Cumulative totals equal the summed totals, and the discount factor is zero because it has no
/// meaning for the aggregate.
pub fn aggregate(records: &[YearRecord]) -> YearRecord {
    let ice: IceCosts = records.iter().map(|r| r.ice).sum();
    let ev: EvCosts = records.iter().map(|r| r.ev).sum();
    let ice_total: Money = records.iter().map(|r| r.ice_total).sum();
    let ev_total: Money = records.iter().map(|r| r.ev_total).sum();

    YearRecord {
        period: AGGREGATE_PERIOD,
        ice,
        ev,
        ice_total,
        ice_cumulative: ice_total,
        ev_total,
        ev_cumulative: ev_total,
        discount_factor: Dimensionless(0.0),
        cumulative_savings: savings_floor(ice_total, ev_total),
        ice_discounted: records.iter().map(|r| r.ice_discounted).sum(),
        ev_discounted: records.iter().map(|r| r.ev_discounted).sum(),
    }
}
