//! Operating costs shared by every scenario, and the state carried between operating years.
use crate::finance::{
    decay_credit, declining_balance_depreciation, escalation_factor, half_year_depreciation,
};
use crate::parameters::ParameterSet;
use crate::record::{CumulativeTotals, EvCosts, IceCosts};
use crate::units::{Money, MoneyPerKilometre};

/// State threaded from one operating year to the next.
///
/// Each year produces a fresh state; nothing is mutated across years.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunState {
    /// Depreciation recognised so far on the combustion vehicle
    pub ice_depreciation: Money,
    /// Depreciation recognised so far on the electric vehicle
    pub ev_depreciation: Money,
    /// Depreciation recognised so far on the charger
    pub charger_depreciation: Money,
    /// Charger capital booked in the first year, which is the basis for its depreciation
    pub charger_cost: Money,
    /// Charger maintenance in the previous year
    pub charger_maintenance: Money,
    /// Credit in the previous year (negative)
    pub credit: Money,
    /// Cumulative totals up to the previous year
    pub totals: CumulativeTotals,
}

/// Operating cost lines for one year, before any acquisition costs are added
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperatingCosts {
    /// Combustion vehicle lines
    pub ice: IceCosts,
    /// Electric vehicle and charger lines
    pub ev: EvCosts,
}

/// Compute the operating costs for `year` and the state to carry forward.
///
/// The cumulative totals in the returned state are left unchanged; they are updated once the
/// period's record has been assembled.
pub fn operating_costs(
    params: &ParameterSet,
    year: u32,
    state: &RunState,
) -> (OperatingCosts, RunState) {
    let ice_depreciation = declining_balance_depreciation(
        params.ice.msrp,
        state.ice_depreciation,
        params.ice.depreciation_rate,
    );
    let ev_depreciation = declining_balance_depreciation(
        params.ev.msrp,
        state.ev_depreciation,
        params.ev.depreciation_rate,
    );

    let (charger, charger_maintenance, charger_depreciation) = charger_costs(params, year, state);
    let credit = credit(params, year, state.credit);

    let ice = IceCosts {
        fuel: fuel_cost(params, year),
        carbon_tax: carbon_tax(params, year),
        maintenance: maintenance_cost(params, year, params.ice.maintenance_per_km),
        insurance: params.ice.msrp * params.ice.insurance_rate,
        depreciation: ice_depreciation,
        ..Default::default()
    };
    let ev = EvCosts {
        credits: credit,
        charging: charging_cost(params, year),
        maintenance: maintenance_cost(params, year, params.ev.maintenance_per_km),
        charger,
        charger_maintenance,
        insurance: params.ev.msrp * params.ev.insurance_rate,
        vehicle_depreciation: ev_depreciation,
        charger_depreciation,
        ..Default::default()
    };

    let next = RunState {
        ice_depreciation: state.ice_depreciation + ice_depreciation,
        ev_depreciation: state.ev_depreciation + ev_depreciation,
        charger_depreciation: state.charger_depreciation + charger_depreciation,
        charger_cost: if year == 1 { charger } else { state.charger_cost },
        charger_maintenance,
        credit,
        totals: state.totals,
    };

    (OperatingCosts { ice, ev }, next)
}

/// Fuel for the combustion vehicle, with the price escalated from the first year
fn fuel_cost(params: &ParameterSet, year: u32) -> Money {
    let litres = params.ice.efficiency * params.annual_distance;
    litres * params.energy.fuel_price * escalation_factor(params.energy.fuel_escalation, year)
}

/// Carbon tax on the fuel burned, escalated at the fuel rate
fn carbon_tax(params: &ParameterSet, year: u32) -> Money {
    let litres = params.ice.efficiency * params.annual_distance;
    litres * params.energy.carbon_tax * escalation_factor(params.energy.fuel_escalation, year)
}

/// Electricity for the electric vehicle
fn charging_cost(params: &ParameterSet, year: u32) -> Money {
    let energy = params.ev.efficiency * params.annual_distance;
    energy
        * params.energy.electricity_price
        * escalation_factor(params.energy.electricity_escalation, year)
}

fn maintenance_cost(
    params: &ParameterSet,
    year: u32,
    maintenance_per_km: MoneyPerKilometre,
) -> Money {
    maintenance_per_km
        * params.annual_distance
        * escalation_factor(params.energy.maintenance_escalation, year)
}

/// Charger capital, maintenance and depreciation for the year.
///
/// Capital is booked in the first year only. Maintenance starts as a fraction of the capital and
/// then grows by a fixed increment each year. Depreciation uses the half-year rule in the first
/// year and declining balance afterwards.
fn charger_costs(params: &ParameterSet, year: u32, state: &RunState) -> (Money, Money, Money) {
    let charger = &params.charger;
    if year == 1 {
        let cost = charger.allocated_cost();
        return (
            cost,
            cost * charger.maintenance_rate,
            half_year_depreciation(cost, charger.depreciation_rate),
        );
    }

    let maintenance = state.charger_maintenance + charger.maintenance_increment;
    let depreciation = declining_balance_depreciation(
        state.charger_cost,
        state.charger_depreciation,
        charger.depreciation_rate,
    );

    (Money(0.0), maintenance, depreciation)
}

/// Combined fuel-standard credit for the year, as a negative amount.
///
/// The credit is paid while `year < credit_end_year - base_year` and is zero otherwise.
fn credit(params: &ParameterSet, year: u32, previous: Money) -> Money {
    if i64::from(year) >= i64::from(params.credit_window()) {
        return Money(0.0);
    }

    if year == 1 {
        -params.incentives.initial_credit()
    } else {
        decay_credit(previous, params.incentives.credit_decline_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{example_parameters, parameters};
    use crate::units::{Dimensionless, MoneyPerLitre};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    /// Run the operating-cost step for every year, returning the costs for each
    fn run_years(params: &ParameterSet) -> Vec<OperatingCosts> {
        let mut state = RunState::default();
        (1..=7)
            .map(|year| {
                let (costs, next) = operating_costs(params, year, &state);
                state = next;
                costs
            })
            .collect()
    }

    #[rstest]
    fn test_first_year(example_parameters: ParameterSet) {
        let (costs, next) = operating_costs(&example_parameters, 1, &RunState::default());
        assert_approx_eq!(Money, costs.ice.fuel, Money(3000.0), epsilon = 1e-9);
        assert_approx_eq!(Money, costs.ice.insurance, Money(1000.0), epsilon = 1e-9);
        assert_approx_eq!(Money, costs.ice.depreciation, Money(7500.0), epsilon = 1e-9);
        assert_approx_eq!(Money, costs.ev.charging, Money(600.0), epsilon = 1e-9);
        assert_approx_eq!(Money, costs.ev.vehicle_depreciation, Money(10_500.0), epsilon = 1e-9);
        assert_eq!(costs.ev.charger, Money(0.0));
        assert_eq!(costs.ev.credits, Money(0.0));
        assert_approx_eq!(Money, next.ice_depreciation, Money(7500.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_second_year_depreciation(example_parameters: ParameterSet) {
        let years = run_years(&example_parameters);
        assert_approx_eq!(Money, years[1].ice.depreciation, Money(6375.0), epsilon = 1e-9);
        assert_approx_eq!(Money, years[1].ev.vehicle_depreciation, Money(8925.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_zero_escalation_is_constant(example_parameters: ParameterSet) {
        let years = run_years(&example_parameters);
        for costs in &years {
            assert_eq!(costs.ice.fuel, years[0].ice.fuel);
            assert_eq!(costs.ev.charging, years[0].ev.charging);
            assert_eq!(costs.ice.insurance, years[0].ice.insurance);
        }
    }

    #[rstest]
    fn test_escalation(mut example_parameters: ParameterSet) {
        example_parameters.energy.fuel_escalation = Dimensionless(0.1);
        example_parameters.energy.carbon_tax = MoneyPerLitre(0.2);
        example_parameters.energy.maintenance_escalation = Dimensionless(0.05);
        example_parameters.ice.maintenance_per_km = MoneyPerKilometre(0.05);
        let years = run_years(&example_parameters);

        assert_approx_eq!(Money, years[2].ice.fuel, Money(3630.0), epsilon = 1e-9);
        assert_approx_eq!(Money, years[0].ice.carbon_tax, Money(400.0), epsilon = 1e-9);
        assert_approx_eq!(Money, years[1].ice.carbon_tax, Money(440.0), epsilon = 1e-9);
        assert_approx_eq!(Money, years[0].ice.maintenance, Money(1000.0), epsilon = 1e-9);
        assert_approx_eq!(Money, years[1].ice.maintenance, Money(1050.0), epsilon = 1e-9);
    }

    #[rstest]
    fn test_depreciation_shrinks_book_value(parameters: ParameterSet) {
        let mut state = RunState::default();
        for year in 1..=7 {
            let (_, next) = operating_costs(&parameters, year, &state);
            let before = parameters.ev.msrp - state.ev_depreciation;
            let after = parameters.ev.msrp - next.ev_depreciation;
            assert_approx_eq!(
                Money,
                after,
                before * (Dimensionless(1.0) - parameters.ev.depreciation_rate),
                epsilon = 1e-6
            );
            state = next;
        }
    }

    #[rstest]
    fn test_charger_costs(parameters: ParameterSet) {
        let charger = &parameters.charger;
        let cost = charger.allocated_cost();
        let years = run_years(&parameters);

        assert_eq!(years[0].ev.charger, cost);
        assert!(years[1..].iter().all(|c| c.ev.charger == Money(0.0)));

        // Maintenance grows by a fixed increment
        let first = cost * charger.maintenance_rate;
        assert_approx_eq!(Money, years[0].ev.charger_maintenance, first);
        for (i, costs) in years.iter().enumerate() {
            let expected = first + charger.maintenance_increment * Dimensionless(i as f64);
            assert_approx_eq!(
                Money,
                costs.ev.charger_maintenance,
                expected,
                epsilon = 1e-9
            );
        }

        // Half-year rule in the first year
        let rate = charger.depreciation_rate;
        let first_dep = cost * rate * Dimensionless(0.5);
        assert_approx_eq!(Money, years[0].ev.charger_depreciation, first_dep);
        assert_approx_eq!(
            Money,
            years[1].ev.charger_depreciation,
            (cost - first_dep) * rate,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn test_no_charger(example_parameters: ParameterSet) {
        let years = run_years(&example_parameters);
        for costs in years {
            assert_eq!(costs.ev.charger, Money(0.0));
            assert_eq!(costs.ev.charger_maintenance, Money(0.0));
            assert_eq!(costs.ev.charger_depreciation, Money(0.0));
        }
    }

    #[rstest]
    fn test_credit_decay(parameters: ParameterSet) {
        let incentives = &parameters.incentives;
        let window = parameters.credit_window();
        let years = run_years(&parameters);

        assert_eq!(years[0].ev.credits, -incentives.initial_credit());
        for (i, costs) in years.iter().enumerate() {
            let year = i as i32 + 1;
            assert!(costs.ev.credits <= Money(0.0));
            if year >= window {
                assert_eq!(costs.ev.credits, Money(0.0));
            } else if year > 1 {
                assert_approx_eq!(
                    Money,
                    costs.ev.credits,
                    years[i - 1].ev.credits
                        * (Dimensionless(1.0) - incentives.credit_decline_rate),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[rstest]
    #[case(2024)]
    #[case(2025)]
    #[case(0)]
    fn test_credit_window_closed(mut parameters: ParameterSet, #[case] end_year: i32) {
        parameters.incentives.credit_end_year = end_year;
        let years = run_years(&parameters);
        assert!(years.iter().all(|c| c.ev.credits == Money(0.0)));
    }
}
