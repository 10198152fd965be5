//! Fixtures for tests
use crate::parameters::{
    ChargerParameters, DepreciationTreatment, EnergyPrices, EvVehicle, IceVehicle,
    IncentiveParameters, LoanTerms, ParameterSet,
};
use crate::units::{
    Dimensionless, Kilometres, KilowattHoursPerKilometre, LitresPerKilometre, Money,
    MoneyPerKilometre, MoneyPerKilowattHour, MoneyPerLitre,
};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A purchase scenario with every cost line in use
#[fixture]
pub fn parameters() -> ParameterSet {
    ParameterSet {
        analysis_years: 7,
        base_year: 2024,
        discount_rate: Dimensionless(0.05),
        annual_distance: Kilometres(20_000.0),
        depreciation_treatment: DepreciationTreatment::Expensed,
        ice: IceVehicle {
            msrp: Money(45_000.0),
            efficiency: LitresPerKilometre(0.09),
            maintenance_per_km: MoneyPerKilometre(0.06),
            insurance_rate: Dimensionless(0.025),
            depreciation_rate: Dimensionless(0.2),
            financing: None,
        },
        ev: EvVehicle {
            msrp: Money(60_000.0),
            efficiency: KilowattHoursPerKilometre(0.2),
            maintenance_per_km: MoneyPerKilometre(0.03),
            insurance_rate: Dimensionless(0.025),
            depreciation_rate: Dimensionless(0.25),
            financing: None,
        },
        energy: EnergyPrices {
            fuel_price: MoneyPerLitre(1.6),
            fuel_escalation: Dimensionless(0.03),
            electricity_price: MoneyPerKilowattHour(0.14),
            electricity_escalation: Dimensionless(0.02),
            carbon_tax: MoneyPerLitre(0.17),
            maintenance_escalation: Dimensionless(0.02),
        },
        charger: ChargerParameters {
            cost: Money(8000.0),
            allocation: Dimensionless(0.5),
            maintenance_rate: Dimensionless(0.05),
            maintenance_increment: Money(1.02),
            depreciation_rate: Dimensionless(0.3),
        },
        incentives: IncentiveParameters {
            federal_rebate: Money(5000.0),
            charger_incentive: Money(1000.0),
            cfr_credit: Money(300.0),
            lcfs_credit: Money(200.0),
            credit_decline_rate: Dimensionless(0.1),
            credit_end_year: 2029,
        },
        caas: None,
    }
}

/// The same vehicles as [`parameters`], financed
#[fixture]
pub fn financed_parameters(mut parameters: ParameterSet) -> ParameterSet {
    parameters.ice.financing = Some(LoanTerms {
        down_payment_fraction: Dimensionless(0.1),
        interest_rate: Dimensionless(0.069),
        term_years: 6,
        payments_per_year: 12,
    });
    parameters.ev.financing = Some(LoanTerms {
        down_payment_fraction: Dimensionless(0.15),
        interest_rate: Dimensionless(0.059),
        term_years: 7,
        payments_per_year: 12,
    });

    parameters
}

/// A simple purchase scenario: no escalation, incentives, charger or maintenance
#[fixture]
pub fn example_parameters() -> ParameterSet {
    ParameterSet {
        analysis_years: 7,
        base_year: 2024,
        discount_rate: Dimensionless(0.04),
        annual_distance: Kilometres(20_000.0),
        depreciation_treatment: DepreciationTreatment::Expensed,
        ice: IceVehicle {
            msrp: Money(50_000.0),
            efficiency: LitresPerKilometre(0.10),
            maintenance_per_km: MoneyPerKilometre(0.0),
            insurance_rate: Dimensionless(0.02),
            depreciation_rate: Dimensionless(0.15),
            financing: None,
        },
        ev: EvVehicle {
            msrp: Money(70_000.0),
            efficiency: KilowattHoursPerKilometre(0.25),
            maintenance_per_km: MoneyPerKilometre(0.0),
            insurance_rate: Dimensionless(0.02),
            depreciation_rate: Dimensionless(0.15),
            financing: None,
        },
        energy: EnergyPrices {
            fuel_price: MoneyPerLitre(1.5),
            fuel_escalation: Dimensionless(0.0),
            electricity_price: MoneyPerKilowattHour(0.12),
            electricity_escalation: Dimensionless(0.0),
            carbon_tax: MoneyPerLitre(0.0),
            maintenance_escalation: Dimensionless(0.0),
        },
        charger: ChargerParameters::default(),
        incentives: IncentiveParameters::default(),
        caas: None,
    }
}
