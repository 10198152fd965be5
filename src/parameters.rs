//! Defines the [`ParameterSet`] struct, which represents the contents of `parameters.toml`.
//!
//! A parameter set holds every numeric input needed to compare one electric vehicle with one
//! combustion vehicle. It is immutable once loaded and is shared read-only by the scenario
//! calculators.
use crate::input::{deserialise_proportion, input_err_msg, read_toml};
use crate::scenario::ScenarioMode;
use crate::units::{
    Dimensionless, Kilometres, KilowattHoursPerKilometre, LitresPerKilometre, Money,
    MoneyPerKilometre, MoneyPerKilowattHour, MoneyPerLitre,
};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;

const PARAMETERS_FILE_NAME: &str = "parameters.toml";

/// The number of operating years the calculators are built for
pub const ANALYSIS_YEARS: u32 = 7;

/// Upper bound for a plausible combustion vehicle fuel consumption
const MAX_ICE_EFFICIENCY: f64 = 1.0;

/// Upper bound for a plausible electric vehicle energy consumption
const MAX_EV_EFFICIENCY: f64 = 2.0;

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_analysis_years, u32, ANALYSIS_YEARS);
define_param_default!(default_base_year, i32, 2024);
define_param_default!(default_payments_per_year, u32, 12);
define_param_default!(default_caas_term_years, u32, 7);
define_unit_param_default!(default_charger_maintenance_increment, Money, 1.02);
define_unit_param_default!(default_caas_markup, Dimensionless, 1.8);

/// Represents the contents of the entire parameters file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParameterSet {
    /// Number of operating years in the analysis
    #[serde(default = "default_analysis_years")]
    pub analysis_years: u32,
    /// Calendar year of period zero, against which the credit program end year is measured
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// Rate used to discount each period's total to present value
    pub discount_rate: Dimensionless,
    /// Distance driven by each vehicle every year
    pub annual_distance: Kilometres,
    /// Whether depreciation is included in the period totals
    #[serde(default)]
    pub depreciation_treatment: DepreciationTreatment,
    /// The combustion vehicle
    pub ice: IceVehicle,
    /// The electric vehicle
    pub ev: EvVehicle,
    /// Energy prices and escalation
    pub energy: EnergyPrices,
    /// Charging infrastructure. If absent, no charger is installed.
    #[serde(default)]
    pub charger: ChargerParameters,
    /// Government incentives and credit programs
    #[serde(default)]
    pub incentives: IncentiveParameters,
    /// Terms for the Charging-as-a-Service variant.
    ///
    /// Only read for validation: there is no calculator for this variant.
    #[serde(default)]
    pub caas: Option<ChargingAsAServiceTerms>,
}

/// Parameters for one vehicle, generic over the unit of its energy efficiency.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Vehicle<E> {
    /// Manufacturer's suggested retail price; the basis for depreciation and insurance
    pub msrp: Money,
    /// Energy used per kilometre
    pub efficiency: E,
    /// Maintenance cost per kilometre in the first year
    #[serde(default)]
    pub maintenance_per_km: MoneyPerKilometre,
    /// Annual insurance premium as a fraction of MSRP
    #[serde(default)]
    pub insurance_rate: Dimensionless,
    /// Fraction of remaining book value written off each year
    #[serde(deserialize_with = "deserialise_proportion")]
    pub depreciation_rate: Dimensionless,
    /// Loan terms, required for the financing scenarios
    #[serde(default)]
    pub financing: Option<LoanTerms>,
}

/// An internal-combustion vehicle, with efficiency in litres per kilometre
pub type IceVehicle = Vehicle<LitresPerKilometre>;

/// An electric vehicle, with efficiency in kilowatt hours per kilometre
pub type EvVehicle = Vehicle<KilowattHoursPerKilometre>;

/// Terms of the loan used to finance a vehicle
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct LoanTerms {
    /// Fraction of MSRP paid upfront
    #[serde(deserialize_with = "deserialise_proportion")]
    pub down_payment_fraction: Dimensionless,
    /// Nominal annual interest rate
    pub interest_rate: Dimensionless,
    /// Full loan term, which may be longer than the analysis horizon
    pub term_years: u32,
    /// Number of payment (and compounding) periods per year
    #[serde(default = "default_payments_per_year")]
    pub payments_per_year: u32,
}

/// Energy prices and annual escalation rates
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EnergyPrices {
    /// Fuel price in the first year
    pub fuel_price: MoneyPerLitre,
    /// Annual escalation of the fuel price (also applied to the carbon tax)
    #[serde(default)]
    pub fuel_escalation: Dimensionless,
    /// Electricity price in the first year
    pub electricity_price: MoneyPerKilowattHour,
    /// Annual escalation of the electricity price
    #[serde(default)]
    pub electricity_escalation: Dimensionless,
    /// Carbon tax charged per litre of fuel in the first year
    #[serde(default)]
    pub carbon_tax: MoneyPerLitre,
    /// Annual escalation of per-kilometre maintenance rates
    #[serde(default)]
    pub maintenance_escalation: Dimensionless,
}

/// Charging infrastructure attributed to the electric vehicle.
///
/// The default is "no charger": zero cost and zero maintenance.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ChargerParameters {
    /// Capital cost of the charger installation
    #[serde(default)]
    pub cost: Money,
    /// Share of the charger cost allocated to the vehicle
    #[serde(default, deserialize_with = "deserialise_proportion")]
    pub allocation: Dimensionless,
    /// First-year maintenance as a fraction of the allocated charger cost
    #[serde(default)]
    pub maintenance_rate: Dimensionless,
    /// Fixed amount added to charger maintenance every year after the first.
    ///
    /// This is additive, not a percentage escalation.
    #[serde(default = "default_charger_maintenance_increment")]
    pub maintenance_increment: Money,
    /// Capital cost allowance rate for the charger's asset class
    #[serde(default, deserialize_with = "deserialise_proportion")]
    pub depreciation_rate: Dimensionless,
}

impl ChargerParameters {
    /// The charger cost allocated to the vehicle
    pub fn allocated_cost(&self) -> Money {
        self.cost * self.allocation
    }
}

/// Purchase incentives and the declining credit program
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct IncentiveParameters {
    /// Federal purchase rebate for the electric vehicle
    #[serde(default)]
    pub federal_rebate: Money,
    /// Incentive towards the charger installation
    #[serde(default)]
    pub charger_incentive: Money,
    /// First-year clean fuel regulation credit
    #[serde(default)]
    pub cfr_credit: Money,
    /// First-year low carbon fuel standard credit
    #[serde(default)]
    pub lcfs_credit: Money,
    /// Fraction by which the combined credit shrinks each year
    #[serde(default, deserialize_with = "deserialise_proportion")]
    pub credit_decline_rate: Dimensionless,
    /// Calendar year in which the credit program ends (zero if there is no program)
    #[serde(default)]
    pub credit_end_year: i32,
}

impl IncentiveParameters {
    /// Combined first-year credit, as a positive amount
    pub fn initial_credit(&self) -> Money {
        self.cfr_credit + self.lcfs_credit
    }
}

/// Terms for the Charging-as-a-Service variant
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ChargingAsAServiceTerms {
    /// Multiplier applied to the charging cost by the service provider
    #[serde(default = "default_caas_markup")]
    pub markup: Dimensionless,
    /// Length of the service contract
    #[serde(default = "default_caas_term_years")]
    pub term_years: u32,
}

/// How depreciation enters the period totals
#[derive(DeserializeLabeledStringEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepreciationTreatment {
    /// Depreciation is a cost and is added to the period totals
    #[default]
    #[string = "expensed"]
    Expensed,
    /// Depreciation is reported as a line item but excluded from totals (cash-flow view)
    #[string = "reported"]
    Reported,
}

/// Push a message if `value` is negative or not finite
fn check_non_negative(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(format!("{name} must be a finite, non-negative number"));
    }
}

/// Push a message if `value` is not a proportion between 0 and 1
fn check_proportion(errors: &mut Vec<String>, name: &str, value: Dimensionless) {
    if !(0.0..=1.0).contains(&value.0) {
        errors.push(format!("{name} must be between 0 and 1"));
    }
}

/// Check the parameters of a single vehicle
fn check_vehicle<E>(
    errors: &mut Vec<String>,
    label: &str,
    vehicle: &Vehicle<E>,
    max_efficiency: f64,
    efficiency_unit: &str,
) where
    E: Copy + Into<f64>,
{
    if !(vehicle.msrp.is_finite() && vehicle.msrp > Money(0.0)) {
        errors.push(format!("{label} MSRP must be positive"));
    }

    let efficiency: f64 = vehicle.efficiency.into();
    if !(efficiency.is_finite() && efficiency > 0.0) {
        errors.push(format!("{label} efficiency must be positive"));
    } else if efficiency > max_efficiency {
        errors.push(format!(
            "{label} efficiency unusually high: {efficiency} {efficiency_unit}"
        ));
    }

    check_non_negative(
        errors,
        &format!("{label} maintenance per km"),
        vehicle.maintenance_per_km.value(),
    );
    check_non_negative(
        errors,
        &format!("{label} insurance rate"),
        vehicle.insurance_rate.value(),
    );
    check_proportion(
        errors,
        &format!("{label} depreciation rate"),
        vehicle.depreciation_rate,
    );
}

/// Check the loan terms of a single vehicle
fn check_financing(errors: &mut Vec<String>, label: &str, terms: Option<&LoanTerms>) {
    let Some(terms) = terms else {
        errors.push(format!("{label} financing terms required for financing scenario"));
        return;
    };

    check_proportion(
        errors,
        &format!("{label} down payment fraction"),
        terms.down_payment_fraction,
    );
    check_non_negative(
        errors,
        &format!("{label} interest rate"),
        terms.interest_rate.value(),
    );
    if terms.term_years == 0 {
        errors.push(format!("{label} loan term must be positive"));
    }
    if terms.payments_per_year == 0 {
        errors.push(format!("{label} payments per year must be positive"));
    }
}

/// Check a parameter set for the given scenario mode.
///
/// # Returns
///
/// A list of human-readable violations, which is empty if the parameters are valid.
pub fn validate_parameters(params: &ParameterSet, mode: ScenarioMode) -> Vec<String> {
    let mut errors = Vec::new();

    if params.analysis_years == 0 {
        errors.push("Analysis horizon must be positive".to_string());
    }
    if !(params.annual_distance.is_finite() && params.annual_distance > Kilometres(0.0)) {
        errors.push("Annual distance must be positive".to_string());
    }
    check_non_negative(&mut errors, "Discount rate", params.discount_rate.value());

    check_vehicle(&mut errors, "ICE", &params.ice, MAX_ICE_EFFICIENCY, "L/km");
    check_vehicle(&mut errors, "EV", &params.ev, MAX_EV_EFFICIENCY, "kWh/km");

    let energy = &params.energy;
    for (name, value) in [
        ("Fuel price", energy.fuel_price.value()),
        ("Fuel escalation", energy.fuel_escalation.value()),
        ("Electricity price", energy.electricity_price.value()),
        ("Electricity escalation", energy.electricity_escalation.value()),
        ("Carbon tax", energy.carbon_tax.value()),
        ("Maintenance escalation", energy.maintenance_escalation.value()),
    ] {
        check_non_negative(&mut errors, name, value);
    }

    let charger = &params.charger;
    for (name, value) in [
        ("Charger cost", charger.cost.value()),
        ("Charger maintenance rate", charger.maintenance_rate.value()),
        ("Charger maintenance increment", charger.maintenance_increment.value()),
    ] {
        check_non_negative(&mut errors, name, value);
    }
    check_proportion(&mut errors, "Charger allocation", charger.allocation);
    check_proportion(
        &mut errors,
        "Charger depreciation rate",
        charger.depreciation_rate,
    );

    let incentives = &params.incentives;
    for (name, value) in [
        ("Federal rebate", incentives.federal_rebate.value()),
        ("Charger incentive", incentives.charger_incentive.value()),
        ("CFR credit", incentives.cfr_credit.value()),
        ("LCFS credit", incentives.lcfs_credit.value()),
    ] {
        check_non_negative(&mut errors, name, value);
    }
    check_proportion(
        &mut errors,
        "Credit decline rate",
        incentives.credit_decline_rate,
    );

    if mode.is_financed() {
        check_financing(&mut errors, "ICE", params.ice.financing.as_ref());
        check_financing(&mut errors, "EV", params.ev.financing.as_ref());
    }

    if let (ScenarioMode::ChargingAsAService, Some(caas)) = (mode, &params.caas) {
        if !(caas.markup.is_finite() && caas.markup >= Dimensionless(1.0)) {
            errors.push("Charging-as-a-Service markup must be at least 1".to_string());
        }
        if caas.term_years == 0 {
            errors.push("Charging-as-a-Service term must be positive".to_string());
        }
    }

    errors
}

impl ParameterSet {
    /// Read a parameters file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing the parameters file
    /// * `mode` - The scenario the parameters will be used for
    ///
    /// # Returns
    ///
    /// The file contents as a [`ParameterSet`] or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P, mode: ScenarioMode) -> Result<ParameterSet> {
        let file_path = model_dir.as_ref().join(PARAMETERS_FILE_NAME);
        let params: ParameterSet = read_toml(&file_path)?;

        params
            .validate(mode)
            .with_context(|| input_err_msg(&file_path))?;

        Ok(params)
    }

    /// Validate the parameters for the given scenario mode, failing on the first violation list
    pub fn validate(&self, mode: ScenarioMode) -> Result<()> {
        let errors = validate_parameters(self, mode);
        ensure!(
            errors.is_empty(),
            "Invalid parameters:\n  * {}",
            errors.join("\n  * ")
        );

        Ok(())
    }

    /// Number of years over which the declining credit is paid, measured from `base_year`
    pub fn credit_window(&self) -> i32 {
        self.incentives.credit_end_year - self.base_year
    }
}
