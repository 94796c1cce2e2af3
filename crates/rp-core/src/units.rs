// rp-core/src/units.rs

use uom::si::f64::{Pressure, ThermodynamicTemperature};
use uom::si::pressure::{megapascal, pound_force_per_square_inch};
use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit, kelvin};

/// degF to degR offset used by the oilfield correlations.
pub const RANKINE_OFFSET: f64 = 460.0;
/// Standard pressure (psia).
pub const STANDARD_PRESSURE: f64 = 14.7;
/// Standard temperature (degF).
pub const STANDARD_TEMPERATURE: f64 = 60.0;
/// Apparent molecular weight of air (lb/lb-mol).
pub const AIR_MOLECULAR_WEIGHT: f64 = 28.97;
/// Universal gas constant (psia cuft / lb-mol degR).
pub const GAS_CONSTANT: f64 = 10.732;
/// cubic feet per barrel
pub const CUFT_PER_BBL: f64 = 5.61458;
/// Density of fresh water at standard conditions (lb/cuft).
pub const WATER_DENSITY: f64 = 62.4;

#[inline]
pub fn degf_to_rankine(degf: f64) -> f64 {
    degf + RANKINE_OFFSET
}

/// Stock tank oil specific gravity (water = 1) from API gravity.
#[inline]
pub fn api_to_sg(api: f64) -> f64 {
    141.5 / (api + 131.5)
}

#[inline]
pub fn sg_to_api(sg: f64) -> f64 {
    141.5 / sg - 131.5
}

#[inline]
pub fn psia_to_mpa(p: f64) -> f64 {
    Pressure::new::<pound_force_per_square_inch>(p).get::<megapascal>()
}

#[inline]
pub fn degf_to_celsius(degf: f64) -> f64 {
    ThermodynamicTemperature::new::<degree_fahrenheit>(degf).get::<degree_celsius>()
}

#[inline]
pub fn degf_to_kelvin(degf: f64) -> f64 {
    ThermodynamicTemperature::new::<degree_fahrenheit>(degf).get::<kelvin>()
}
