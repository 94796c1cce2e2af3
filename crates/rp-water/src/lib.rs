//! rp-water: formation water properties.
//!
//! - [`brine_properties`]: FVF, density, viscosity, compressibility and
//!   dissolved methane of NaCl brine (modified Spivey correlation)
//! - [`saturated_water_content`]: water vapour in equilibrium gas

pub mod brine;
pub mod vapour;

pub use brine::{BrineProperties, brine_properties};
pub use vapour::saturated_water_content;
