//! rp-flow: well inflow and reservoir heterogeneity.
//!
//! - [`rate`]: gas rates from pseudo-pressure differences (with optional
//!   non-Darcy skin) and oil rates from Darcy's law with an optional Vogel
//!   correction below the bubble point
//! - [`lorenz`]: Lorenz coefficient, the B-factor of its exponential or
//!   Langmuir form, and the flow fraction it implies

pub mod lorenz;
pub mod rate;

pub use lorenz::{
    Heterogeneity, LorenzMethod, flow_fraction, lorenz_from_b, lorenz_from_flow_fraction,
    lorenz_to_b,
};
pub use rate::{
    FlowGeometry, LinearFlow, RadialFlow, darcy_gas, gas_rate_linear, gas_rate_radial,
    oil_rate_linear, oil_rate_radial,
};
