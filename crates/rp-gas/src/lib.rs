//! rp-gas: natural gas properties from black-oil correlations.
//!
//! Provides:
//! - Gas composition (specific gravity plus N2 / CO2 / H2S mole fractions)
//! - Pseudo-critical properties (Piper-McCain-Corredor, Sutton with
//!   Wichert-Aziz correction) with optional user overrides
//! - Z-factor engines (linearized explicit, DAK secant, Hall-Yarborough Newton)
//! - Viscosity, density, formation volume factor and compressibility
//! - Pseudo-pressure integration and pressure recovery from P/Z
//!
//! # Architecture
//!
//! A [`GasModel`] describes the gas and the chosen methods. Resolving it
//! computes the critical properties exactly once and yields a [`ResolvedGas`],
//! which every pressure-dependent evaluation takes. Pressures are accepted as
//! a scalar or a sequence and results come back in the same shape.
//!
//! # Example
//!
//! ```
//! use rp_gas::{GasModel, ZMethod};
//!
//! let gas = GasModel::hydrocarbon(0.75)
//!     .unwrap()
//!     .with_z_method(ZMethod::NewtonRaphson)
//!     .resolve()
//!     .unwrap();
//! let z = gas.z_scalar(2000.0, 200.0).unwrap();
//! assert!(z > 0.8 && z < 0.9);
//! ```

pub mod composition;
pub mod critical;
pub mod inversion;
pub mod model;
pub mod properties;
pub mod pseudo_pressure;
pub mod zfactor;

pub use composition::GasComposition;
pub use critical::{CriticalMethod, CriticalOverrides, CriticalProperties, resolve_critical};
pub use inversion::P_OVER_Z_RTOL;
pub use model::{GasModel, ResolvedGas};
pub use zfactor::{ZFactorResult, ZMethod};
