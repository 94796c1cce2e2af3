//! rp-oil: black-oil correlations for reservoir oil.
//!
//! Provides:
//! - Bubble point pressure (Standing, Valko-McCain, Velarde) and the inverse
//!   Rsb-from-Pb with an explicit Valko-McCain to Velarde fallback
//! - Solution GOR below the bubble point
//! - Live oil density, formation volume factor and viscosity
//! - Oil compressibility above and below the bubble point
//! - Separator and stock tank gas relations
//!
//! All functions work in oilfield units: psia, degF, scf/stb, rb/stb, cP.
//!
//! # Example
//!
//! ```
//! use rp_oil::{OilConditions, PbMethod, bubble_point, solution_gor_at_bubble_point};
//!
//! let oil = OilConditions::new(35.0, 200.0, 0.75, 0.0).unwrap();
//! let pb = bubble_point(&oil, 800.0, PbMethod::ValkoMcCain).unwrap();
//! let back = solution_gor_at_bubble_point(&oil, pb, PbMethod::ValkoMcCain).unwrap();
//! assert!((back.rsb - 800.0).abs() < 1e-3);
//! assert!(back.fallback.is_none());
//! ```

pub mod bubble_point;
pub mod compressibility;
pub mod conditions;
pub mod density;
pub mod fvf;
pub mod separator;
pub mod solution_gas;
pub mod viscosity;

pub use bubble_point::{
    FallbackReason, PbMethod, RsbInversion, bubble_point, solution_gor_at_bubble_point,
};
pub use compressibility::oil_compressibility;
pub use conditions::OilConditions;
pub use density::{oil_density, pseudo_liquid_density};
pub use fvf::{BoMethod, oil_fvf};
pub use solution_gas::{RsInputs, RsMethod, solution_gor};
pub use viscosity::{beggs_robinson, oil_viscosity};
