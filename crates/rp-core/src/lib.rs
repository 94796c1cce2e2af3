//! rp-core: shared foundation for the reservoir property crates.
//!
//! Contains:
//! - error (normalized failure type and failure classification)
//! - method (case-insensitive method name parsing)
//! - numeric (finite-value guard and the nested correlation polynomial)
//! - sample (shape-preserving scalar-or-sequence inputs and outputs)
//! - units (oilfield constants and conversions)

pub mod error;
pub mod method;
pub mod numeric;
pub mod sample;
pub mod units;

pub use error::{FailureKind, PvtError, PvtResult};
pub use method::parse_method;
pub use numeric::*;
pub use sample::{PressureSample, Samples};
pub use units::*;
