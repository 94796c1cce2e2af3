//! Stock tank oil and surface gas description shared by the oil correlations.

use rp_core::{PvtError, PvtResult, api_to_sg};
use serde::{Deserialize, Serialize};

/// Oil gravity, reservoir temperature and the surface gas gravities.
///
/// `sg_g` is the weighted average surface gas gravity and `sg_sp` the
/// separator gas gravity. When only one of them is known the other takes the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OilConditions {
    api: f64,
    degf: f64,
    sg_g: f64,
    sg_sp: f64,
    separator_measured: bool,
}

impl OilConditions {
    /// Gravities that are zero or negative are treated as unknown. At least
    /// one of them has to be given.
    pub fn new(api: f64, degf: f64, sg_g: f64, sg_sp: f64) -> PvtResult<Self> {
        if !api.is_finite() || api <= 0.0 {
            return Err(PvtError::configuration("oil API gravity must be positive"));
        }
        if !degf.is_finite() {
            return Err(PvtError::InvalidArg {
                what: "temperature must be finite",
            });
        }
        let known = |v: f64| v.is_finite() && v > 0.0;
        let (sg_g, sg_sp, separator_measured) = match (known(sg_g), known(sg_sp)) {
            (true, true) => (sg_g, sg_sp, true),
            (true, false) => (sg_g, sg_g, false),
            (false, true) => (sg_sp, sg_sp, true),
            (false, false) => {
                return Err(PvtError::configuration(
                    "at least one of surface gas or separator gas gravity is required",
                ));
            }
        };
        Ok(Self {
            api,
            degf,
            sg_g,
            sg_sp,
            separator_measured,
        })
    }

    pub fn api(&self) -> f64 {
        self.api
    }

    pub fn degf(&self) -> f64 {
        self.degf
    }

    pub fn sg_g(&self) -> f64 {
        self.sg_g
    }

    pub fn sg_sp(&self) -> f64 {
        self.sg_sp
    }

    /// Stock tank oil specific gravity (water = 1).
    pub fn sg_o(&self) -> f64 {
        api_to_sg(self.api)
    }

    /// Whether a separator gas gravity was supplied rather than copied from
    /// the surface gas gravity.
    pub fn separator_measured(&self) -> bool {
        self.separator_measured
    }
}
