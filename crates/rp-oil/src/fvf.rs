//! Oil formation volume factor (rb/stb).

use crate::conditions::OilConditions;
use crate::density::oil_density;
use rp_core::{PvtError, PvtResult, parse_method};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoMethod {
    /// Mass balance on the SWMH live oil density.
    #[default]
    Velarde,
    /// Standing (1947), saturated oil only.
    Standing,
}

impl BoMethod {
    pub fn code(&self) -> &'static str {
        match self {
            BoMethod::Velarde => "VELAR",
            BoMethod::Standing => "STAN",
        }
    }
}

impl fmt::Display for BoMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BoMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "oil FVF method",
            &[
                ("VELAR", BoMethod::Velarde),
                ("VELARDE", BoMethod::Velarde),
                ("STAN", BoMethod::Standing),
                ("STANDING", BoMethod::Standing),
            ],
        )
    }
}

impl TryFrom<String> for BoMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BoMethod> for String {
    fn from(m: BoMethod) -> Self {
        m.code().to_string()
    }
}

/// Stock tank oil plus dissolved gas mass per stb, divided by 5.615.
pub(crate) fn velarde_numerator(oil: &OilConditions, rs: f64) -> f64 {
    oil.sg_o() * 62.372 + 0.013357 * rs * oil.sg_g()
}

/// Oil FVF at `p` with `rs` in solution for an oil whose bubble point is `pb`.
///
/// Above the bubble point `rs` is the bubble point GOR.
pub fn oil_fvf(oil: &OilConditions, p: f64, pb: f64, rs: f64, method: BoMethod) -> PvtResult<f64> {
    match method {
        BoMethod::Velarde => {
            let rho = oil_density(oil, p, rs, rs, pb)?;
            Ok(velarde_numerator(oil, rs) / rho)
        }
        BoMethod::Standing => {
            let x = rs * (oil.sg_g() / oil.sg_o()).sqrt() + 1.25 * oil.degf();
            Ok(0.972 + 1.47e-4 * x.powf(1.175))
        }
    }
}
