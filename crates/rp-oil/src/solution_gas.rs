//! Solution gas-oil ratio below the bubble point.

use crate::bubble_point::{PbMethod, bubble_point};
use crate::conditions::OilConditions;
use rp_core::{PvtError, PvtResult, STANDARD_PRESSURE, degf_to_rankine, parse_method};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RsMethod {
    /// Velarde, Blasingame & McCain (1999), scaled from Rsb.
    #[default]
    Velarde,
    Standing,
    /// Vasquez & Beggs (1980), normalised to a 100 psig separator.
    VasquezBeggs,
}

impl RsMethod {
    pub fn code(&self) -> &'static str {
        match self {
            RsMethod::Velarde => "VELAR",
            RsMethod::Standing => "STAN",
            RsMethod::VasquezBeggs => "VASBG",
        }
    }
}

impl fmt::Display for RsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RsMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "solution GOR method",
            &[
                ("VELAR", RsMethod::Velarde),
                ("VELARDE", RsMethod::Velarde),
                ("STAN", RsMethod::Standing),
                ("STANDING", RsMethod::Standing),
                ("VASBG", RsMethod::VasquezBeggs),
                ("VASQUEZBEGGS", RsMethod::VasquezBeggs),
            ],
        )
    }
}

impl TryFrom<String> for RsMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RsMethod> for String {
    fn from(m: RsMethod) -> Self {
        m.code().to_string()
    }
}

/// Extra inputs some Rs correlations need.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsInputs {
    /// Bubble point (psia). Velarde estimates it from `rsb` with
    /// Valko-McCain when absent.
    pub pb: Option<f64>,
    /// Solution GOR at bubble point (scf/stb).
    pub rsb: f64,
    /// Separator temperature (degF) for Vasquez & Beggs.
    pub degf_sep: f64,
    /// Separator pressure (psia) for Vasquez & Beggs.
    pub p_sep: f64,
}

impl Default for RsInputs {
    fn default() -> Self {
        Self {
            pb: None,
            rsb: 0.0,
            degf_sep: 80.0,
            p_sep: 114.7,
        }
    }
}

impl RsInputs {
    pub fn saturated(pb: f64, rsb: f64) -> Self {
        Self {
            pb: Some(pb),
            rsb,
            ..Self::default()
        }
    }
}

/// Solution GOR (scf/stb) at pressure `p` (psia).
///
/// When both `pb` and a positive `rsb` are known, pressures at or above the
/// bubble point return `rsb`.
pub fn solution_gor(
    oil: &OilConditions,
    p: f64,
    inputs: &RsInputs,
    method: RsMethod,
) -> PvtResult<f64> {
    if !p.is_finite() || p < 0.0 {
        return Err(PvtError::InvalidArg {
            what: "pressure must be finite and non-negative",
        });
    }
    if matches!(inputs.pb, Some(pb) if inputs.rsb > 0.0 && p >= pb) {
        return Ok(inputs.rsb);
    }

    match method {
        RsMethod::Velarde => {
            if inputs.rsb <= 0.0 {
                return Err(PvtError::configuration(
                    "Velarde solution GOR needs a positive Rsb",
                ));
            }
            let pb = match inputs.pb {
                Some(pb) if pb > STANDARD_PRESSURE => pb,
                Some(_) => {
                    return Err(PvtError::configuration(
                        "Velarde solution GOR needs a bubble point above 14.7 psia",
                    ));
                }
                None => bubble_point(oil, inputs.rsb, PbMethod::ValkoMcCain)?,
            };
            Ok(rs_velarde(oil, p, pb, inputs.rsb))
        }
        RsMethod::Standing => {
            let a = 0.00091 * oil.degf() - 0.0125 * oil.api();
            Ok(oil.sg_g() * ((p / 18.2 + 1.4) * 10f64.powf(-a)).powf(1.2048))
        }
        RsMethod::VasquezBeggs => Ok(rs_vasquez_beggs(oil, p, inputs)),
    }
}

/// Velarde Rs without the above-Pb clamp. Pressures at or below 14.7 psia
/// have no solution gas.
pub(crate) fn rs_velarde(oil: &OilConditions, p: f64, pb: f64, rsb: f64) -> f64 {
    const A: [f64; 5] = [9.73e-7, 1.672608, 0.929870, 0.247235, 1.056052];
    const B: [f64; 5] = [0.022339, -1.004750, 0.337711, 0.132795, 0.302065];
    const C: [f64; 5] = [0.725167, -1.485480, -0.164741, -0.091330, 0.047094];

    if p <= STANDARD_PRESSURE {
        return 0.0;
    }
    let coef = |x: &[f64; 5]| {
        x[0] * oil.sg_sp().powf(x[1])
            * oil.api().powf(x[2])
            * oil.degf().powf(x[3])
            * (pb - STANDARD_PRESSURE).powf(x[4])
    };
    let (a1, a2, a3) = (coef(&A), coef(&B), coef(&C));
    let pr = (p - STANDARD_PRESSURE) / (pb - STANDARD_PRESSURE);
    rsb * (a1 * pr.powf(a2) + (1.0 - a1) * pr.powf(a3))
}

fn rs_vasquez_beggs(oil: &OilConditions, p: f64, inputs: &RsInputs) -> f64 {
    let api = oil.api();
    let sg_100 =
        oil.sg_sp() * (1.0 + 5.912e-5 * api * inputs.degf_sep * (inputs.p_sep / 114.7).log10());
    let t = degf_to_rankine(oil.degf());
    if api <= 30.0 {
        0.0362 * sg_100 * p.powf(1.0937) * (25.7240 * api / t).exp()
    } else {
        0.0178 * sg_100 * p.powf(1.1870) * (23.9310 * api / t).exp()
    }
}
