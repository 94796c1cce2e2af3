//! Pseudo-critical temperature and pressure of the gas.
//!
//! Temperatures are in degrees Rankine and pressures in psia.

use crate::composition::GasComposition;
use rp_core::{PvtError, PvtResult, parse_method};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Correlation used to estimate pseudo-critical properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CriticalMethod {
    /// Piper, McCain & Corredor (1999).
    #[default]
    PiperMcCainCorredor,
    /// Sutton (1985) hydrocarbon correlation with the Wichert & Aziz
    /// sour gas correction.
    Sutton,
}

impl CriticalMethod {
    pub fn code(&self) -> &'static str {
        match self {
            CriticalMethod::PiperMcCainCorredor => "PMC",
            CriticalMethod::Sutton => "SUT",
        }
    }
}

impl fmt::Display for CriticalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CriticalMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "critical property method",
            &[
                ("PMC", CriticalMethod::PiperMcCainCorredor),
                ("PIPERMCCAINCORREDOR", CriticalMethod::PiperMcCainCorredor),
                ("SUT", CriticalMethod::Sutton),
                ("SUTTON", CriticalMethod::Sutton),
            ],
        )
    }
}

impl TryFrom<String> for CriticalMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CriticalMethod> for String {
    fn from(m: CriticalMethod) -> Self {
        m.code().to_string()
    }
}

/// Pseudo-critical temperature (degR) and pressure (psia).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalProperties {
    pub tc: f64,
    pub pc: f64,
}

/// User-supplied critical properties that take precedence over the correlation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CriticalOverrides {
    pub tc: Option<f64>,
    pub pc: Option<f64>,
}

impl CriticalOverrides {
    /// Build overrides from raw values where anything not positive means
    /// "not supplied".
    pub fn from_values(tc: f64, pc: f64) -> Self {
        let positive = |v: f64| (v.is_finite() && v > 0.0).then_some(v);
        Self {
            tc: positive(tc),
            pc: positive(pc),
        }
    }

    fn positive_tc(&self) -> Option<f64> {
        self.tc.filter(|v| v.is_finite() && *v > 0.0)
    }

    fn positive_pc(&self) -> Option<f64> {
        self.pc.filter(|v| v.is_finite() && *v > 0.0)
    }
}

// Critical properties of the non-hydrocarbon components
const H2S_TC: f64 = 672.35;
const H2S_PC: f64 = 1306.0;
const CO2_TC: f64 = 547.58;
const CO2_PC: f64 = 1071.0;
const N2_TC: f64 = 239.26;
const N2_PC: f64 = 507.5;

/// Resolve pseudo-critical properties for `composition`.
///
/// When both overrides are positive they are returned as is and the
/// correlation is not evaluated. Otherwise the correlation runs and each
/// positive override replaces its own value.
pub fn resolve_critical(
    composition: &GasComposition,
    method: CriticalMethod,
    overrides: CriticalOverrides,
) -> PvtResult<CriticalProperties> {
    if let (Some(tc), Some(pc)) = (overrides.positive_tc(), overrides.positive_pc()) {
        return Ok(CriticalProperties { tc, pc });
    }

    let mut crit = match method {
        CriticalMethod::PiperMcCainCorredor => piper_mccain_corredor(composition),
        CriticalMethod::Sutton => sutton_wichert_aziz(composition)?,
    };
    if let Some(tc) = overrides.positive_tc() {
        crit.tc = tc;
    }
    if let Some(pc) = overrides.positive_pc() {
        crit.pc = pc;
    }

    if !(crit.tc.is_finite() && crit.tc > 0.0 && crit.pc.is_finite() && crit.pc > 0.0) {
        return Err(PvtError::NonFinite {
            what: "pseudo-critical properties",
            value: if crit.tc.is_finite() { crit.pc } else { crit.tc },
        });
    }
    Ok(crit)
}

/// Piper, McCain & Corredor (1999), equations 2.4 - 2.6 of McCain's
/// correlation handbook.
pub fn piper_mccain_corredor(composition: &GasComposition) -> CriticalProperties {
    const ALPHA: [f64; 6] = [0.11582, -0.4582, -0.90348, -0.66026, 0.70729, -0.099397];
    const BETA: [f64; 6] = [3.8216, -0.06534, -0.42113, -0.91249, 17.438, -3.2191];

    let sg = composition.sg();
    let inerts = [
        (composition.h2s(), H2S_TC, H2S_PC),
        (composition.co2(), CO2_TC, CO2_PC),
        (composition.n2(), N2_TC, N2_PC),
    ];

    let mut j = ALPHA[0] + ALPHA[4] * sg + ALPHA[5] * sg * sg;
    let mut k = BETA[0] + BETA[4] * sg + BETA[5] * sg * sg;
    for (i, (y, tc, pc)) in inerts.iter().enumerate() {
        j += ALPHA[i + 1] * y * tc / pc;
        k += BETA[i + 1] * y * tc / pc.sqrt();
    }

    let tc = k * k / j;
    CriticalProperties { tc, pc: tc / j }
}

/// Sutton (1985) with the Wichert & Aziz (1972) correction for CO2 and H2S.
///
/// Fails when the gas has no hydrocarbon fraction left to correlate.
pub fn sutton_wichert_aziz(composition: &GasComposition) -> PvtResult<CriticalProperties> {
    let (n2, co2, h2s) = (composition.n2(), composition.co2(), composition.h2s());
    let hc = 1.0 - n2 - co2 - h2s;
    if hc <= 0.0 {
        return Err(PvtError::configuration(
            "Sutton critical properties need a non-zero hydrocarbon fraction",
        ));
    }

    let sg_hc = (composition.sg() - (n2 * 28.01 + co2 * 44.01 + h2s * 34.1) / 28.966) / hc;
    let sour = co2 + h2s;
    let eps = 120.0 * (sour.powf(0.9) - sour.powf(1.6)) + 15.0 * (h2s.sqrt() - h2s.powi(4));

    let ppc_hc = 756.8 - 131.0 * sg_hc - 3.6 * sg_hc * sg_hc;
    let tpc_hc = 169.2 + 349.5 * sg_hc - 74.0 * sg_hc * sg_hc;

    // Kay's mixing rule over hydrocarbon and inert components
    let ppc_star = hc * ppc_hc + n2 * N2_PC + co2 * CO2_PC + h2s * H2S_PC;
    let tpc_star = hc * tpc_hc + n2 * N2_TC + co2 * CO2_TC + h2s * H2S_TC;

    let tc = tpc_star - eps;
    let pc = ppc_star * tc / (tpc_star + h2s * (1.0 - h2s) * eps);
    Ok(CriticalProperties { tc, pc })
}
