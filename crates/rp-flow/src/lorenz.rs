//! Lorenz coefficient of heterogeneity.
//!
//! The cumulative flow capacity against cumulative storage curve is described
//! by one shape factor B, in either of two forms:
//!
//! - Exponential: `F(x) = (1 - exp(-B x)) / (1 - exp(-B))`
//! - Langmuir: `F(x) = VL x / (PL + x)` with `PL = 1 / B` and `VL = PL + 1`
//!
//! The Lorenz coefficient is twice the area between that curve and the
//! diagonal.

use rp_core::{PvtError, PvtResult, Samples, parse_method};
use rp_solver::bisect_solve;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Lower bound of every B search, and the smallest B evaluated.
const B_MIN: f64 = 1e-6;
/// Relative tolerance of the B searches.
const B_RTOL: f64 = 1e-7;
/// Lorenz coefficients below this map to a fixed, nearly homogeneous B.
const LORENZ_FLOOR: f64 = 0.000333;
/// Lorenz coefficients above this map to the largest representable B.
const LORENZ_CEILING: f64 = 0.997179125528914;
/// Returned when a flow fraction is inconsistent with its storage fraction.
const INCONSISTENT_FLOW_FRACTION_LORENZ: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LorenzMethod {
    #[default]
    Exponential,
    Langmuir,
}

impl LorenzMethod {
    pub fn code(&self) -> &'static str {
        match self {
            LorenzMethod::Exponential => "EXP",
            LorenzMethod::Langmuir => "LANG",
        }
    }

    /// Largest B before the curve evaluation overflows or flattens out.
    fn b_max(&self) -> f64 {
        match self {
            LorenzMethod::Exponential => 709.0,
            LorenzMethod::Langmuir => 25000.0,
        }
    }

    /// B used for coefficients below [`LORENZ_FLOOR`].
    fn b_floor(&self) -> f64 {
        match self {
            LorenzMethod::Exponential => 0.002,
            LorenzMethod::Langmuir => 0.001,
        }
    }

    fn clamp_b(&self, b: f64) -> f64 {
        b.max(B_MIN).min(self.b_max())
    }

    fn curve(&self, b: f64, x: f64) -> f64 {
        let b = self.clamp_b(b);
        match self {
            LorenzMethod::Exponential => (1.0 - (-b * x).exp()) / (1.0 - (-b).exp()),
            LorenzMethod::Langmuir => {
                let pl = 1.0 / b;
                let vl = pl + 1.0;
                vl * x / (pl + x)
            }
        }
    }
}

impl fmt::Display for LorenzMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LorenzMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "Lorenz method",
            &[
                ("EXP", LorenzMethod::Exponential),
                ("EXPONENTIAL", LorenzMethod::Exponential),
                ("LANG", LorenzMethod::Langmuir),
                ("LANGMUIR", LorenzMethod::Langmuir),
            ],
        )
    }
}

impl TryFrom<String> for LorenzMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LorenzMethod> for String {
    fn from(m: LorenzMethod) -> Self {
        m.code().to_string()
    }
}

/// How the heterogeneity of a flow fraction calculation is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Heterogeneity {
    /// Shape factor of the chosen form.
    B(f64),
    /// Lorenz coefficient, converted to B first.
    Lorenz(f64),
}

/// Lorenz coefficient for shape factor `b`.
///
/// `b` is clamped into the method's usable range first.
pub fn lorenz_from_b(b: f64, method: LorenzMethod) -> f64 {
    let b = method.clamp_b(b);
    match method {
        LorenzMethod::Exponential => 2.0 * (1.0 / (b.exp() - 1.0) - 1.0 / b) + 1.0,
        LorenzMethod::Langmuir => {
            let pl = 1.0 / b;
            let vl = pl + 1.0;
            (vl - pl * vl * vl.ln() + pl * vl * pl.ln() - 0.5) * 2.0
        }
    }
}

/// Shape factor B reproducing the Lorenz coefficient `lorenz` (0 to 1).
pub fn lorenz_to_b(lorenz: f64, method: LorenzMethod) -> PvtResult<f64> {
    if !lorenz.is_finite() {
        return Err(PvtError::NonFinite {
            what: "Lorenz coefficient",
            value: lorenz,
        });
    }
    if lorenz < LORENZ_FLOOR {
        debug!(lorenz, %method, "Lorenz coefficient below floor, using fixed B");
        return Ok(method.b_floor());
    }
    if lorenz > LORENZ_CEILING {
        debug!(lorenz, %method, "Lorenz coefficient above ceiling, using largest B");
        return Ok(method.b_max());
    }
    let b = bisect_solve(
        |b| lorenz_from_b(b, method) - lorenz,
        B_MIN,
        method.b_max(),
        B_RTOL,
    )?;
    Ok(b)
}

/// Lorenz coefficient consistent with the best `phih_frac` of the storage
/// capacity delivering `kh_frac` of the flow.
///
/// A flow fraction that does not exceed its storage fraction, or that is not
/// below one, has no heterogeneous answer and yields a near-homogeneous
/// coefficient of 0.001.
pub fn lorenz_from_flow_fraction(
    kh_frac: f64,
    phih_frac: f64,
    method: LorenzMethod,
) -> PvtResult<f64> {
    if !(kh_frac > phih_frac && kh_frac < 1.0) {
        debug!(kh_frac, phih_frac, "flow fraction inconsistent with storage fraction");
        return Ok(INCONSISTENT_FLOW_FRACTION_LORENZ);
    }
    if !(phih_frac > 0.0) {
        return Err(PvtError::configuration(format!(
            "phi-h fraction must be positive, got {phih_frac}"
        )));
    }
    let b = match method {
        LorenzMethod::Langmuir => {
            let (x, y) = (phih_frac, kh_frac);
            (y - x) / (x * (1.0 - y))
        }
        LorenzMethod::Exponential => bisect_solve(
            |b| method.curve(b, phih_frac) - kh_frac,
            B_MIN,
            method.b_max(),
            B_RTOL,
        )?,
    };
    Ok(lorenz_from_b(b, method))
}

/// Fraction of total flow delivered by the best `phih_frac` of the storage
/// capacity. Output has the shape of `phih_frac`.
pub fn flow_fraction(
    phih_frac: impl Into<Samples<f64>>,
    method: LorenzMethod,
    heterogeneity: Heterogeneity,
) -> PvtResult<Samples<f64>> {
    let b = match heterogeneity {
        Heterogeneity::B(b) if b.is_finite() && b >= 0.0 => b,
        Heterogeneity::B(b) => {
            return Err(PvtError::configuration(format!(
                "B-factor must be finite and non-negative, got {b}"
            )));
        }
        Heterogeneity::Lorenz(l) => lorenz_to_b(l, method)?,
    };
    let phih_frac = phih_frac.into();
    Ok(phih_frac.map(|&x| method.curve(b, x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lorenz_from_b_reference() {
        let exp = LorenzMethod::Exponential;
        let lang = LorenzMethod::Langmuir;
        assert!((lorenz_from_b(1.0, exp) - 0.163953).abs() < 1e-6);
        assert!((lorenz_from_b(10.0, exp) - 0.800091).abs() < 1e-6);
        assert!((lorenz_from_b(1.0, lang) - 0.227411).abs() < 1e-6);
        assert!((lorenz_from_b(10.0, lang) - 0.672463).abs() < 1e-6);
    }

    #[test]
    fn b_from_lorenz() {
        let b = lorenz_to_b(0.5, LorenzMethod::Exponential).unwrap();
        assert!((b - 3.593512).abs() < 1e-4, "B = {b}");
        let b = lorenz_to_b(0.75, LorenzMethod::Langmuir).unwrap();
        assert!((b - 16.139495).abs() < 1e-3, "B = {b}");
    }

    #[test]
    fn end_clamps() {
        assert_eq!(lorenz_to_b(1e-4, LorenzMethod::Exponential).unwrap(), 0.002);
        assert_eq!(lorenz_to_b(1e-4, LorenzMethod::Langmuir).unwrap(), 0.001);
        assert_eq!(lorenz_to_b(0.999, LorenzMethod::Exponential).unwrap(), 709.0);
        assert_eq!(lorenz_to_b(0.999, LorenzMethod::Langmuir).unwrap(), 25000.0);
    }

    #[test]
    fn flow_fractions() {
        let exp = flow_fraction(0.2, LorenzMethod::Exponential, Heterogeneity::Lorenz(0.5))
            .unwrap()
            .into_scalar()
            .unwrap();
        assert!((exp - 0.527112).abs() < 1e-5, "F = {exp}");
        let lang = flow_fraction(0.2, LorenzMethod::Langmuir, Heterogeneity::Lorenz(0.5))
            .unwrap()
            .into_scalar()
            .unwrap();
        assert!((lang - 0.561195).abs() < 1e-5, "F = {lang}");

        let ends = flow_fraction(vec![0.0, 1.0], LorenzMethod::Langmuir, Heterogeneity::B(3.0))
            .unwrap();
        assert!(ends.as_slice()[0].abs() < 1e-12);
        assert!((ends.as_slice()[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_flow_fraction() {
        let exp = lorenz_from_flow_fraction(0.6, 0.2, LorenzMethod::Exponential).unwrap();
        assert!((exp - 0.577926).abs() < 1e-5, "L = {exp}");
        let lang = lorenz_from_flow_fraction(0.6, 0.2, LorenzMethod::Langmuir).unwrap();
        assert!((lang - 0.539955).abs() < 1e-5, "L = {lang}");
        assert_eq!(
            lorenz_from_flow_fraction(0.2, 0.5, LorenzMethod::Exponential).unwrap(),
            0.001
        );
        assert_eq!(
            lorenz_from_flow_fraction(1.0, 0.5, LorenzMethod::Langmuir).unwrap(),
            0.001
        );
    }

    #[test]
    fn method_codes() {
        assert_eq!("lang".parse::<LorenzMethod>().unwrap(), LorenzMethod::Langmuir);
        assert_eq!(LorenzMethod::default().to_string(), "EXP");
        assert!("GAUSS".parse::<LorenzMethod>().is_err());
    }
}
