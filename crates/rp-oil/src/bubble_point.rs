//! Bubble point pressure from solution GOR, and its inverse.

use crate::conditions::OilConditions;
use rp_core::{PvtError, PvtResult, nested_polynomial, parse_method};
use rp_solver::{NewtonConfig, newton_solve_fd};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Newton budget for inverting Valko-McCain.
pub const RSB_NEWTON_MAX_ITERATIONS: usize = 100;
/// Absolute tolerance on the recomputed bubble point (psia).
pub const RSB_NEWTON_TOLERANCE: f64 = 1e-5;
/// Half width (scf/stb) of the central difference for dPb/dRsb.
pub const RSB_NEWTON_HALF_STEP: f64 = 0.5;

/// Bubble point correlation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PbMethod {
    /// Standing (1947). Uses the surface gas gravity.
    Standing,
    /// Valko & McCain (2003). No closed-form inverse.
    #[default]
    ValkoMcCain,
    /// Velarde, Blasingame & McCain (1997).
    Velarde,
}

impl PbMethod {
    pub fn code(&self) -> &'static str {
        match self {
            PbMethod::Standing => "STAN",
            PbMethod::ValkoMcCain => "VALMC",
            PbMethod::Velarde => "VELAR",
        }
    }
}

impl fmt::Display for PbMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PbMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "bubble point method",
            &[
                ("STAN", PbMethod::Standing),
                ("STANDING", PbMethod::Standing),
                ("VALMC", PbMethod::ValkoMcCain),
                ("VALKOMCCAIN", PbMethod::ValkoMcCain),
                ("VELAR", PbMethod::Velarde),
                ("VELARDE", PbMethod::Velarde),
            ],
        )
    }
}

impl TryFrom<String> for PbMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PbMethod> for String {
    fn from(m: PbMethod) -> Self {
        m.code().to_string()
    }
}

/// Why the Valko-McCain inversion was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// Newton ran out of iterations or hit a flat derivative.
    NotConverged,
    /// Newton produced a NaN or infinite iterate.
    NonFinite,
}

/// Solution GOR at the bubble point together with the family that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsbInversion {
    pub rsb: f64,
    /// Family whose value is reported in `rsb`.
    pub method_used: PbMethod,
    /// Set when `method_used` differs from the requested family.
    pub fallback: Option<FallbackReason>,
}

impl RsbInversion {
    fn direct(rsb: f64, method: PbMethod) -> Self {
        Self {
            rsb,
            method_used: method,
            fallback: None,
        }
    }
}

/// Bubble point pressure (psia) for a solution GOR `rsb` (scf/stb).
pub fn bubble_point(oil: &OilConditions, rsb: f64, method: PbMethod) -> PvtResult<f64> {
    check_inputs(oil, rsb, method, "rsb")?;
    let pb = match method {
        PbMethod::Standing => pb_standing(oil, rsb),
        PbMethod::ValkoMcCain => pb_valko_mccain(oil, rsb),
        PbMethod::Velarde => pb_velarde(oil, rsb),
    };
    if pb.is_nan() {
        // Velarde has no real solution for vanishing gas content
        return Ok(0.0);
    }
    Ok(pb.max(0.0))
}

/// Solution GOR at bubble point (scf/stb) for a bubble point `pb` (psia).
///
/// Standing and Velarde invert in closed form. Valko-McCain is inverted by
/// Newton iteration seeded from Velarde; if that fails the Velarde value is
/// returned and the fallback is recorded in the result.
pub fn solution_gor_at_bubble_point(
    oil: &OilConditions,
    pb: f64,
    method: PbMethod,
) -> PvtResult<RsbInversion> {
    check_inputs(oil, pb, method, "pb")?;
    let inversion = match method {
        PbMethod::Standing => RsbInversion::direct(rsb_standing(oil, pb), method),
        PbMethod::Velarde => RsbInversion::direct(rsb_velarde(oil, pb), method),
        PbMethod::ValkoMcCain => rsb_valko_mccain(oil, pb),
    };
    let rsb = if inversion.rsb.is_nan() {
        0.0
    } else {
        inversion.rsb.max(0.0)
    };
    Ok(RsbInversion { rsb, ..inversion })
}

fn check_inputs(oil: &OilConditions, value: f64, method: PbMethod, what: &str) -> PvtResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PvtError::configuration(format!(
            "{method} bubble point correlation needs a positive {what}, got {value}"
        )));
    }
    if oil.degf() == 0.0 {
        return Err(PvtError::configuration(format!(
            "{method} bubble point correlation needs a non-zero temperature"
        )));
    }
    Ok(())
}

fn standing_exponent(oil: &OilConditions) -> f64 {
    0.00091 * oil.degf() - 0.0125 * oil.api()
}

fn pb_standing(oil: &OilConditions, rsb: f64) -> f64 {
    let a = standing_exponent(oil);
    18.2 * ((rsb / oil.sg_g()).powf(0.83) * 10f64.powf(a) - 1.4)
}

fn rsb_standing(oil: &OilConditions, pb: f64) -> f64 {
    let a = standing_exponent(oil);
    oil.sg_g() * ((pb / 18.2 + 1.4) / 10f64.powf(a)).powf(1.0 / 0.83)
}

const VALKO_MCCAIN: [[f64; 4]; 4] = [
    [-5.48, 1.27, 4.51, -0.7835],
    [-0.0378, -0.0449, -10.84, 6.23e-3],
    [0.281, 4.36e-4, 8.39, -1.22e-5],
    [-0.0206, -4.76e-6, -2.34, 1.03e-8],
];

/// Valko-McCain falls back to Velarde at non-positive GOR, where its log
/// term is undefined.
pub(crate) fn pb_valko_mccain(oil: &OilConditions, rsb: f64) -> f64 {
    if rsb <= 0.0 {
        return pb_velarde(oil, rsb);
    }
    let vars = [rsb.ln(), oil.api(), oil.sg_sp(), oil.degf()];
    let z = nested_polynomial(&VALKO_MCCAIN, &vars);
    (7.475 + 0.713 * z + 0.0075 * z * z).exp()
}

fn velarde_exponent(oil: &OilConditions) -> f64 {
    0.013098 * oil.degf().powf(0.282372) - 8.2e-6 * oil.api().powf(2.176124)
}

/// NaN when the Velarde base goes non-positive.
fn pb_velarde(oil: &OilConditions, rsb: f64) -> f64 {
    let x = velarde_exponent(oil);
    let base = rsb.powf(0.081465) * oil.sg_sp().powf(-0.161488) * 10f64.powf(x) - 0.740152;
    if base > 0.0 {
        1091.47 * base.powf(5.354891)
    } else {
        f64::NAN
    }
}

fn rsb_velarde(oil: &OilConditions, pb: f64) -> f64 {
    let x = velarde_exponent(oil);
    let base = (pb / 1091.47).powf(1.0 / 5.354891) + 0.740152;
    (base * 10f64.powf(-x) * oil.sg_sp().powf(0.161488)).powf(1.0 / 0.081465)
}

fn rsb_valko_mccain(oil: &OilConditions, pb: f64) -> RsbInversion {
    let seed = rsb_velarde(oil, pb);
    let config = NewtonConfig {
        max_iterations: RSB_NEWTON_MAX_ITERATIONS,
        abs_tol: RSB_NEWTON_TOLERANCE,
    };
    let result = newton_solve_fd(
        seed,
        |rsb| pb_valko_mccain(oil, rsb) - pb,
        RSB_NEWTON_HALF_STEP,
        &config,
    );

    if result.converged {
        return RsbInversion::direct(result.x, PbMethod::ValkoMcCain);
    }

    let reason = if result.x.is_finite() && result.residual.is_finite() {
        FallbackReason::NotConverged
    } else {
        FallbackReason::NonFinite
    };
    debug!(
        pb,
        iterations = result.iterations,
        ?reason,
        "Valko-McCain Rsb inversion failed, using Velarde"
    );
    RsbInversion {
        rsb: seed,
        method_used: PbMethod::Velarde,
        fallback: Some(reason),
    }
}
