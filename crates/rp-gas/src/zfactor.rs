//! Gas compressibility (Z) factor from reduced pressure and temperature.
//!
//! Three engines are available and they fail differently. The linearized
//! form is explicit and always returns a value. DAK reports
//! [`ZFactorResult::NotConverged`] when its secant iteration runs out of steps
//! or settles on a non-positive Z. Hall-Yarborough keeps its last Newton
//! iterate as a [`ZFactorResult::BestEstimate`] only when the full budget was
//! spent inside the physical range; an iterate that leaves it is
//! `NotConverged` as well.

use rp_core::{PvtError, parse_method};
use rp_solver::{NewtonConfig, newton_solve};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub const DAK_MAX_ITERATIONS: usize = 100;
pub const DAK_TOLERANCE: f64 = 1e-4;
pub const HY_MAX_ITERATIONS: usize = 99;
pub const HY_TOLERANCE: f64 = 1e-8;
const HY_INITIAL_Y: f64 = 0.001;

/// Z-factor engine.
///
/// DAK and Hall-Yarborough agree to within 2% for Tr >= 1.2 and Pr up to 15.
/// Closer to the critical temperature they separate quickly: about 3% at
/// Tr = 1.15, 7% at Tr = 1.1 and 20% at Tr = 1.05, worst around Pr 1.3 to 2.
/// Below Tr = 1 neither is reliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ZMethod {
    /// Explicit linearized correlation (Kareem, Iwalewa & Al-Marhoun, 2016).
    Linearized,
    /// Dranchuk & Abou-Kassem (1975) 11-constant EOS solved by secant
    /// iteration on reduced density.
    #[default]
    IterativeFixedPoint,
    /// Hall & Yarborough (1973) solved by Newton-Raphson.
    NewtonRaphson,
}

impl ZMethod {
    pub fn code(&self) -> &'static str {
        match self {
            ZMethod::Linearized => "LIN",
            ZMethod::IterativeFixedPoint => "DAK",
            ZMethod::NewtonRaphson => "HY",
        }
    }

    /// Label used in convergence errors.
    pub fn engine_name(&self) -> &'static str {
        match self {
            ZMethod::Linearized => "linearized Z-factor",
            ZMethod::IterativeFixedPoint => "DAK Z-factor",
            ZMethod::NewtonRaphson => "Hall-Yarborough Z-factor",
        }
    }
}

impl fmt::Display for ZMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ZMethod {
    type Err = PvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_method(
            s,
            "z-factor method",
            &[
                ("LIN", ZMethod::Linearized),
                ("LINEARIZED", ZMethod::Linearized),
                ("DAK", ZMethod::IterativeFixedPoint),
                ("ITERATIVEFIXEDPOINT", ZMethod::IterativeFixedPoint),
                ("DRANCHUKABOUKASSEM", ZMethod::IterativeFixedPoint),
                ("HY", ZMethod::NewtonRaphson),
                ("NEWTONRAPHSON", ZMethod::NewtonRaphson),
                ("HALLYARBOROUGH", ZMethod::NewtonRaphson),
            ],
        )
    }
}

impl TryFrom<String> for ZMethod {
    type Error = PvtError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ZMethod> for String {
    fn from(m: ZMethod) -> Self {
        m.code().to_string()
    }
}

/// Outcome of one Z-factor evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZFactorResult {
    /// Converged (or explicit) value.
    Value(f64),
    /// Hall-Yarborough ran out of iterations; `z` is its last iterate.
    BestEstimate { z: f64, iterations: usize },
    /// No usable value: DAK ran out of iterations, or either iterative
    /// engine left the physical range.
    NotConverged { iterations: usize },
}

impl ZFactorResult {
    /// The Z-factor if one is available, including best estimates.
    pub fn value(&self) -> Option<f64> {
        match *self {
            ZFactorResult::Value(z) | ZFactorResult::BestEstimate { z, .. } => Some(z),
            ZFactorResult::NotConverged { .. } => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, ZFactorResult::Value(_))
    }
}

/// Z-factor at reduced pressure `pr` and reduced temperature `tr`.
///
/// At zero pressure every engine returns the ideal-gas value of 1.
pub fn z_factor(pr: f64, tr: f64, method: ZMethod) -> ZFactorResult {
    if pr == 0.0 {
        return ZFactorResult::Value(1.0);
    }
    match method {
        ZMethod::Linearized => ZFactorResult::Value(z_linearized(pr, tr)),
        ZMethod::IterativeFixedPoint => z_dranchuk_abou_kassem(pr, tr),
        ZMethod::NewtonRaphson => z_hall_yarborough(pr, tr),
    }
}

/// Explicit linearized Z-factor.
pub fn z_linearized(pr: f64, tr: f64) -> f64 {
    const A: [f64; 20] = [
        0.0, 0.317842, 0.382216, -7.768354, 14.290531, 0.000002, -0.004693, 0.096254, 0.16672,
        0.96691, 0.063069, -1.966847, 21.0581, -27.0246, 16.23, 207.783, -488.161, 176.29,
        1.88453, 3.05921,
    ];
    let t = 1.0 / tr;
    let t2 = t * t;
    let t3 = t2 * t;

    let a = A[1] * t * (A[2] * (1.0 - t).powi(2)).exp() * pr;
    let b = A[3] * t + A[4] * t2 + A[5] * t.powi(6) * pr.powi(6);
    let c = A[9] + A[8] * t * pr + A[7] * t2 * pr * pr + A[6] * t3 * pr.powi(3);
    let d = A[10] * t * (A[11] * (1.0 - t).powi(2)).exp();
    let e = A[12] * t + A[13] * t2 + A[14] * t3;
    let f = A[15] * t + A[16] * t2 + A[17] * t3;
    let g = A[18] + A[19] * t;

    let y = d * pr / ((1.0 + a * a) / c - a * a * b / c.powi(3));
    d * pr * (1.0 + y + y * y - y.powi(3)) / (d * pr + e * y * y - f * y.powf(g)) / (1.0 - y).powi(3)
}

const DAK: [f64; 12] = [
    0.0, 0.3265, -1.07, -0.5339, 0.01569, -0.05165, 0.5475, -0.7361, 0.1844, 0.1056, 0.6134,
    0.7210,
];

/// Z from the DAK equation of state at reduced density `rho`.
fn dak_eos(tr: f64, rho: f64) -> f64 {
    let a = &DAK;
    let rho2 = rho * rho;
    1.0 + (a[1] + a[2] / tr + a[3] / tr.powi(3) + a[4] / tr.powi(4) + a[5] / tr.powi(5)) * rho
        + (a[6] + a[7] / tr + a[8] / (tr * tr)) * rho2
        - a[9] * (a[7] / tr + a[8] / (tr * tr)) * rho.powi(5)
        + a[10] * (1.0 + a[11] * rho2) * (rho2 / tr.powi(3)) * (-a[11] * rho2).exp()
}

/// Derivative of the DAK equation of state with respect to reduced density.
pub(crate) fn dak_dz_drho(tr: f64, rho: f64) -> f64 {
    let a = &DAK;
    let rho2 = rho * rho;
    a[1] + a[2] / tr
        + a[3] / tr.powi(3)
        + a[4] / tr.powi(4)
        + a[5] / tr.powi(5)
        + 2.0 * rho * (a[6] + a[7] / tr + a[8] / (tr * tr))
        - 5.0 * rho.powi(4) * a[9] * (a[7] / tr + a[8] / (tr * tr))
        + (2.0 * a[10] * rho / tr.powi(3))
            * (1.0 + a[11] * rho2 - a[11] * a[11] * rho2 * rho2)
            * (-a[11] * rho2).exp()
}

/// DAK Z-factor.
///
/// Solves `z_eos(rho) = 0.27 pr / (tr rho)` for the reduced density with a
/// secant iteration started from the ideal gas density and one substitution
/// step, stopping once successive Z values differ by less than 1e-4.
pub fn z_dranchuk_abou_kassem(pr: f64, tr: f64) -> ZFactorResult {
    let k = 0.27 * pr / tr;
    let residual = |rho: f64, z: f64| z - k / rho;

    let mut rho0 = k;
    let mut z0 = dak_eos(tr, rho0);
    let mut e0 = residual(rho0, z0);
    let mut rho1 = k / z0;
    let mut z1 = dak_eos(tr, rho1);
    let mut e1 = residual(rho1, z1);

    for _ in 0..DAK_MAX_ITERATIONS {
        if !(z1.is_finite() && e1.is_finite()) {
            break;
        }
        if e1 == e0 {
            // flat secant: accept only if the last step had already settled
            if (z1 - z0).abs() < DAK_TOLERANCE && z1 > 0.0 {
                return ZFactorResult::Value(z1);
            }
            break;
        }
        let rho2 = rho1 - e1 * (rho1 - rho0) / (e1 - e0);
        (rho0, z0, e0) = (rho1, z1, e1);
        rho1 = rho2;
        z1 = dak_eos(tr, rho1);
        e1 = residual(rho1, z1);

        if z1.is_finite() && (z1 - z0).abs() < DAK_TOLERANCE {
            if z1 > 0.0 {
                return ZFactorResult::Value(z1);
            }
            // settled on the unphysical branch of the EOS
            break;
        }
    }

    warn!(pr, tr, "DAK Z-factor did not converge");
    ZFactorResult::NotConverged {
        iterations: DAK_MAX_ITERATIONS,
    }
}

/// Hall-Yarborough Z-factor.
pub fn z_hall_yarborough(pr: f64, tr: f64) -> ZFactorResult {
    let t = 1.0 / tr;
    let t2 = t * t;
    let t3 = t2 * t;
    let alpha = 0.06125 * t * (-1.2 * (1.0 - t).powi(2)).exp();
    let c2 = 14.76 * t - 9.76 * t2 + 4.58 * t3;
    let c3 = 90.7 * t - 242.2 * t2 + 42.4 * t3;
    let expo = 2.18 + 2.82 * t;

    let f = |y: f64| {
        -alpha * pr + (y + y * y + y.powi(3) - y.powi(4)) / (1.0 - y).powi(3) - c2 * y * y
            + c3 * y.powf(expo)
    };
    let df = |y: f64| {
        (1.0 + 4.0 * y + 4.0 * y * y - 4.0 * y.powi(3) + y.powi(4)) / (1.0 - y).powi(4)
            - 2.0 * c2 * y
            + expo * c3 * y.powf(expo - 1.0)
    };

    let config = NewtonConfig {
        max_iterations: HY_MAX_ITERATIONS,
        abs_tol: HY_TOLERANCE,
    };
    let result = newton_solve(HY_INITIAL_Y, f, df, &config);
    let y = result.x;
    let z = alpha * pr / y;
    // HY reduced density lives in (0, 1)
    let physical = y > 0.0 && y < 1.0 && z.is_finite() && z > 0.0;

    if result.converged && physical {
        ZFactorResult::Value(z)
    } else if physical && result.iterations >= HY_MAX_ITERATIONS {
        warn!(
            pr,
            tr,
            iterations = result.iterations,
            residual = result.residual,
            "Hall-Yarborough Z-factor did not converge, using best estimate"
        );
        ZFactorResult::BestEstimate {
            z,
            iterations: result.iterations,
        }
    } else {
        warn!(
            pr,
            tr,
            y,
            iterations = result.iterations,
            "Hall-Yarborough Z-factor diverged"
        );
        ZFactorResult::NotConverged {
            iterations: result.iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sg 0.75 sweet gas (PMC) at 200 degF, 2000 psia
    const TC: f64 = 385.666_773;
    const PC: f64 = 653.255_424;

    fn reduced(p: f64, degf: f64) -> (f64, f64) {
        (p / PC, (degf + 460.0) / TC)
    }

    #[test]
    fn engines_at_reference_point() {
        let (pr, tr) = reduced(2000.0, 200.0);
        let lin = z_linearized(pr, tr);
        let dak = z_dranchuk_abou_kassem(pr, tr).value().unwrap();
        let hy = z_hall_yarborough(pr, tr).value().unwrap();
        assert!((lin - 0.86207).abs() < 1e-4, "lin = {lin}");
        assert!((dak - 0.86855).abs() < 1e-4, "dak = {dak}");
        assert!((hy - 0.86804).abs() < 1e-4, "hy = {hy}");
    }

    #[test]
    fn dak_satisfies_its_equation_of_state() {
        for p in [500.0, 3000.0, 8000.0, 12000.0] {
            let (pr, tr) = reduced(p, 150.0);
            let z = z_dranchuk_abou_kassem(pr, tr).value().unwrap();
            let rho = 0.27 * pr / (tr * z);
            assert!((dak_eos(tr, rho) - z).abs() < 1e-4, "p = {p}");
        }
    }

    #[test]
    fn dak_high_pressure_is_above_one() {
        let (pr, tr) = reduced(8000.0, 200.0);
        let z = z_dranchuk_abou_kassem(pr, tr).value().unwrap();
        assert!(z > 1.2 && z < 1.3, "z = {z}");
    }

    #[test]
    fn near_standard_conditions_is_ideal() {
        let (pr, tr) = reduced(14.7, 60.0);
        for method in [ZMethod::Linearized, ZMethod::IterativeFixedPoint, ZMethod::NewtonRaphson] {
            let z = z_factor(pr, tr, method).value().unwrap();
            assert!((z - 1.0).abs() < 0.01, "{method}: {z}");
        }
    }

    #[test]
    fn zero_pressure_is_ideal() {
        assert_eq!(z_factor(0.0, 1.5, ZMethod::NewtonRaphson), ZFactorResult::Value(1.0));
    }

    #[test]
    fn dak_derivative_matches_finite_difference() {
        let tr = 1.7;
        let rho = 0.4;
        let h = 1e-6;
        let fd = (dak_eos(tr, rho + h) - dak_eos(tr, rho - h)) / (2.0 * h);
        assert!((dak_dz_drho(tr, rho) - fd).abs() < 1e-6);
    }

    #[test]
    fn unconverged_results_are_distinct() {
        let best = ZFactorResult::BestEstimate {
            z: 0.9,
            iterations: 99,
        };
        let none = ZFactorResult::NotConverged { iterations: 100 };
        assert_eq!(best.value(), Some(0.9));
        assert!(!best.is_converged());
        assert_eq!(none.value(), None);
    }

    #[test]
    fn hall_yarborough_leaving_unit_interval_is_not_converged() {
        // Newton overshoots to a negative reduced density within a few steps
        for (pr, tr) in [(3.4, 1.05), (5.0, 0.5)] {
            let out = z_hall_yarborough(pr, tr);
            assert!(
                matches!(out, ZFactorResult::NotConverged { iterations } if iterations < HY_MAX_ITERATIONS),
                "pr = {pr}, tr = {tr}: {out:?}"
            );
            assert_eq!(out.value(), None);
        }
        let dak = z_dranchuk_abou_kassem(3.4, 1.05).value().unwrap();
        assert!((dak - 0.4944).abs() < 1e-3, "dak = {dak}");
    }

    #[test]
    fn near_critical_hall_yarborough_still_converges() {
        let z = z_hall_yarborough(1.4, 1.05).value().unwrap();
        assert!((z - 0.33399).abs() < 1e-4, "z = {z}");
    }

    #[test]
    fn dak_below_critical_temperature_is_not_converged() {
        assert_eq!(
            z_dranchuk_abou_kassem(0.2, 0.5),
            ZFactorResult::NotConverged {
                iterations: DAK_MAX_ITERATIONS
            }
        );
    }

    #[test]
    fn method_names_parse() {
        assert_eq!("dak".parse::<ZMethod>().unwrap(), ZMethod::IterativeFixedPoint);
        assert_eq!("Hy".parse::<ZMethod>().unwrap(), ZMethod::NewtonRaphson);
        assert_eq!("linearized".parse::<ZMethod>().unwrap(), ZMethod::Linearized);
        let err = "BWRS".parse::<ZMethod>().unwrap_err();
        assert!(err.to_string().contains("BWRS"));
        assert_eq!(ZMethod::default(), ZMethod::IterativeFixedPoint);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn engines_agree_within_two_percent(
            p in 200.0f64..8000.0,
            degf in 150.0f64..300.0,
            sg in 0.6f64..0.8,
        ) {
            let crit = crate::critical::piper_mccain_corredor(
                &crate::GasComposition::hydrocarbon(sg).unwrap(),
            );
            let pr = p / crit.pc;
            let tr = (degf + 460.0) / crit.tc;
            let dak = z_dranchuk_abou_kassem(pr, tr).value().unwrap();
            let hy = z_hall_yarborough(pr, tr).value().unwrap();
            let lin = z_linearized(pr, tr);
            prop_assert!((hy - dak).abs() / dak < 0.02);
            prop_assert!((lin - dak).abs() / dak < 0.02);
        }
    }
}
