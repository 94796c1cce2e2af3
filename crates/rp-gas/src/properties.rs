//! Explicit gas properties at a known Z-factor.
//!
//! Pressures in psia, temperatures in degF.

use crate::critical::CriticalProperties;
use crate::zfactor::{ZFactorResult, dak_dz_drho, z_dranchuk_abou_kassem};
use rp_core::{AIR_MOLECULAR_WEIGHT, GAS_CONSTANT, PvtError, PvtResult, degf_to_rankine};

/// Gas density (lb/cuft).
pub fn density(p: f64, degf: f64, sg: f64, z: f64) -> f64 {
    p * AIR_MOLECULAR_WEIGHT * sg / (z * GAS_CONSTANT * degf_to_rankine(degf))
}

/// Reciprocal gas formation volume factor, 1/Bg (scf/rcf).
pub fn inverse_fvf(p: f64, degf: f64, z: f64) -> f64 {
    p * 35.37 / (z * degf_to_rankine(degf))
}

/// Product of Lee, Gonzalez & Eakin gas viscosity (cP) and Z-factor.
///
/// Equations 2.14 - 2.17 of McCain's correlation handbook. Taking `z` as an
/// input lets the pseudo-pressure integrand reuse one Z evaluation.
pub fn viscosity_z_product(p: f64, degf: f64, sg: f64, z: f64) -> f64 {
    lee_gonzalez_eakin(p, degf, sg, z) * z
}

/// Lee, Gonzalez & Eakin (1966) gas viscosity (cP).
pub fn lee_gonzalez_eakin(p: f64, degf: f64, sg: f64, z: f64) -> f64 {
    let t = degf_to_rankine(degf);
    let m = AIR_MOLECULAR_WEIGHT * sg;
    // density in g/cc
    let rho = m * p / (t * z * GAS_CONSTANT * 62.37);
    let b = 3.448 + 986.4 / t + 0.01009 * m;
    let c = 2.447 - 0.2224 * b;
    let a = (9.379 + 0.01607 * m) * t.powf(1.5) / (209.2 + 19.26 * m + t);
    a * 1e-4 * (b * rho.powf(c)).exp()
}

/// Isothermal gas compressibility (1/psi).
///
/// Uses the analytic derivative of the DAK equation of state, so Z is always
/// taken from the DAK engine regardless of the gas's configured method.
pub fn compressibility(p: f64, degf: f64, crit: &CriticalProperties) -> PvtResult<f64> {
    let pr = p / crit.pc;
    let tr = degf_to_rankine(degf) / crit.tc;
    let z = match z_dranchuk_abou_kassem(pr, tr) {
        ZFactorResult::Value(z) => z,
        ZFactorResult::BestEstimate { z, .. } => z,
        ZFactorResult::NotConverged { iterations } => {
            return Err(PvtError::ElementConvergence {
                what: "DAK Z-factor for gas compressibility",
                index: 0,
                iterations,
            });
        }
    };

    let rho = 0.27 * pr / (tr * z);
    let dz = dak_dz_drho(tr, rho);
    let cpr = 1.0 / pr - (0.27 / (z * z * tr)) * (dz / (1.0 + (rho / z) * dz));
    Ok(cpr / crit.pc)
}
