//! Brine density, FVF, viscosity, compressibility and dissolved methane, from
//! the modified Spivey correlation in McCain's fluid property handbook.
//!
//! The correlation is posed in SI: MPa, degC, Kelvin and NaCl molality. Inputs
//! and outputs stay in oilfield units.

use rp_core::{PvtError, PvtResult, degf_to_celsius, degf_to_kelvin, psia_to_mpa};
use rp_gas::{GasModel, ResolvedGas};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Methane gravity used for the free gas Z-factor.
const METHANE_SG: f64 = 0.5537;
const METHANE_MOLAR_MASS: f64 = 16.043;
const NACL_MOLAR_MASS: f64 = 58.4428;
/// J / (mol K)
const R_SI: f64 = 8.314467;
/// Reference pressure of the density integrals (MPa).
const REFERENCE_MPA: f64 = 70.0;
/// Standard conditions of the correlation: 15 degC.
const STANDARD_DEGC: f64 = 15.0;
const STANDARD_KELVIN: f64 = 288.15;
const STANDARD_MPA: f64 = 0.1015;
const STANDARD_GAS_MPA: f64 = 0.1013;
/// scf/stb per (cm3 gas / cm3 brine).
const VOLUME_RATIO_TO_SCF_PER_STB: f64 = 0.1781076;
const MPA_PER_PSI_INVERSE: f64 = 145.038;

const WATER_DENSITY_70: [f64; 5] = [-0.127213, 0.645486, 1.03265, -0.070291, 0.639589];
const WATER_E: [f64; 5] = [4.221, -3.478, 6.221, 0.5182, -0.4405];
const WATER_F: [f64; 5] = [-11.403, 29.932, 27.952, 0.20684, 0.3768];
const BRINE_D_M2: [f64; 5] = [-0.00011149, 0.000175105, -0.00043766, 0.0, 0.0];
const BRINE_D_M32: [f64; 5] = [-0.0008878, -0.0001388, -0.00296318, 0.0, 0.51103];
const BRINE_D_M1: [f64; 5] = [0.0021466, 0.012427, 0.042648, -0.081009, 0.525417];
const BRINE_D_M12: [f64; 5] = [0.0002356, -0.0003636, -0.0002278, 0.0, 0.0];
const BRINE_E_M: [f64; 5] = [0.0, 0.0, 0.1249, 0.0, 0.0];
const BRINE_F_M32: [f64; 5] = [-0.617, -0.747, -0.4339, 0.0, 10.26];
const BRINE_F_M1: [f64; 5] = [0.0, 9.917, 5.1128, 0.0, 3.892];
const BRINE_F_M12: [f64; 5] = [0.0365, -0.0369, 0.0, 0.0, 0.0];

const METHANE_A: [f64; 5] = [0.0, -0.004462, -0.06763, 0.0, 0.0];
const METHANE_B: [f64; 5] = [-0.03602, 0.18917, 0.97242, 0.0, 0.0];
const METHANE_C: [f64; 5] = [0.6855, -3.1992, -3.7968, 0.07711, 0.2229];

/// Brine properties at one pressure and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrineProperties {
    /// Formation volume factor (rb/stb).
    pub bw: f64,
    /// Density relative to pure water at standard conditions.
    pub density_sg: f64,
    /// Viscosity (cP).
    pub viscosity: f64,
    /// Compressibility (1/psi).
    pub compressibility: f64,
    /// Dissolved methane (scf/stb).
    pub rsw: f64,
}

/// Rational temperature fit, McCain eq. 4.1.
fn eq41(degc: f64, c: &[f64; 5]) -> f64 {
    let t = degc / 100.0;
    (c[0] * t * t + c[1] * t + c[2]) / (c[3] * t * t + c[4] * t + 1.0)
}

/// Methane-free brine at one temperature and pressure.
struct PureBrine {
    water_density: f64,
    density: f64,
    compressibility: f64,
}

fn pure_brine(degc: f64, mpa: f64, m: f64) -> PureBrine {
    let rho_w70 = eq41(degc, &WATER_DENSITY_70);
    let e_w = eq41(degc, &WATER_E);
    let f_w = eq41(degc, &WATER_F);
    let pressure_integral = |e: f64, f: f64| {
        ((e * mpa / REFERENCE_MPA + f).abs().ln() - (e + f).abs().ln()) / e
    };
    let water_density = rho_w70 * pressure_integral(e_w, f_w).exp();

    let rho_b70 = rho_w70
        + eq41(degc, &BRINE_D_M2) * m * m
        + eq41(degc, &BRINE_D_M32) * m.powf(1.5)
        + eq41(degc, &BRINE_D_M1) * m
        + eq41(degc, &BRINE_D_M12) * m.sqrt();
    let e_b = e_w + eq41(degc, &BRINE_E_M) * m;
    let f_b = f_w
        + eq41(degc, &BRINE_F_M32) * m.powf(1.5)
        + eq41(degc, &BRINE_F_M1) * m
        + eq41(degc, &BRINE_F_M12) * m.sqrt();

    PureBrine {
        water_density,
        density: rho_b70 * pressure_integral(e_b, f_b).exp(),
        compressibility: (1.0 / REFERENCE_MPA) / (e_b * mpa / REFERENCE_MPA + f_b),
    }
}

/// Water vapour pressure (MPa) at `degk`.
fn vapour_pressure(degk: f64) -> f64 {
    const A: [f64; 6] = [
        -7.85951783,
        1.84408259,
        -11.7866497,
        22.6807411,
        -15.9618719,
        1.80122502,
    ];
    const TC: f64 = 647.096;
    const PC: f64 = 22.064;
    let x = 1.0 - degk / TC;
    let sum = A[0] * x
        + A[1] * x.powf(1.5)
        + A[2] * x.powi(3)
        + A[3] * x.powf(3.5)
        + A[4] * x.powi(4)
        + A[5] * x.powf(7.5);
    (TC / degk * sum).exp() * PC
}

/// Brine properties at `p` (psia) and `degf`, for salinity `wt` (NaCl wt%,
/// 0 to 100 exclusive) and methane saturation `ch4_sat` (0 to 1).
pub fn brine_properties(p: f64, degf: f64, wt: f64, ch4_sat: f64) -> PvtResult<BrineProperties> {
    if !p.is_finite() || p <= 0.0 {
        return Err(PvtError::InvalidArg {
            what: "brine pressure must be finite and positive",
        });
    }
    if !(0.0..100.0).contains(&wt) {
        return Err(PvtError::InvalidArg {
            what: "salt weight percent must lie in [0, 100)",
        });
    }
    if !(0.0..=1.0).contains(&ch4_sat) {
        return Err(PvtError::InvalidArg {
            what: "methane saturation must lie in [0, 1]",
        });
    }

    let methane = GasModel::hydrocarbon(METHANE_SG)?.resolve()?;
    brine_with_methane(p, degf, wt, ch4_sat, &methane)
}

fn brine_with_methane(
    p: f64,
    degf: f64,
    wt: f64,
    ch4_sat: f64,
    methane: &ResolvedGas,
) -> PvtResult<BrineProperties> {
    let mpa = psia_to_mpa(p);
    let degc = degf_to_celsius(degf);
    let degk = degf_to_kelvin(degf);
    let m = 1000.0 * (wt / 100.0) / (NACL_MOLAR_MASS * (1.0 - wt / 100.0));

    let brine = pure_brine(degc, mpa, m);
    let standard = pure_brine(STANDARD_DEGC, STANDARD_MPA, m);

    // methane solubility and its pressure derivatives
    let lambda = -0.80898 + 1.0827e-3 * degk + 183.85 / degk + 3.924e-4 * mpa - 1.97e-6 * mpa * mpa;
    let dlambda_dp = 3.924e-4 + 2.0 * -1.97e-6 * mpa;
    let d2lambda_dp2 = 2.0 * -1.97e-6;
    let eta = -3.89e-3;

    let excess = mpa - vapour_pressure(degk);
    let (mch4, dmch4_dp) = if excess > 0.0 && ch4_sat > 0.0 {
        let l = excess.ln();
        let a = eq41(degc, &METHANE_A);
        let b = eq41(degc, &METHANE_B);
        let c = eq41(degc, &METHANE_C);
        let in_water = (a * l * l + b * l + c).exp();
        let mch4 = ch4_sat * in_water * (-2.0 * lambda * m - eta * m * m).exp();
        let dmch4_dp = mch4 * (2.0 * a * l + b) / (excess - 2.0 * dlambda_dp * m);
        (mch4, dmch4_dp)
    } else {
        if ch4_sat > 0.0 {
            debug!(p, degf, "pressure at or below water vapour pressure, no dissolved methane");
        }
        (0.0, 0.0)
    };

    let du_dp = 7.698589e-2 - 5.0253331e-5 * degk - 30.092013 / degk + 4.8468502e3 / (degk * degk);
    let vm_ch4 = R_SI * degk * (du_dp + 2.0 * m * dlambda_dp);
    let dvm_ch4_dp = R_SI * degk * (2.0 * m * d2lambda_dp2);

    let salt_mass = 1000.0 + m * NACL_MOLAR_MASS;
    let vb0 = 1.0 / brine.density;
    let volume = salt_mass * vb0 + mch4 * vm_ch4;
    let density_sg = (salt_mass + mch4 * METHANE_MOLAR_MASS) / volume;
    let dvb_dp = -vb0 * brine.compressibility;

    let free_gas_term = if dmch4_dp != 0.0 {
        let z = methane.z_scalar(p, degf)?;
        let vm_gas = z * R_SI * degk / mpa;
        dmch4_dp * (vm_ch4 - vm_gas)
    } else {
        0.0
    };
    let cw_mpa = -(salt_mass * dvb_dp + mch4 * dvm_ch4_dp + free_gas_term) / volume;

    let vb0_sc = 1.0 / standard.density;
    let bw = volume / (salt_mass * vb0_sc);

    let rsw = if mch4 > 0.0 {
        let z_sc = methane.z_scalar(14.7, 60.0)?;
        let vm_gas_sc = z_sc * R_SI * STANDARD_KELVIN / STANDARD_GAS_MPA;
        mch4 * vm_gas_sc / (salt_mass * vb0_sc) / VOLUME_RATIO_TO_SCF_PER_STB
    } else {
        0.0
    };

    Ok(BrineProperties {
        bw,
        density_sg,
        viscosity: viscosity(degk, brine.water_density, m),
        compressibility: cw_mpa / MPA_PER_PSI_INVERSE,
        rsw,
    })
}

/// Brine viscosity (cP) from pure water viscosity and a salinity ratio.
fn viscosity(degk: f64, water_density: f64, m: f64) -> f64 {
    const D: [f64; 10] = [
        2885310.0,
        -11072.577,
        -9.0834095,
        0.030925651,
        -0.0000274071,
        -1928385.1,
        5621.6046,
        13.82725,
        -0.047609523,
        0.000035545041,
    ];
    let mut ln_uw = 0.0;
    for (i, d) in D[..5].iter().enumerate() {
        ln_uw += d * degk.powi(i as i32 - 2);
    }
    for (i, d) in D[5..].iter().enumerate() {
        ln_uw += water_density * d * degk.powi(i as i32 - 2);
    }

    let a = -0.21319213 + 0.0013651589 * degk - 0.0000012191756 * degk * degk;
    let b = 0.069161945 - 0.00027292263 * degk + 0.0000002085244 * degk * degk;
    let c = -0.0025988855 + 0.0000077989227 * degk;
    let ratio = (a * m + b * m * m + c * m * m * m).exp();
    ratio * ln_uw.exp() * 1000.0
}
