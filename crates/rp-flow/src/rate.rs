//! Steady and pseudo-steady state well rates.
//!
//! Permeability in mD, thickness and lengths in ft. Gas rates are mscf/day
//! and oil rates stb/day. A negative rate means injection (`pwf > pr`).

use rp_core::{PressureSample, PvtError, PvtResult, Samples, degf_to_rankine};
use rp_gas::ResolvedGas;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Non-Darcy coefficients (day/mscf) at or below this are ignored.
const NON_DARCY_THRESHOLD: f64 = 1e-9;
/// Darcy units conversion for oil flow.
const OIL_DARCY_CONSTANT: f64 = 0.00708;
/// Darcy units conversion for gas flow with pseudo-pressure.
const GAS_DARCY_CONSTANT: f64 = 1422.0;

/// Shape of the flow region.
pub trait FlowGeometry {
    /// Gas rate for a pseudo-pressure difference `delta_mp` (psia^2/cP).
    fn darcy_gas(&self, delta_mp: f64, degf: f64) -> f64;

    /// Oil productivity index (stb/day/psi).
    fn oil_productivity_index(&self, uo: f64, bo: f64) -> f64;

    fn validate(&self) -> PvtResult<()>;
}

/// Pseudo-steady state radial flow to a well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialFlow {
    pub k: f64,
    pub h: f64,
    /// Wellbore radius (ft).
    pub rw: f64,
    /// Drainage radius (ft).
    pub re: f64,
    #[serde(default)]
    pub skin: f64,
    /// Non-Darcy skin coefficient (day/mscf), gas only.
    #[serde(default)]
    pub non_darcy: f64,
}

impl RadialFlow {
    pub fn new(k: f64, h: f64, rw: f64, re: f64) -> Self {
        Self {
            k,
            h,
            rw,
            re,
            skin: 0.0,
            non_darcy: 0.0,
        }
    }

    pub fn with_skin(mut self, skin: f64) -> Self {
        self.skin = skin;
        self
    }

    pub fn with_non_darcy(mut self, d: f64) -> Self {
        self.non_darcy = d;
        self
    }

    fn log_term(&self) -> f64 {
        (self.re / self.rw).ln() - 0.75 + self.skin
    }
}

impl FlowGeometry for RadialFlow {
    fn darcy_gas(&self, delta_mp: f64, degf: f64) -> f64 {
        let a = self.k * self.h * delta_mp;
        let b = GAS_DARCY_CONSTANT * degf_to_rankine(degf);
        let c = self.log_term();
        if self.non_darcy > NON_DARCY_THRESHOLD {
            // positive root of b*D*q^2 + b*c*q - a = 0
            let d = self.non_darcy;
            return ((4.0 * a * b * d + b * b * c * c).sqrt() - b * c) / (2.0 * b * d);
        }
        a / (b * c)
    }

    fn oil_productivity_index(&self, uo: f64, bo: f64) -> f64 {
        OIL_DARCY_CONSTANT * self.k * self.h / (uo * bo * self.log_term())
    }

    fn validate(&self) -> PvtResult<()> {
        check_positive(&[("k", self.k), ("h", self.h), ("rw", self.rw)])?;
        if !(self.re > self.rw) {
            return Err(PvtError::configuration(format!(
                "drainage radius {} ft must exceed wellbore radius {} ft",
                self.re, self.rw
            )));
        }
        if !(self.log_term() > 0.0) {
            return Err(PvtError::configuration(format!(
                "skin {} leaves no flow resistance",
                self.skin
            )));
        }
        if self.non_darcy < 0.0 {
            return Err(PvtError::configuration("non-Darcy coefficient must not be negative"));
        }
        Ok(())
    }
}

/// Steady state linear flow through a rectangular cross section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFlow {
    pub k: f64,
    pub h: f64,
    pub width: f64,
    /// Flow distance (ft).
    pub length: f64,
}

impl LinearFlow {
    pub fn new(k: f64, h: f64, width: f64, length: f64) -> Self {
        Self {
            k,
            h,
            width,
            length,
        }
    }
}

impl FlowGeometry for LinearFlow {
    fn darcy_gas(&self, delta_mp: f64, degf: f64) -> f64 {
        let a = self.k * self.h * self.width * delta_mp;
        let b = 2.0 * PI * GAS_DARCY_CONSTANT * degf_to_rankine(degf);
        a / (b * self.length)
    }

    fn oil_productivity_index(&self, uo: f64, bo: f64) -> f64 {
        OIL_DARCY_CONSTANT * self.k * self.h * self.width / (2.0 * PI * uo * bo * self.length)
    }

    fn validate(&self) -> PvtResult<()> {
        check_positive(&[
            ("k", self.k),
            ("h", self.h),
            ("width", self.width),
            ("length", self.length),
        ])
    }
}

fn check_positive(values: &[(&str, f64)]) -> PvtResult<()> {
    for &(what, v) in values {
        if !(v.is_finite() && v > 0.0) {
            return Err(PvtError::configuration(format!(
                "{what} must be finite and positive, got {v}"
            )));
        }
    }
    Ok(())
}

/// Gas rate for a known pseudo-pressure difference.
pub fn darcy_gas(delta_mp: f64, geometry: &impl FlowGeometry, degf: f64) -> f64 {
    geometry.darcy_gas(delta_mp, degf)
}

fn gas_rate<G>(
    gas: &ResolvedGas,
    geometry: &G,
    pr: f64,
    pwf: PressureSample,
    degf: f64,
) -> PvtResult<Samples<f64>>
where
    G: FlowGeometry + Sync,
{
    geometry.validate()?;
    pwf.par_try_map(|_, &pwf| {
        // integrate upwards so the non-Darcy quadratic sees a positive drive
        let (lo, hi, direction) = if pr < pwf {
            (pr, pwf, -1.0)
        } else {
            (pwf, pr, 1.0)
        };
        let delta_mp = gas.pseudo_pressure_delta(lo, hi, degf)?;
        Ok(direction * geometry.darcy_gas(delta_mp, degf))
    })
}

/// Radial gas rate (mscf/day) from reservoir pressure `pr` to each flowing
/// bottomhole pressure in `pwf`.
pub fn gas_rate_radial(
    gas: &ResolvedGas,
    flow: &RadialFlow,
    pr: f64,
    pwf: impl Into<PressureSample>,
    degf: f64,
) -> PvtResult<Samples<f64>> {
    gas_rate(gas, flow, pr, pwf.into(), degf)
}

/// Linear gas rate (mscf/day). Non-Darcy effects are not modelled.
pub fn gas_rate_linear(
    gas: &ResolvedGas,
    flow: &LinearFlow,
    pr: f64,
    pwf: impl Into<PressureSample>,
    degf: f64,
) -> PvtResult<Samples<f64>> {
    gas_rate(gas, flow, pr, pwf.into(), degf)
}

fn oil_rate<G: FlowGeometry>(
    geometry: &G,
    pr: f64,
    pwf: PressureSample,
    uo: f64,
    bo: f64,
    vogel_pb: Option<f64>,
) -> PvtResult<Samples<f64>> {
    geometry.validate()?;
    check_positive(&[("oil viscosity", uo), ("oil FVF", bo)])?;
    let j = geometry.oil_productivity_index(uo, bo);
    let pb = match vogel_pb {
        Some(pb) if !(pb.is_finite() && pb > 0.0) => {
            return Err(PvtError::configuration(format!(
                "Vogel inflow needs a positive bubble point, got {pb}"
            )));
        }
        // the reservoir cannot be below its own bubble point
        Some(pb) => Some(pb.min(pr)),
        None => None,
    };
    Ok(pwf.map(|&pwf| match pb {
        Some(pb) if pwf < pb => {
            let x = pwf / pb;
            let saturated_max = j * pb / 1.8;
            saturated_max * (1.0 - 0.2 * x - 0.8 * x * x) + j * (pr - pb)
        }
        _ => j * (pr - pwf),
    }))
}

/// Radial oil rate (stb/day).
///
/// With `vogel_pb` set, flowing pressures below that bubble point follow
/// Vogel's inflow relationship on top of the undersaturated Darcy rate.
pub fn oil_rate_radial(
    flow: &RadialFlow,
    pr: f64,
    pwf: impl Into<PressureSample>,
    uo: f64,
    bo: f64,
    vogel_pb: Option<f64>,
) -> PvtResult<Samples<f64>> {
    oil_rate(flow, pr, pwf.into(), uo, bo, vogel_pb)
}

/// Linear oil rate (stb/day), optionally with Vogel below `vogel_pb`.
pub fn oil_rate_linear(
    flow: &LinearFlow,
    pr: f64,
    pwf: impl Into<PressureSample>,
    uo: f64,
    bo: f64,
    vogel_pb: Option<f64>,
) -> PvtResult<Samples<f64>> {
    oil_rate(flow, pr, pwf.into(), uo, bo, vogel_pb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_gas::GasModel;

    fn gas() -> ResolvedGas {
        GasModel::hydrocarbon(0.75).unwrap().resolve().unwrap()
    }

    fn scalar(s: Samples<f64>) -> f64 {
        s.into_scalar().unwrap()
    }

    #[test]
    fn radial_gas_rate() {
        let flow = RadialFlow::new(1.0, 50.0, 0.5, 1500.0);
        let q = scalar(gas_rate_radial(&gas(), &flow, 2000.0, 1000.0, 200.0).unwrap());
        assert!((q - 1566.446).abs() / 1566.446 < 1e-3, "q = {q}");

        let injecting = scalar(gas_rate_radial(&gas(), &flow, 1000.0, 2000.0, 200.0).unwrap());
        assert!((injecting + q).abs() < 1e-9 * q);
    }

    #[test]
    fn non_darcy_skin_reduces_rate() {
        let flow = RadialFlow::new(1.0, 50.0, 0.5, 1500.0)
            .with_skin(2.0)
            .with_non_darcy(1e-3);
        let q = scalar(gas_rate_radial(&gas(), &flow, 2000.0, 1000.0, 200.0).unwrap());
        assert!((q - 1097.792).abs() / 1097.792 < 1e-3, "q = {q}");
    }

    #[test]
    fn linear_gas_rate() {
        let flow = LinearFlow::new(1.0, 50.0, 100.0, 500.0);
        let q = scalar(gas_rate_linear(&gas(), &flow, 2000.0, 1000.0, 200.0).unwrap());
        assert!((q - 361.814).abs() / 361.814 < 1e-3, "q = {q}");
    }

    #[test]
    fn darcy_gas_is_linear_in_drive_without_non_darcy() {
        let flow = RadialFlow::new(5.0, 20.0, 0.3, 1000.0);
        let q1 = darcy_gas(1e8, &flow, 180.0);
        let q2 = darcy_gas(2e8, &flow, 180.0);
        assert!((q2 - 2.0 * q1).abs() < 1e-9 * q2);
    }

    #[test]
    fn oil_rates() {
        let flow = RadialFlow::new(20.0, 20.0, 0.3, 1500.0);
        let darcy = scalar(oil_rate_radial(&flow, 1500.0, 250.0, 0.5, 1.2, None).unwrap());
        assert!((darcy - 759.605).abs() < 1e-2, "q = {darcy}");
        let vogel = scalar(oil_rate_radial(&flow, 1500.0, 250.0, 0.5, 1.2, Some(1300.0)).unwrap());
        assert!((vogel - 530.555).abs() < 1e-2, "q = {vogel}");

        let linear = LinearFlow::new(20.0, 20.0, 500.0, 1000.0);
        let q = scalar(oil_rate_linear(&linear, 1500.0, 250.0, 0.5, 1.2, Some(1300.0)).unwrap());
        assert!((q - 327.933).abs() < 1e-2, "q = {q}");
    }

    #[test]
    fn vogel_matches_darcy_above_bubble_point() {
        let flow = RadialFlow::new(20.0, 20.0, 0.3, 1500.0);
        let pwf = vec![1300.0, 1400.0];
        let darcy = oil_rate_radial(&flow, 1500.0, pwf.clone(), 0.5, 1.2, None).unwrap();
        let vogel = oil_rate_radial(&flow, 1500.0, pwf, 0.5, 1.2, Some(1300.0)).unwrap();
        assert_eq!(darcy, vogel);
    }

    #[test]
    fn bad_geometry_is_configuration_error() {
        let flow = RadialFlow::new(1.0, 50.0, 2.0, 1.0);
        let err = gas_rate_radial(&gas(), &flow, 2000.0, 1000.0, 200.0).unwrap_err();
        assert!(matches!(err, PvtError::Configuration { .. }));
        let linear = LinearFlow::new(1.0, 0.0, 100.0, 500.0);
        assert!(oil_rate_linear(&linear, 1500.0, 250.0, 0.5, 1.2, None).is_err());
    }
}
