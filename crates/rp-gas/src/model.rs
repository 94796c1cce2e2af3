//! Gas description and its resolved, evaluation-ready form.

use crate::composition::GasComposition;
use crate::critical::{CriticalMethod, CriticalOverrides, CriticalProperties, resolve_critical};
use crate::properties;
use crate::zfactor::{ZFactorResult, ZMethod, z_factor};
use rp_core::{PressureSample, PvtError, PvtResult, Samples, degf_to_rankine};

/// Gas composition together with the chosen correlations.
///
/// Nothing is evaluated until [`GasModel::resolve`] is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasModel {
    composition: GasComposition,
    z_method: ZMethod,
    critical_method: CriticalMethod,
    overrides: CriticalOverrides,
}

impl GasModel {
    pub fn new(composition: GasComposition) -> Self {
        Self {
            composition,
            z_method: ZMethod::default(),
            critical_method: CriticalMethod::default(),
            overrides: CriticalOverrides::default(),
        }
    }

    /// Sweet hydrocarbon gas with default methods.
    pub fn hydrocarbon(sg: f64) -> PvtResult<Self> {
        Ok(Self::new(GasComposition::hydrocarbon(sg)?))
    }

    pub fn with_z_method(mut self, method: ZMethod) -> Self {
        self.z_method = method;
        self
    }

    pub fn with_critical_method(mut self, method: CriticalMethod) -> Self {
        self.critical_method = method;
        self
    }

    pub fn with_critical_overrides(mut self, overrides: CriticalOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn composition(&self) -> &GasComposition {
        &self.composition
    }

    /// Compute the pseudo-critical properties once.
    pub fn resolve(&self) -> PvtResult<ResolvedGas> {
        let critical = resolve_critical(&self.composition, self.critical_method, self.overrides)?;
        Ok(ResolvedGas {
            composition: self.composition,
            critical,
            z_method: self.z_method,
        })
    }
}

/// A gas whose critical properties are fixed.
///
/// All pressure-dependent evaluations in one calculation chain go through the
/// same `ResolvedGas`, so they all see the same Tc and Pc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGas {
    composition: GasComposition,
    critical: CriticalProperties,
    z_method: ZMethod,
}

impl ResolvedGas {
    pub fn composition(&self) -> &GasComposition {
        &self.composition
    }

    pub fn critical(&self) -> CriticalProperties {
        self.critical
    }

    pub fn z_method(&self) -> ZMethod {
        self.z_method
    }

    pub fn sg(&self) -> f64 {
        self.composition.sg()
    }

    /// Same gas and critical properties, different Z engine.
    pub fn with_z_method(mut self, method: ZMethod) -> Self {
        self.z_method = method;
        self
    }

    /// Reduced pressure and temperature.
    pub fn reduced(&self, p: f64, degf: f64) -> (f64, f64) {
        (p / self.critical.pc, degf_to_rankine(degf) / self.critical.tc)
    }

    /// Z-factor at one pressure, with the raw engine outcome.
    pub fn z_at(&self, p: f64, degf: f64) -> PvtResult<ZFactorResult> {
        if !p.is_finite() || p < 0.0 {
            return Err(PvtError::InvalidArg {
                what: "pressure must be finite and non-negative",
            });
        }
        let (pr, tr) = self.reduced(p, degf);
        Ok(z_factor(pr, tr, self.z_method))
    }

    /// Per-element engine outcomes, including non-converged elements.
    pub fn z_detailed(
        &self,
        p: impl Into<PressureSample>,
        degf: f64,
    ) -> PvtResult<Samples<ZFactorResult>> {
        let p = p.into();
        p.par_try_map(|_, &pi| self.z_at(pi, degf))
    }

    /// Z-factor values in the shape of `p`.
    ///
    /// An element whose engine did not converge is an
    /// [`PvtError::ElementConvergence`] naming its index. Hall-Yarborough best
    /// estimates are accepted as values; a Z that is not positive is rejected.
    pub fn z(&self, p: impl Into<PressureSample>, degf: f64) -> PvtResult<Samples<f64>> {
        let p = p.into();
        p.par_try_map(|index, &pi| self.z_value(index, pi, degf))
    }

    pub fn z_scalar(&self, p: f64, degf: f64) -> PvtResult<f64> {
        self.z_value(0, p, degf)
    }

    pub(crate) fn z_value(&self, index: usize, p: f64, degf: f64) -> PvtResult<f64> {
        let z = match self.z_at(p, degf)? {
            ZFactorResult::Value(z) | ZFactorResult::BestEstimate { z, .. } => z,
            ZFactorResult::NotConverged { iterations } => {
                return Err(PvtError::ElementConvergence {
                    what: self.z_method.engine_name(),
                    index,
                    iterations,
                });
            }
        };
        if z.is_finite() && z > 0.0 {
            Ok(z)
        } else {
            Err(PvtError::NonFinite {
                what: "Z-factor (must be positive)",
                value: z,
            })
        }
    }

    /// Gas viscosity (cP), Lee-Gonzalez-Eakin.
    pub fn viscosity(&self, p: impl Into<PressureSample>, degf: f64) -> PvtResult<Samples<f64>> {
        let sg = self.sg();
        self.with_z(p, degf, |p, z| properties::lee_gonzalez_eakin(p, degf, sg, z))
    }

    /// Gas density (lb/cuft).
    pub fn density(&self, p: impl Into<PressureSample>, degf: f64) -> PvtResult<Samples<f64>> {
        let sg = self.sg();
        self.with_z(p, degf, |p, z| properties::density(p, degf, sg, z))
    }

    /// 1/Bg (scf/rcf).
    pub fn inverse_fvf(&self, p: impl Into<PressureSample>, degf: f64) -> PvtResult<Samples<f64>> {
        self.with_z(p, degf, |p, z| properties::inverse_fvf(p, degf, z))
    }

    /// Bg (rcf/scf).
    pub fn fvf(&self, p: impl Into<PressureSample>, degf: f64) -> PvtResult<Samples<f64>> {
        self.with_z(p, degf, |p, z| 1.0 / properties::inverse_fvf(p, degf, z))
    }

    /// Isothermal compressibility (1/psi) from the DAK equation of state.
    pub fn compressibility(
        &self,
        p: impl Into<PressureSample>,
        degf: f64,
    ) -> PvtResult<Samples<f64>> {
        let p = p.into();
        let crit = self.critical;
        p.par_try_map(|index, &pi| {
            properties::compressibility(pi, degf, &crit).map_err(|e| match e {
                PvtError::ElementConvergence {
                    what, iterations, ..
                } => PvtError::ElementConvergence {
                    what,
                    index,
                    iterations,
                },
                other => other,
            })
        })
    }

    fn with_z<F>(&self, p: impl Into<PressureSample>, degf: f64, f: F) -> PvtResult<Samples<f64>>
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        let p = p.into();
        p.par_try_map(|index, &pi| Ok(f(pi, self.z_value(index, pi, degf)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas(method: ZMethod) -> ResolvedGas {
        GasModel::hydrocarbon(0.75)
            .unwrap()
            .with_z_method(method)
            .resolve()
            .unwrap()
    }

    #[test]
    fn scalar_in_scalar_out() {
        let z = gas(ZMethod::IterativeFixedPoint).z(2000.0, 200.0).unwrap();
        assert!(z.is_scalar());
        assert!((z.into_scalar().unwrap() - 0.86855).abs() < 1e-3);
    }

    #[test]
    fn sequence_keeps_length_and_order() {
        let g = gas(ZMethod::Linearized);
        let p = vec![4000.0, 500.0, 2000.0];
        let z = g.z(p.clone(), 200.0).unwrap();
        assert_eq!(z.len(), 3);
        for (zi, pi) in z.iter().zip(&p) {
            assert_eq!(*zi, g.z_scalar(*pi, 200.0).unwrap());
        }
    }

    #[test]
    fn one_element_sequence_stays_a_sequence() {
        let z = gas(ZMethod::NewtonRaphson).z(vec![2000.0], 200.0).unwrap();
        assert!(!z.is_scalar());
        assert_eq!(z.len(), 1);
    }

    #[test]
    fn negative_pressure_rejected() {
        let err = gas(ZMethod::IterativeFixedPoint).z(-1.0, 200.0).unwrap_err();
        assert!(matches!(err, PvtError::InvalidArg { .. }));
    }

    #[test]
    fn fvf_is_reciprocal_of_inverse() {
        let g = gas(ZMethod::IterativeFixedPoint);
        let bg = g.fvf(3000.0, 180.0).unwrap().into_scalar().unwrap();
        let inv = g.inverse_fvf(3000.0, 180.0).unwrap().into_scalar().unwrap();
        assert!((bg * inv - 1.0).abs() < 1e-12);
    }

    #[test]
    fn resolved_gas_reuses_critical_properties() {
        let model = GasModel::hydrocarbon(0.75).unwrap();
        let g = model.resolve().unwrap();
        let hy = g.with_z_method(ZMethod::NewtonRaphson);
        assert_eq!(g.critical(), hy.critical());
        assert_eq!(hy.z_method(), ZMethod::NewtonRaphson);
    }

    #[test]
    fn long_sequence_matches_scalar_evaluation() {
        let g = gas(ZMethod::IterativeFixedPoint);
        let p: Vec<f64> = (0..200).map(|i| 100.0 + 40.0 * i as f64).collect();
        let z = g.z(p.clone(), 200.0).unwrap();
        for (i, pi) in p.iter().enumerate() {
            assert_eq!(z.as_slice()[i], g.z_scalar(*pi, 200.0).unwrap());
        }
    }
}
