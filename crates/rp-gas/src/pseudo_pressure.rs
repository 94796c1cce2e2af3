//! Real gas pseudo-pressure, m(p) = integral of 2p / (mu z) dp.

use crate::model::ResolvedGas;
use crate::properties::viscosity_z_product;
use rp_core::{PvtError, PvtResult};
use rp_solver::{Quadrature, QuadratureConfig, integrate};

impl ResolvedGas {
    /// Integrate the pseudo-pressure kernel from `p1` to `p2` (psia^2/cP).
    ///
    /// Every quadrature node evaluates Z with this gas's engine. A Z failure
    /// at any node aborts the integration and is returned as is.
    pub fn pseudo_pressure_integral(
        &self,
        p1: f64,
        p2: f64,
        degf: f64,
        config: &QuadratureConfig,
    ) -> PvtResult<Quadrature> {
        let sg = self.sg();
        let mut failure: Option<PvtError> = None;

        let kernel = |p: f64| {
            if failure.is_some() {
                return 0.0;
            }
            match self.z_value(0, p, degf) {
                Ok(z) => 2.0 * p / viscosity_z_product(p, degf, sg, z),
                Err(e) => {
                    failure = Some(e);
                    0.0
                }
            }
        };

        let result = integrate(kernel, p1, p2, config);
        if let Some(e) = failure {
            return Err(e);
        }
        Ok(result?)
    }

    /// m(p2) - m(p1) with the default subdivision budget.
    pub fn pseudo_pressure_delta(&self, p1: f64, p2: f64, degf: f64) -> PvtResult<f64> {
        let q = self.pseudo_pressure_integral(p1, p2, degf, &QuadratureConfig::default())?;
        Ok(q.value)
    }
}
