//! Recover pressure from a target P/Z.

use crate::model::ResolvedGas;
use rp_core::{PressureSample, PvtError, PvtResult, Samples};
use rp_solver::bisect_solve;

/// Default relative tolerance on the normalized P/Z residual.
pub const P_OVER_Z_RTOL: f64 = 1e-7;

// Bracket multipliers on the target P/Z. The bracket only contains the root
// while 0.2 < z < 1.8 at the solution pressure.
const BRACKET_LO: f64 = 0.2;
const BRACKET_HI: f64 = 1.8;

impl ResolvedGas {
    /// Pressure (psia) whose P/Z equals each element of `p_over_z`.
    ///
    /// Bisects `(p - ponz * z(p)) / p` over `[0.2, 1.8] * ponz`. Output has the
    /// shape of the input.
    pub fn pressure_from_p_over_z(
        &self,
        p_over_z: impl Into<PressureSample>,
        degf: f64,
        rtol: f64,
    ) -> PvtResult<Samples<f64>> {
        let targets = p_over_z.into();
        targets.par_try_map(|index, &ponz| self.invert_one(index, ponz, degf, rtol))
    }

    fn invert_one(&self, index: usize, ponz: f64, degf: f64, rtol: f64) -> PvtResult<f64> {
        if !ponz.is_finite() || ponz <= 0.0 {
            return Err(PvtError::InvalidArg {
                what: "P/Z must be finite and positive",
            });
        }

        let mut failure: Option<PvtError> = None;
        let residual = |p: f64| {
            if failure.is_some() {
                return 0.0;
            }
            match self.z_value(index, p, degf) {
                Ok(z) => (p - ponz * z) / p,
                Err(e) => {
                    failure = Some(e);
                    0.0
                }
            }
        };

        let p = bisect_solve(residual, BRACKET_LO * ponz, BRACKET_HI * ponz, rtol);
        if let Some(e) = failure {
            return Err(e);
        }
        Ok(p?)
    }
}
