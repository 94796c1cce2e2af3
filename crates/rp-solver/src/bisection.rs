//! Bracketed bisection root finder.

use crate::error::{SolverError, SolverResult};
use tracing::trace;

/// Midpoint evaluations allowed before giving up.
pub const BISECTION_MAX_ITERATIONS: usize = 99;

/// Find `x` in `[xmin, xmax]` with `|f(x)| <= rtol` by repeated halving.
///
/// The side of the midpoint that keeps the root is chosen by comparing the
/// sign of `f(mid)` with the sign of `f` at the current upper bound. The
/// bracket is not checked for a sign change up front; a bracket with no root
/// simply exhausts its iterations. The returned value is always a midpoint
/// whose residual was evaluated and met the tolerance.
pub fn bisect_solve<F>(mut f: F, xmin: f64, xmax: f64, rtol: f64) -> SolverResult<f64>
where
    F: FnMut(f64) -> f64,
{
    let mut lo = xmin;
    let mut hi = xmax;
    let mut err_hi = f(hi);
    let mut err_mid = f64::INFINITY;

    for iteration in 1..=BISECTION_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        err_mid = f(mid);
        if !err_mid.is_finite() {
            return Err(SolverError::NonFinite {
                what: "bisection residual",
                value: err_mid,
                at: mid,
            });
        }
        trace!(iteration, mid, err_mid, "bisection step");

        if err_mid.abs() <= rtol {
            return Ok(mid);
        }

        if err_hi * err_mid < 0.0 {
            // root lies above mid
            lo = mid;
        } else {
            hi = mid;
            err_hi = err_mid;
        }
    }

    Err(SolverError::BracketConvergence {
        iterations: BISECTION_MAX_ITERATIONS,
        residual: err_mid,
        lo,
        hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_square_root() {
        let x = bisect_solve(|x| x * x - 2.0, 0.0, 2.0, 1e-10).unwrap();
        assert!((x - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn decreasing_function() {
        let x = bisect_solve(|x| 1.0 - x, 0.0, 3.0, 1e-12).unwrap();
        assert!((x - 1.0).abs() < 1e-11);
    }

    #[test]
    fn returned_point_meets_tolerance() {
        let f = |x: f64| x.powi(3) - 0.3 * x - 5.0;
        let rtol = 1e-7;
        let x = bisect_solve(f, 0.0, 10.0, rtol).unwrap();
        assert!(f(x).abs() <= rtol);
    }

    #[test]
    fn first_midpoint_root_converges_immediately() {
        let mut calls = 0;
        let x = bisect_solve(
            |x| {
                calls += 1;
                x - 5.0
            },
            0.0,
            10.0,
            1e-9,
        )
        .unwrap();
        assert_eq!(x, 5.0);
        // one call at the upper bound plus the midpoint
        assert_eq!(calls, 2);
    }

    #[test]
    fn bracket_without_root_fails_after_iteration_limit() {
        let err = bisect_solve(|x| x * x + 1.0, -1.0, 3.0, 1e-9).unwrap_err();
        match err {
            SolverError::BracketConvergence { iterations, .. } => {
                assert_eq!(iterations, BISECTION_MAX_ITERATIONS)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nan_residual_is_reported() {
        let err = bisect_solve(|x| (x - 4.0).sqrt() - 10.0, 0.0, 2.0, 1e-9).unwrap_err();
        assert!(matches!(err, SolverError::NonFinite { .. }));
    }
}
