//! Scalar Newton iteration.

use tracing::trace;

/// Newton solver configuration.
#[derive(Clone, Copy, Debug)]
pub struct NewtonConfig {
    /// Maximum number of updates
    pub max_iterations: usize,
    /// Absolute tolerance on the residual
    pub abs_tol: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-8,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Copy, Debug)]
pub struct NewtonResult {
    /// Last iterate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Number of updates applied
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Newton iteration with an analytic derivative.
///
/// Stops with `converged = false` when the iteration budget runs out, or as
/// soon as the iterate, residual or derivative stops being usable. The last
/// iterate is always reported so callers can keep a best estimate.
pub fn newton_solve<F, D>(x0: f64, mut f: F, mut df: D, config: &NewtonConfig) -> NewtonResult
where
    F: FnMut(f64) -> f64,
    D: FnMut(f64) -> f64,
{
    iterate(
        x0,
        &mut f,
        &mut |_: &mut dyn FnMut(f64) -> f64, x: f64| df(x),
        config,
    )
}

/// Newton iteration with a symmetric finite-difference derivative
/// `(f(x + h) - f(x - h)) / 2h`.
pub fn newton_solve_fd<F>(x0: f64, mut f: F, half_step: f64, config: &NewtonConfig) -> NewtonResult
where
    F: FnMut(f64) -> f64,
{
    iterate(
        x0,
        &mut f,
        &mut |g: &mut dyn FnMut(f64) -> f64, x: f64| {
            (g(x + half_step) - g(x - half_step)) / (2.0 * half_step)
        },
        config,
    )
}

type Slope<'a> = dyn FnMut(&mut dyn FnMut(f64) -> f64, f64) -> f64 + 'a;

fn iterate(
    x0: f64,
    f: &mut dyn FnMut(f64) -> f64,
    slope: &mut Slope<'_>,
    config: &NewtonConfig,
) -> NewtonResult {
    let mut x = x0;
    let mut r = f(x);

    for iteration in 0..=config.max_iterations {
        if !x.is_finite() || !r.is_finite() {
            return stalled(x, r, iteration);
        }
        if r.abs() <= config.abs_tol {
            return NewtonResult {
                x,
                residual: r,
                iterations: iteration,
                converged: true,
            };
        }
        if iteration == config.max_iterations {
            break;
        }

        let d = slope(&mut *f, x);
        if !d.is_finite() || d == 0.0 {
            return stalled(x, r, iteration);
        }
        x -= r / d;
        r = f(x);
        trace!(iteration, x, residual = r, "newton step");
    }

    stalled(x, r, config.max_iterations)
}

fn stalled(x: f64, residual: f64, iterations: usize) -> NewtonResult {
    NewtonResult {
        x,
        residual,
        iterations,
        converged: false,
    }
}
