//! Globally adaptive Gauss-Kronrod (7/15 point) quadrature.

use crate::error::{SolverError, SolverResult};
use tracing::warn;

// Kronrod abscissae on [-1, 1]; odd indices are shared with the 7-point Gauss rule.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

// Gauss weights for XGK[1], XGK[3], XGK[5] and the centre.
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

#[derive(Clone, Copy, Debug)]
pub struct QuadratureConfig {
    /// Maximum number of subintervals
    pub max_subintervals: usize,
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            max_subintervals: 500,
            abs_tol: 1.49e-8,
            rel_tol: 1.49e-8,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Quadrature {
    pub value: f64,
    /// Estimated absolute error of `value`
    pub abs_error: f64,
    pub subintervals: usize,
    pub converged: bool,
}

#[derive(Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` from `a` to `b`.
///
/// The interval with the largest error estimate is bisected until the total
/// error meets `max(abs_tol, rel_tol * |value|)` or the subinterval limit is
/// reached. Hitting the limit is not an error: the best estimate is returned
/// with `converged = false`.
pub fn integrate<F>(mut f: F, a: f64, b: f64, config: &QuadratureConfig) -> SolverResult<Quadrature>
where
    F: FnMut(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(SolverError::InvalidArg {
            what: "integration limits must be finite",
        });
    }
    if a == b {
        return Ok(Quadrature {
            value: 0.0,
            abs_error: 0.0,
            subintervals: 0,
            converged: true,
        });
    }
    let (lo, hi, sign) = if b < a { (b, a, -1.0) } else { (a, b, 1.0) };

    let mut segments = vec![kronrod(&mut f, lo, hi)?];
    let max_subintervals = config.max_subintervals.max(1);

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = config.abs_tol.max(config.rel_tol * value.abs());

        if error <= tolerance {
            return Ok(Quadrature {
                value: sign * value,
                abs_error: error,
                subintervals: segments.len(),
                converged: true,
            });
        }
        if segments.len() >= max_subintervals {
            warn!(
                subintervals = segments.len(),
                abs_error = error,
                "quadrature subdivision limit reached, returning best estimate"
            );
            return Ok(Quadrature {
                value: sign * value,
                abs_error: error,
                subintervals: segments.len(),
                converged: false,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let seg = segments.swap_remove(worst);
        let mid = 0.5 * (seg.a + seg.b);
        segments.push(kronrod(&mut f, seg.a, mid)?);
        segments.push(kronrod(&mut f, mid, seg.b)?);
    }
}

fn kronrod<F>(f: &mut F, a: f64, b: f64) -> SolverResult<Segment>
where
    F: FnMut(f64) -> f64,
{
    let centre = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = sample(f, centre)?;
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = sample(f, centre - dx)? + sample(f, centre + dx)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}

fn sample<F>(f: &mut F, x: f64) -> SolverResult<f64>
where
    F: FnMut(f64) -> f64,
{
    let v = f(x);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SolverError::NonFinite {
            what: "integrand",
            value: v,
            at: x,
        })
    }
}
