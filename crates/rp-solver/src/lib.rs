//! Scalar nonlinear solvers and quadrature for the property correlations.
//!
//! Everything here works on plain `f64` closures. The solvers never decide a
//! failure policy on behalf of the caller: bisection reports an exhausted
//! bracket as an error, Newton reports `converged = false`, and quadrature
//! returns its best estimate when the subdivision limit is reached.

pub mod bisection;
pub mod error;
pub mod newton;
pub mod quadrature;

pub use bisection::{BISECTION_MAX_ITERATIONS, bisect_solve};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult, newton_solve, newton_solve_fd};
pub use quadrature::{Quadrature, QuadratureConfig, integrate};
