//! Error types for solver operations.

use rp_core::PvtError;
use thiserror::Error;

/// Errors that can occur while solving or integrating.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "Bisection exhausted {iterations} iterations (residual={residual:e}, bracket=[{lo}, {hi}])"
    )]
    BracketConvergence {
        iterations: usize,
        residual: f64,
        lo: f64,
        hi: f64,
    },

    #[error("Non-finite {what} ({value}) at x={at}")]
    NonFinite {
        what: &'static str,
        value: f64,
        at: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PvtError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::BracketConvergence {
                iterations,
                residual,
                lo,
                hi,
            } => PvtError::BracketConvergence {
                iterations,
                residual,
                lo,
                hi,
            },
            SolverError::NonFinite { what, value, at: _ } => PvtError::NonFinite { what, value },
            SolverError::InvalidArg { what } => PvtError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::FailureKind;

    #[test]
    fn bracket_failure_stays_hard() {
        let err: PvtError = SolverError::BracketConvergence {
            iterations: 99,
            residual: 1.0,
            lo: 0.0,
            hi: 1.0,
        }
        .into();
        assert_eq!(err.kind(), FailureKind::BracketConvergence);
        assert!(!err.is_soft());
    }
}
