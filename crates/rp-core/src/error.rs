use thiserror::Error;

pub type PvtResult<T> = Result<T, PvtError>;

/// Closed classification of failures, independent of the message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Unknown method name or missing/invalid correlation inputs.
    Configuration,
    /// Bracketed root search ran out of iterations.
    BracketConvergence,
    /// A single element of a sequence failed to converge.
    ElementConvergence,
    /// An outer fixed-point loop ran out of iterations.
    IterationLimit,
    /// Non-finite or otherwise unusable numeric value.
    Numeric,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PvtError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error(
        "Bisection did not converge after {iterations} iterations \
         (residual={residual:e}, bracket=[{lo}, {hi}])"
    )]
    BracketConvergence {
        iterations: usize,
        residual: f64,
        lo: f64,
        hi: f64,
    },

    #[error("{what} did not converge at element {index} after {iterations} iterations")]
    ElementConvergence {
        what: &'static str,
        index: usize,
        iterations: usize,
    },

    #[error(
        "Could not reconcile bubble point {target} psia with solution GOR after \
         {iterations} iterations (implied Pb {implied} psia)"
    )]
    Reconciliation {
        iterations: usize,
        target: f64,
        implied: f64,
    },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl PvtError {
    pub fn configuration(what: impl Into<String>) -> Self {
        PvtError::Configuration { what: what.into() }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            PvtError::Configuration { .. } | PvtError::InvalidArg { .. } => {
                FailureKind::Configuration
            }
            PvtError::BracketConvergence { .. } => FailureKind::BracketConvergence,
            PvtError::ElementConvergence { .. } => FailureKind::ElementConvergence,
            PvtError::Reconciliation { .. } => FailureKind::IterationLimit,
            PvtError::NonFinite { .. } => FailureKind::Numeric,
        }
    }

    /// Soft failures concern one element of a result and leave the rest usable.
    pub fn is_soft(&self) -> bool {
        self.kind() == FailureKind::ElementConvergence
    }
}
