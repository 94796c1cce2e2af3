//! Gas description used by the critical property correlations.

use rp_core::{PvtError, PvtResult};

/// Gas specific gravity (air = 1) with the mole fractions of the three
/// non-hydrocarbon components the correlations correct for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasComposition {
    sg: f64,
    n2: f64,
    co2: f64,
    h2s: f64,
}

impl GasComposition {
    /// Create a composition, validating that `sg` is positive and the
    /// inert fractions lie in [0, 1] and sum to at most 1.
    pub fn new(sg: f64, n2: f64, co2: f64, h2s: f64) -> PvtResult<Self> {
        if !sg.is_finite() || sg <= 0.0 {
            return Err(PvtError::InvalidArg {
                what: "gas specific gravity must be positive",
            });
        }
        for frac in [n2, co2, h2s] {
            if !frac.is_finite() || !(0.0..=1.0).contains(&frac) {
                return Err(PvtError::InvalidArg {
                    what: "mole fraction must lie in [0, 1]",
                });
            }
        }
        if n2 + co2 + h2s > 1.0 {
            return Err(PvtError::InvalidArg {
                what: "inert mole fractions sum above 1",
            });
        }
        Ok(Self { sg, n2, co2, h2s })
    }

    /// A pure hydrocarbon gas of the given specific gravity.
    pub fn hydrocarbon(sg: f64) -> PvtResult<Self> {
        Self::new(sg, 0.0, 0.0, 0.0)
    }

    pub fn sg(&self) -> f64 {
        self.sg
    }

    pub fn n2(&self) -> f64 {
        self.n2
    }

    pub fn co2(&self) -> f64 {
        self.co2
    }

    pub fn h2s(&self) -> f64 {
        self.h2s
    }

    /// Combined N2 + CO2 + H2S mole fraction.
    pub fn inerts(&self) -> f64 {
        self.n2 + self.co2 + self.h2s
    }

    /// Apparent molecular weight (lb/lb-mol).
    pub fn molecular_weight(&self) -> f64 {
        self.sg * rp_core::AIR_MOLECULAR_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydrocarbon_has_no_inerts() {
        let c = GasComposition::hydrocarbon(0.75).unwrap();
        assert_eq!(c.inerts(), 0.0);
        assert!((c.molecular_weight() - 21.7275).abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(GasComposition::new(0.0, 0.0, 0.0, 0.0).is_err());
        assert!(GasComposition::new(0.7, -0.1, 0.0, 0.0).is_err());
        assert!(GasComposition::new(0.7, 0.5, 0.4, 0.2).is_err());
        assert!(GasComposition::new(0.7, f64::NAN, 0.0, 0.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_fractions_accepted(sg in 0.55f64..1.5, n2 in 0.0f64..0.3, co2 in 0.0f64..0.3, h2s in 0.0f64..0.3) {
            let c = GasComposition::new(sg, n2, co2, h2s).unwrap();
            prop_assert!((c.inerts() - (n2 + co2 + h2s)).abs() < 1e-12);
        }
    }
}
