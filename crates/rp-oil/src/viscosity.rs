//! Live oil viscosity (cP).

use crate::conditions::OilConditions;
use rp_core::{PvtError, PvtResult};

/// Beggs & Robinson (1975) at or below `pb`, Petrosky & Farshad (1995) above.
///
/// `rs` is the GOR in solution at `p`; above the bubble point that is Rsb.
pub fn oil_viscosity(oil: &OilConditions, p: f64, pb: f64, rs: f64) -> PvtResult<f64> {
    if !p.is_finite() || p < 0.0 {
        return Err(PvtError::InvalidArg {
            what: "pressure must be finite and non-negative",
        });
    }
    let uob = beggs_robinson(oil, rs);
    if p <= pb {
        return Ok(uob);
    }
    let l = uob.log10();
    let a = -1.0146 + 1.3322 * l - 0.4876 * l * l - 1.15036 * l * l * l;
    Ok(uob + 1.3449e-3 * (p - pb) * 10f64.powf(a))
}

/// Saturated oil viscosity from dead oil viscosity.
pub fn beggs_robinson(oil: &OilConditions, rs: f64) -> f64 {
    let x = 10f64.powf(3.0324 - 0.02023 * oil.api()) * oil.degf().powf(-1.163);
    let dead = 10f64.powf(x) - 1.0;
    let a = 10.715 * (rs + 100.0).powf(-0.515);
    let b = 5.44 * (rs + 150.0).powf(-0.338);
    a * dead.powf(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        let oil = OilConditions::new(35.0, 200.0, 0.75, 0.75).unwrap();
        let at_pb = oil_viscosity(&oil, 3000.0, 3000.0, 800.0).unwrap();
        let above = oil_viscosity(&oil, 4000.0, 3000.0, 800.0).unwrap();
        let dead = oil_viscosity(&oil, 14.7, 14.7, 0.0).unwrap();
        assert!((at_pb - 0.44003).abs() < 1e-4, "uo = {at_pb}");
        assert!((above - 0.48261).abs() < 1e-4, "uo = {above}");
        assert!((dead - 1.78557).abs() < 1e-4, "uo = {dead}");
    }

    #[test]
    fn dissolved_gas_thins_the_oil() {
        let oil = OilConditions::new(30.0, 180.0, 0.8, 0.0).unwrap();
        let lean = beggs_robinson(&oil, 100.0);
        let rich = beggs_robinson(&oil, 900.0);
        assert!(rich < lean);
    }
}
