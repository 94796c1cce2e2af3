use crate::PvtError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, PvtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PvtError::NonFinite { what, value: v })
    }
}

/// Evaluate `sum_n sum_i c[i][n] * x[n]^i`, the nested polynomial form shared
/// by the Valko-McCain and Spivey correlation families.
pub fn nested_polynomial<const N: usize>(coefficients: &[[f64; N]], vars: &[f64; N]) -> f64 {
    let mut z = 0.0;
    for (n, x) in vars.iter().enumerate() {
        let mut power = 1.0;
        for row in coefficients {
            z += row[n] * power;
            power *= x;
        }
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "reconciled Rsb").unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
        assert_eq!(ensure_finite(2.5, "reconciled Rsb").unwrap(), 2.5);
    }

    #[test]
    fn nested_polynomial_matches_expansion() {
        // rows are powers 0, 1, 2; columns are variables
        let c = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let x = [2.0, 3.0];
        let expected = (1.0 + 3.0 * 2.0 + 5.0 * 4.0) + (2.0 + 4.0 * 3.0 + 6.0 * 9.0);
        assert!((nested_polynomial(&c, &x) - expected).abs() < 1e-12);
    }
}
