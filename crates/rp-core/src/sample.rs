//! Shape-preserving inputs and outputs.
//!
//! Every evaluator that accepts pressures accepts either a single value or an
//! ordered sequence, and returns the same shape it was given. Element `i` of
//! the output always corresponds to element `i` of the input.

use rayon::prelude::*;

/// Sequences at least this long are evaluated on the rayon pool.
const PARALLEL_MIN_LEN: usize = 64;

/// A single value or an ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Samples<T> {
    Scalar(T),
    Sequence(Vec<T>),
}

/// Pressures in psia, scalar or sequence.
pub type PressureSample = Samples<f64>;

impl<T> Samples<T> {
    pub fn len(&self) -> usize {
        match self {
            Samples::Scalar(_) => 1,
            Samples::Sequence(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Samples::Scalar(_))
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Samples::Scalar(v) => std::slice::from_ref(v),
            Samples::Sequence(v) => v,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Samples<U> {
        match self {
            Samples::Scalar(v) => Samples::Scalar(f(v)),
            Samples::Sequence(v) => Samples::Sequence(v.iter().map(f).collect()),
        }
    }

    /// Apply a fallible `f` (given the element index) to every element.
    ///
    /// Stops at the first error.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(usize, &T) -> Result<U, E>,
    ) -> Result<Samples<U>, E> {
        match self {
            Samples::Scalar(v) => Ok(Samples::Scalar(f(0, v)?)),
            Samples::Sequence(v) => {
                let mut out = Vec::with_capacity(v.len());
                for (i, x) in v.iter().enumerate() {
                    out.push(f(i, x)?);
                }
                Ok(Samples::Sequence(out))
            }
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Samples::Scalar(v) => vec![v],
            Samples::Sequence(v) => v,
        }
    }

    /// The value of a scalar sample; `None` for sequences.
    pub fn into_scalar(self) -> Option<T> {
        match self {
            Samples::Scalar(v) => Some(v),
            Samples::Sequence(_) => None,
        }
    }
}

impl<T: Sync> Samples<T> {
    /// Like [`Samples::map`], but long sequences are evaluated in parallel.
    ///
    /// Output order matches input order.
    pub fn par_map<U, F>(&self, f: F) -> Samples<U>
    where
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        match self {
            Samples::Sequence(v) if v.len() >= PARALLEL_MIN_LEN => {
                Samples::Sequence(v.par_iter().map(f).collect())
            }
            _ => self.map(f),
        }
    }

    /// Parallel [`Samples::try_map`]. When several elements fail, the error of
    /// the lowest index is returned.
    pub fn par_try_map<U, E, F>(&self, f: F) -> Result<Samples<U>, E>
    where
        U: Send,
        E: Send,
        F: Fn(usize, &T) -> Result<U, E> + Sync + Send,
    {
        match self {
            Samples::Sequence(v) if v.len() >= PARALLEL_MIN_LEN => {
                let results: Vec<Result<U, E>> =
                    v.par_iter().enumerate().map(|(i, x)| f(i, x)).collect();
                results
                    .into_iter()
                    .collect::<Result<Vec<U>, E>>()
                    .map(Samples::Sequence)
            }
            _ => self.try_map(f),
        }
    }
}

impl From<f64> for Samples<f64> {
    fn from(v: f64) -> Self {
        Samples::Scalar(v)
    }
}

impl From<Vec<f64>> for Samples<f64> {
    fn from(v: Vec<f64>) -> Self {
        Samples::Sequence(v)
    }
}

impl From<&[f64]> for Samples<f64> {
    fn from(v: &[f64]) -> Self {
        Samples::Sequence(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Samples<f64> {
    fn from(v: [f64; N]) -> Self {
        Samples::Sequence(v.to_vec())
    }
}

impl From<&Samples<f64>> for Samples<f64> {
    fn from(v: &Samples<f64>) -> Self {
        v.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_stays_scalar() {
        let p: PressureSample = 1000.0.into();
        let out = p.map(|x| x * 2.0);
        assert_eq!(out, Samples::Scalar(2000.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out.as_slice(), &[2000.0]);
    }

    #[test]
    fn single_element_sequence_stays_sequence() {
        let p: PressureSample = vec![1000.0].into();
        let out = p.map(|x| x + 1.0);
        assert!(!out.is_scalar());
        assert_eq!(out.into_scalar(), None);
    }

    #[test]
    fn try_map_reports_index() {
        let p: PressureSample = [1.0, 2.0, -3.0, 4.0].into();
        let err = p
            .try_map(|i, x| if *x < 0.0 { Err(i) } else { Ok(*x) })
            .unwrap_err();
        assert_eq!(err, 2);
    }

    #[test]
    fn par_map_preserves_order() {
        let v: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let p: PressureSample = v.clone().into();
        let out = p.par_map(|x| x * 3.0).into_vec();
        let expected: Vec<f64> = v.iter().map(|x| x * 3.0).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn par_try_map_returns_lowest_failing_index() {
        let v: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let p: PressureSample = v.into();
        let err = p
            .par_try_map(|i, x| if *x > 150.0 || i == 90 { Err(i) } else { Ok(*x) })
            .unwrap_err();
        assert_eq!(err, 90);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn map_keeps_length(v in prop::collection::vec(0.0f64..1e4, 0..200)) {
            let n = v.len();
            let p: PressureSample = v.into();
            prop_assert_eq!(p.par_map(|x| x.sqrt()).len(), n);
        }
    }
}
