//! Embedding vectors and the distance used to rank them.

use crate::error::{Result, RetrieverError};
use serde::{Deserialize, Serialize};

/// A vector of floats, one component per embedding dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(pub Vec<f64>);

impl Vector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Ranks the same way as the Euclidean distance without the square root.
    /// Fails with `DimensionMismatch` when the lengths differ.
    pub fn distance(&self, other: &Vector) -> Result<f64> {
        if self.len() != other.len() {
            return Err(RetrieverError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(self
            .0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| (a - b) * (a - b))
            .sum())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Vector::from(vec![1.0, 0.0]);
        let b = Vector::from(vec![0.0, 1.0]);
        assert_eq!(a.distance(&b).unwrap(), 2.0);

        let c = Vector::from(vec![1.0, 2.0, 3.0]);
        let d = Vector::from(vec![4.0, 6.0, 3.0]);
        assert_eq!(c.distance(&d).unwrap(), 25.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for v in [
            vec![],
            vec![0.0],
            vec![1.5, -2.25, 1e9],
            vec![-0.001, 0.002, 0.3, 4.0],
        ] {
            let v = Vector::from(v);
            assert_eq!(v.distance(&v).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (vec![1.0, 2.0], vec![-3.0, 0.5]),
            (vec![0.1, 0.2, 0.3], vec![0.3, 0.2, 0.1]),
            (vec![1e-3, 7.0, -7.0], vec![2e-3, -7.0, 7.0]),
        ];
        for (a, b) in pairs {
            let (a, b) = (Vector::from(a), Vector::from(b));
            assert_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
        }
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let a = Vector::from(vec![1.0, 2.0]);
        let b = Vector::from(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            a.distance(&b),
            Err(RetrieverError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let v = Vector::from(vec![0.5, 1.0]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[0.5,1.0]");
    }
}
