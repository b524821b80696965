//! Distance metrics over dense vectors.
//!
//! A [`Metric`] is a closed set of variants chosen once when the engine is
//! configured. Evaluating it is a pure function of its two inputs, so a single
//! value can be shared freely across threads.
//!
//! ```text
//! euclidean      d(a, b) = sqrt( Σ (a_i - b_i)² )
//! manhattan      d(a, b) = Σ |a_i - b_i|
//! minkowski(p)   d(a, b) = ( Σ |a_i - b_i|^p )^(1/p)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Metric selector as it appears in configuration.
///
/// The Minkowski exponent lives next to the selector in
/// [`DbscanParams`](super::DbscanParams), see [`Metric::from_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences.
    #[serde(alias = "manhatten", alias = "cityblock")]
    Manhattan,
    /// Generalized p-norm distance.
    Minkowski,
}

/// A resolved distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences.
    Manhattan,
    /// p-th root of the sum of p-th powers of absolute differences.
    Minkowski {
        /// Exponent, must be strictly positive.
        p: f32,
    },
}

impl Metric {
    /// Minkowski metric with exponent `p`.
    pub fn minkowski(p: f32) -> Result<Self> {
        let metric = Metric::Minkowski { p };
        metric.validate()?;
        Ok(metric)
    }

    /// Resolve a configuration selector. `p` is only read for `Minkowski`.
    pub fn from_kind(kind: MetricKind, p: f32) -> Result<Self> {
        match kind {
            MetricKind::Euclidean => Ok(Metric::Euclidean),
            MetricKind::Manhattan => Ok(Metric::Manhattan),
            MetricKind::Minkowski => Metric::minkowski(p),
        }
    }

    /// The selector this metric was resolved from.
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Euclidean => MetricKind::Euclidean,
            Metric::Manhattan => MetricKind::Manhattan,
            Metric::Minkowski { .. } => MetricKind::Minkowski,
        }
    }

    /// Check that the metric parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if let Metric::Minkowski { p } = *self {
            if p.is_nan() || p <= 0.0 || p.is_infinite() {
                return Err(Error::InvalidConfiguration {
                    name: "p",
                    message: "must be a finite value greater than 0",
                });
            }
        }
        Ok(())
    }

    /// Distance between `a` and `b`.
    ///
    /// Fails with [`Error::DimensionMismatch`] if the vectors differ in length.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        Ok(match *self {
            Metric::Euclidean => diffs.map(|d| d * d).sum::<f32>().sqrt(),
            Metric::Manhattan => diffs.sum(),
            Metric::Minkowski { p } => diffs.map(|d| d.powf(p)).sum::<f32>().powf(p.recip()),
        })
    }
}
