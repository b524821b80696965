use thiserror::Error;

/// Errors returned by the clustering engine and its statistics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration {name}: {message}")]
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points (or a pair of vectors) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("non-finite coordinate at point {point}, feature {feature}")]
    NonFiniteCoordinate {
        /// Index of the point.
        point: usize,
        /// Index of the coordinate within the point.
        feature: usize,
    },

    /// A label vector is not index-aligned with its point set.
    #[error("label count mismatch: {points} points, {labels} labels")]
    LabelCountMismatch {
        /// Number of points.
        points: usize,
        /// Number of labels.
        labels: usize,
    },

    /// A cluster id below the largest id has no members.
    #[error("cluster {cluster} has no members")]
    EmptyCluster {
        /// The empty cluster id.
        cluster: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
