//! Density-based spatial clustering.
//!
//! `reach` is a small library implementing DBSCAN over dense `f32` vectors.
//! Given eps and min_samples it partitions points into clusters of arbitrary
//! shape and marks sparse points as noise, without a predetermined cluster
//! count.
//!
//! The primary public API is under [`cluster`], which provides:
//! - DBSCAN labeling with a configurable distance metric
//! - cluster statistics (count, centroids, inertia) for any labeling
//!
//! The library logs through `tracing` and never installs a subscriber.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{
    ClusterStats, Clustering, Dbscan, DbscanExt, DbscanFit, DbscanParams, Label, Metric,
    MetricKind, RegionQuery, NOISE,
};
pub use error::{Error, Result};
