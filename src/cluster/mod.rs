//! Density-based clustering for dense vectors.
//!
//! The pieces, leaves first:
//!
//! - [`Metric`]: distance between two vectors (Euclidean, Manhattan, Minkowski).
//! - [`RegionQuery`]: indices of all points within `eps` of a point.
//! - [`Dbscan`]: the labeling engine. It holds configuration only and returns a
//!   [`DbscanFit`] from every call to [`Dbscan::fit`].
//! - [`ClusterStats`]: cluster count, centroids and inertia of a labeling.
//!
//! ## Why density?
//!
//! Centroid methods such as k-means assume roughly spherical clusters and a
//! known `k`. DBSCAN instead grows clusters through chains of dense points, so
//! a ring or a crescent comes out as one cluster and isolated points come out
//! as noise.
//!
//! **When to use**: the number of clusters is unknown, clusters have similar
//! density, and outliers should be reported rather than absorbed.
//!
//! ## Usage
//!
//! ```rust
//! use reach::cluster::{Dbscan, Metric, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//!     vec![50.0, 50.0],
//! ];
//!
//! let fit = Dbscan::new(0.5, 2)
//!     .with_metric(Metric::Manhattan)
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(fit.labels(), &[0, 0, 1, 1, NOISE]);
//! assert_eq!(fit.n_clusters(), 2);
//! assert_eq!(fit.centroids().len(), 2);
//! ```

mod dbscan;
mod metric;
mod neighbors;
pub mod stats;
mod traits;
mod util;

pub use dbscan::{Dbscan, DbscanExt, DbscanFit, DbscanParams, Label, NOISE};
pub use metric::{Metric, MetricKind};
pub use neighbors::RegionQuery;
pub use stats::ClusterStats;
pub use traits::Clustering;
