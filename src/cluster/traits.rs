use super::dbscan::Label;
use crate::error::Result;

/// Common interface for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model and return one cluster label per input point.
    ///
    /// Labels are index-aligned with `data`. Negative labels mark points that
    /// belong to no cluster.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<Label>>;
}
