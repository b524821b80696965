//! Post-fit cluster statistics: count, centroids, inertia.
//!
//! These work on any label vector (noise is [`NOISE`](super::NOISE), clusters are ids
//! `0..k`), so they can score a labeling produced elsewhere as well as a
//! [`DbscanFit`](super::DbscanFit).
//!
//! Inertia is the within-cluster sum of squared distances to the centroid,
//! measured with the same metric used for clustering:
//!
//! ```text
//! inertia = Σ_k Σ_{x ∈ C_k} d(x, μ_k)²
//! ```

use std::collections::BTreeSet;

use super::dbscan::Label;
use super::metric::Metric;
use super::util::{check_dimensions, check_label_count};
use crate::error::{Error, Result};

/// Summary of a labeling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterStats {
    /// Number of clusters (noise excluded).
    pub n_clusters: usize,
    /// Member count per cluster id.
    pub sizes: Vec<usize>,
    /// Mean of the member points per cluster id.
    pub centroids: Vec<Vec<f32>>,
    /// Sum of squared distances of clustered points to their centroid.
    pub inertia: f32,
}

impl ClusterStats {
    /// Compute every statistic for `labels` over `data`.
    pub fn compute(data: &[Vec<f32>], labels: &[Label], metric: Metric) -> Result<Self> {
        let (sizes, centroids) = accumulate(data, labels)?;
        let inertia = inertia(data, labels, &centroids, metric)?;
        Ok(Self {
            n_clusters: centroids.len(),
            sizes,
            centroids,
            inertia,
        })
    }
}

/// Number of distinct cluster ids in `labels`. Noise is not a cluster.
pub fn cluster_count(labels: &[Label]) -> usize {
    labels
        .iter()
        .filter(|&&l| l >= 0)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Centroid of each cluster, indexed by cluster id.
///
/// Fails with [`Error::EmptyCluster`] if some id below the largest one has no
/// members.
pub fn centroids(data: &[Vec<f32>], labels: &[Label]) -> Result<Vec<Vec<f32>>> {
    accumulate(data, labels).map(|(_, centroids)| centroids)
}

/// Sum over clustered points of the squared `metric` distance to their centroid.
pub fn inertia(
    data: &[Vec<f32>],
    labels: &[Label],
    centroids: &[Vec<f32>],
    metric: Metric,
) -> Result<f32> {
    check_label_count(data, labels)?;
    let mut total = 0.0f32;
    for (point, &label) in data.iter().zip(labels) {
        if label < 0 {
            continue;
        }
        let centroid = centroids
            .get(label as usize)
            .ok_or(Error::EmptyCluster {
                cluster: label as usize,
            })?;
        let d = metric.distance(point, centroid)?;
        total += d * d;
    }
    Ok(total)
}

fn accumulate(data: &[Vec<f32>], labels: &[Label]) -> Result<(Vec<usize>, Vec<Vec<f32>>)> {
    check_label_count(data, labels)?;
    let dim = check_dimensions(data)?;

    // Ids ascend in the set, so the first one out of place names the
    // smallest missing id. Checked before sizing any buffer by the ids.
    let present: BTreeSet<usize> = labels
        .iter()
        .filter_map(|&l| usize::try_from(l).ok())
        .collect();
    if let Some(cluster) = present
        .iter()
        .enumerate()
        .find_map(|(expected, &id)| (id != expected).then_some(expected))
    {
        return Err(Error::EmptyCluster { cluster });
    }
    let k = present.len();

    let mut sizes = vec![0usize; k];
    let mut sums = vec![vec![0.0f32; dim]; k];
    for (point, &label) in data.iter().zip(labels) {
        if label < 0 {
            continue;
        }
        let c = label as usize;
        sizes[c] += 1;
        for (s, x) in sums[c].iter_mut().zip(point) {
            *s += x;
        }
    }

    for (sum, &n) in sums.iter_mut().zip(&sizes) {
        let n = n as f32;
        sum.iter_mut().for_each(|s| *s /= n);
    }

    Ok((sizes, sums))
}
