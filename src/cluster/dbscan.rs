//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points that sit in dense regions and leaves sparse points
//! out as noise. It needs no cluster count up front and finds clusters of
//! arbitrary shape.
//!
//! ## Core Concepts
//!
//! - **eps (ε)**: neighborhood radius. The boundary is inclusive.
//! - **min_samples**: minimum neighborhood size, *counting the point itself*,
//!   for a point to be core.
//! - **Core point**: its ε-neighborhood holds at least `min_samples` points.
//! - **Border point**: not core, but inside some core point's neighborhood.
//! - **Noise point**: not reachable from any core point.
//!
//! ## Labeling
//!
//! Points are scanned in index order. An unlabeled point with a small
//! neighborhood is provisionally marked [`NOISE`]. An unlabeled core point
//! opens the next cluster id and seeds a FIFO frontier with its neighbors.
//! Frontier entries are deduplicated by a membership set and processed as
//! follows:
//!
//! 1. A noise point is claimed as a border member. Its neighborhood is not
//!    queried again.
//! 2. A point that already carries a cluster id is skipped.
//! 3. An unlabeled point joins the cluster and is queried; if it is core, its
//!    unseen neighbors are appended to the frontier.
//!
//! Every point is queried exactly once, so core status is known for all of
//! them when the scan ends.
//!
//! ## Complexity
//!
//! - **Time**: O(n²·d), brute-force neighborhood scans.
//! - **Space**: O(n) for labels plus the frontier of the cluster being grown.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::metric::{Metric, MetricKind};
use super::neighbors::RegionQuery;
use super::stats::ClusterStats;
use super::traits::Clustering;
use super::util::{check_dimensions, check_finite};
use crate::error::{Error, Result};

/// Cluster label of a point. Clusters are `0..k`, noise is [`NOISE`].
pub type Label = i32;

/// Label of points not density-reachable from any core point.
pub const NOISE: Label = -1;

// Never observable once `fit` returns.
const UNVISITED: Label = -2;

/// Serializable DBSCAN configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbscanParams {
    /// Neighborhood radius. Must be non-negative.
    pub eps: f32,
    /// Minimum neighborhood size (including the point) for a core point.
    pub min_samples: usize,
    /// Distance metric.
    pub metric: MetricKind,
    /// Minkowski exponent, read only when `metric` is `minkowski`.
    pub p: f32,
    /// Run neighborhood scans on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 5,
            metric: MetricKind::Euclidean,
            p: 2.0,
            parallel: false,
        }
    }
}

impl DbscanParams {
    /// Resolve the metric selector into a [`Metric`].
    pub fn resolve_metric(&self) -> Result<Metric> {
        Metric::from_kind(self.metric, self.p)
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        validate_eps(self.eps)?;
        validate_min_samples(self.min_samples)?;
        self.resolve_metric().map(|_| ())
    }
}

/// DBSCAN clustering engine.
///
/// The engine only holds configuration; every fit returns its own
/// [`DbscanFit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dbscan {
    /// Neighborhood radius.
    eps: f32,
    /// Minimum neighborhood size for core point classification.
    min_samples: usize,
    metric: Metric,
    parallel: bool,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer with the Euclidean metric.
    ///
    /// # Arguments
    ///
    /// * `eps` - Maximum distance between two points to be neighbors.
    /// * `min_samples` - Minimum neighborhood size, including the point itself.
    ///
    /// Parameters are checked when [`fit`](Self::fit) is called.
    pub fn new(eps: f32, min_samples: usize) -> Self {
        Self {
            eps,
            min_samples,
            metric: Metric::Euclidean,
            parallel: false,
        }
    }

    /// Build a validated engine from serialized parameters.
    pub fn from_params(params: &DbscanParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            eps: params.eps,
            min_samples: params.min_samples,
            metric: params.resolve_metric()?,
            parallel: params.parallel,
        })
    }

    /// Set eps (neighborhood radius).
    pub fn with_eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    /// Set the minimum neighborhood size for core classification.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Scan neighborhoods in parallel. Labels do not depend on this setting.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Neighborhood radius.
    pub fn eps(&self) -> f32 {
        self.eps
    }

    /// Minimum neighborhood size.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Distance metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Current configuration in serializable form.
    pub fn params(&self) -> DbscanParams {
        let p = match self.metric {
            Metric::Minkowski { p } => p,
            _ => DbscanParams::default().p,
        };
        DbscanParams {
            eps: self.eps,
            min_samples: self.min_samples,
            metric: self.metric.kind(),
            p,
            parallel: self.parallel,
        }
    }

    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        validate_eps(self.eps)?;
        validate_min_samples(self.min_samples)?;
        self.metric.validate()
    }

    /// Cluster `data` and compute centroids and inertia.
    ///
    /// Configuration, row lengths and coordinate finiteness are checked before
    /// any labeling work, so an error never comes with a partial result.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<DbscanFit> {
        self.validate()?;
        let n_features = check_dimensions(data)?;
        check_finite(data)?;

        debug!(
            n_points = data.len(),
            n_features,
            eps = self.eps,
            min_samples = self.min_samples,
            metric = ?self.metric,
            parallel = self.parallel,
            "starting DBSCAN fit"
        );

        let (labels, core) = self.label_points(data)?;
        let stats = ClusterStats::compute(data, &labels, self.metric)?;

        let fit = DbscanFit {
            labels,
            core,
            stats,
            n_features,
        };
        debug!(
            n_clusters = fit.n_clusters(),
            n_noise = fit.n_noise(),
            n_core = fit.core_sample_indices().len(),
            inertia = fit.inertia(),
            "DBSCAN fit complete"
        );
        Ok(fit)
    }

    /// Label every point and record which ones are core.
    fn label_points(&self, data: &[Vec<f32>]) -> Result<(Vec<Label>, Vec<bool>)> {
        let n = data.len();
        let query = RegionQuery::new(data, self.eps, self.metric).with_parallel(self.parallel);

        let mut labels = vec![UNVISITED; n];
        let mut core = vec![false; n];
        let mut next_cluster: Label = 0;

        for point_idx in 0..n {
            if labels[point_idx] != UNVISITED {
                continue;
            }

            let neighbors = query.region_query(point_idx)?;
            if neighbors.len() < self.min_samples {
                // Provisional: a later cluster may claim it as a border point.
                labels[point_idx] = NOISE;
                continue;
            }

            let cluster_id = next_cluster;
            next_cluster += 1;
            core[point_idx] = true;
            labels[point_idx] = cluster_id;

            let size =
                self.expand_cluster(&query, neighbors, &mut labels, &mut core, cluster_id)?;
            trace!(cluster_id, size, "expanded cluster");
        }

        debug_assert!(labels.iter().all(|&l| l != UNVISITED));
        Ok((labels, core))
    }

    /// Grow `cluster_id` from the neighborhood of its seed core point.
    ///
    /// Returns the number of points in the cluster.
    fn expand_cluster(
        &self,
        query: &RegionQuery<'_>,
        seeds: Vec<usize>,
        labels: &mut [Label],
        core: &mut [bool],
        cluster_id: Label,
    ) -> Result<usize> {
        let mut enqueued: HashSet<usize> = seeds.iter().copied().collect();
        let mut frontier: VecDeque<usize> = seeds.into();
        let mut size = 1;

        while let Some(idx) = frontier.pop_front() {
            match labels[idx] {
                NOISE => {
                    labels[idx] = cluster_id;
                    size += 1;
                    continue;
                }
                UNVISITED => {}
                _ => continue,
            }

            labels[idx] = cluster_id;
            size += 1;

            let neighbors = query.region_query(idx)?;
            if neighbors.len() >= self.min_samples {
                core[idx] = true;
                for nn in neighbors {
                    if enqueued.insert(nn) {
                        frontier.push_back(nn);
                    }
                }
            }
        }

        Ok(size)
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        let params = DbscanParams::default();
        Self::new(params.eps, params.min_samples)
    }
}

fn validate_eps(eps: f32) -> Result<()> {
    if eps.is_nan() || eps < 0.0 {
        return Err(Error::InvalidConfiguration {
            name: "eps",
            message: "must be non-negative",
        });
    }
    Ok(())
}

fn validate_min_samples(min_samples: usize) -> Result<()> {
    if min_samples == 0 {
        return Err(Error::InvalidConfiguration {
            name: "min_samples",
            message: "must be at least 1",
        });
    }
    Ok(())
}

/// Result of a DBSCAN fit.
///
/// Labels are index-aligned with the fitted points. Statistics are computed
/// once from those labels and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanFit {
    labels: Vec<Label>,
    core: Vec<bool>,
    stats: ClusterStats,
    n_features: usize,
}

impl DbscanFit {
    /// One label per point: a cluster id in `0..n_clusters()` or [`NOISE`].
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Consume the fit, keeping only the labels.
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }

    /// Number of clusters found.
    pub fn n_clusters(&self) -> usize {
        self.stats.n_clusters
    }

    /// Number of points labeled noise.
    pub fn n_noise(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE).count()
    }

    /// Centroid of each cluster, indexed by cluster id.
    pub fn centroids(&self) -> &[Vec<f32>] {
        &self.stats.centroids
    }

    /// Member count of each cluster, indexed by cluster id.
    pub fn cluster_sizes(&self) -> &[usize] {
        &self.stats.sizes
    }

    /// Sum of squared distances of clustered points to their centroid.
    pub fn inertia(&self) -> f32 {
        self.stats.inertia
    }

    /// Dimensionality of the fitted points (0 for an empty fit).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// All statistics at once.
    pub fn stats(&self) -> &ClusterStats {
        &self.stats
    }

    /// Whether point `idx` is a core point. `None` if out of range.
    pub fn is_core(&self, idx: usize) -> Option<bool> {
        self.core.get(idx).copied()
    }

    /// Indices of the core points, ascending.
    pub fn core_sample_indices(&self) -> Vec<usize> {
        self.core
            .iter()
            .enumerate()
            .filter_map(|(idx, &is_core)| is_core.then_some(idx))
            .collect()
    }
}

impl Clustering for Dbscan {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<Label>> {
        self.fit(data).map(DbscanFit::into_labels)
    }
}

/// DBSCAN labels with noise as `None`.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: Label) -> bool {
        label == NOISE
    }
}

impl DbscanExt for Dbscan {
    fn fit_predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .fit_predict(data)?
            .into_iter()
            .map(|l| usize::try_from(l).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f32]) -> Vec<Vec<f32>> {
        xs.iter().map(|&x| vec![x]).collect()
    }

    #[test]
    fn test_dbscan_two_clusters_on_a_line() {
        let data = line(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let fit = Dbscan::new(1.5, 2).fit(&data).unwrap();

        assert_eq!(fit.labels(), &[0, 0, 0, 1, 1, 1]);
        assert_eq!(fit.n_clusters(), 2);
        assert_eq!(fit.n_noise(), 0);
        assert_eq!(fit.centroids(), &[vec![1.0], vec![11.0]]);
        assert_eq!(fit.cluster_sizes(), &[3, 3]);
        // Each cluster: 1 + 0 + 1.
        assert!((fit.inertia() - 4.0).abs() < 1e-6);
        assert_eq!(fit.n_features(), 1);
    }

    #[test]
    fn test_dbscan_two_clusters_2d() {
        let data = vec![
            // Cluster 1: around (0, 0)
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![0.05, 0.05],
            // Cluster 2: around (5, 5)
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
            vec![5.05, 5.05],
        ];

        let labels = Dbscan::new(0.3, 3).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_dbscan_all_noise() {
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
            vec![10.5, 10.0],
        ];

        let fit = Dbscan::new(1.0, 3).fit(&data).unwrap();
        assert!(fit.labels().iter().all(|&l| l == NOISE));
        assert_eq!(fit.n_clusters(), 0);
        assert_eq!(fit.n_noise(), 5);
        assert!(fit.centroids().is_empty());
        assert_eq!(fit.inertia(), 0.0);
        assert!(fit.core_sample_indices().is_empty());
    }

    #[test]
    fn test_dbscan_reclaims_earlier_noise() {
        // Point 0 is scanned first and has too few neighbors; point 1 is core
        // and claims it as a border point.
        let data = line(&[0.0, 1.0, 2.0, 2.5]);
        let fit = Dbscan::new(1.0, 3).fit(&data).unwrap();

        assert_eq!(fit.labels(), &[0, 0, 0, 0]);
        assert_eq!(fit.core_sample_indices(), vec![1, 2]);
        assert_eq!(fit.is_core(0), Some(false));
        assert_eq!(fit.is_core(3), Some(false));
        assert_eq!(fit.is_core(4), None);
    }

    #[test]
    fn test_dbscan_border_point_keeps_first_cluster() {
        // Point 4 is a border point of both dense groups and core in neither.
        let data = line(&[0.0, 0.25, 0.5, 0.75, 1.625, 2.5, 2.75, 3.0, 3.25]);
        let fit = Dbscan::new(1.0, 4).fit(&data).unwrap();

        assert_eq!(fit.labels(), &[0, 0, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(fit.is_core(4), Some(false));
        assert_eq!(fit.cluster_sizes(), &[5, 4]);
    }

    #[test]
    fn test_dbscan_inclusive_boundary() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let fit = Dbscan::new(5.0, 2).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[0, 0]);

        let fit = Dbscan::new(4.99, 2).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[NOISE, NOISE]);
    }

    #[test]
    fn test_dbscan_min_samples_one_makes_every_point_core() {
        let data = line(&[0.0, 10.0, 20.0]);
        let fit = Dbscan::new(0.0, 1).fit(&data).unwrap();
        assert_eq!(fit.labels(), &[0, 1, 2]);
        assert_eq!(fit.core_sample_indices(), vec![0, 1, 2]);
        assert_eq!(fit.inertia(), 0.0);
    }

    #[test]
    fn test_dbscan_chain() {
        let data: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32 * 0.3, 0.0]).collect();
        let labels = Dbscan::new(0.5, 2).fit_predict(&data).unwrap();
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_dbscan_manhattan_metric() {
        // Diagonal neighbors are 2.0 apart under Manhattan, ~1.41 under Euclidean.
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];

        let euclid = Dbscan::new(1.5, 2).fit(&data).unwrap();
        assert_eq!(euclid.n_clusters(), 1);

        let manhattan = Dbscan::new(1.5, 2)
            .with_metric(Metric::Manhattan)
            .fit(&data)
            .unwrap();
        assert_eq!(manhattan.n_clusters(), 0);
    }

    #[test]
    fn test_dbscan_minkowski_inertia_uses_metric() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let metric = Metric::minkowski(1.0).unwrap();
        let fit = Dbscan::new(2.0, 2).with_metric(metric).fit(&data).unwrap();
        assert_eq!(fit.centroids(), &[vec![0.5, 0.5]]);
        // Each point is 1.0 away under p = 1.
        assert!((fit.inertia() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_dbscan_empty() {
        let data: Vec<Vec<f32>> = vec![];
        let fit = Dbscan::new(0.5, 3).fit(&data).unwrap();
        assert!(fit.labels().is_empty());
        assert_eq!(fit.n_clusters(), 0);
        assert_eq!(fit.n_features(), 0);
        assert_eq!(fit.inertia(), 0.0);
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        let err = Dbscan::new(-1.0, 3).fit(&data).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { name: "eps", .. }));

        assert!(Dbscan::new(f32::NAN, 3).fit(&data).is_err());

        let err = Dbscan::new(0.5, 0).fit(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfiguration {
                name: "min_samples",
                ..
            }
        ));

        let err = Dbscan::new(0.5, 2)
            .with_metric(Metric::Minkowski { p: 0.0 })
            .fit(&data)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { name: "p", .. }));

        // Zero radius is valid.
        assert!(Dbscan::new(0.0, 1).fit(&data).is_ok());
    }

    #[test]
    fn test_dbscan_invalid_params_win_over_bad_data() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let err = Dbscan::new(-1.0, 3).fit(&data).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_dbscan_ragged_rows() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0]];
        let err = Dbscan::new(0.5, 2).fit(&data).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_dbscan_rejects_non_finite_coordinates() {
        // With min_samples = 1 every finite point is core; a NaN point would
        // otherwise come out as noise.
        let data = vec![vec![0.0, 0.0], vec![f32::NAN, 1.0], vec![2.0, 2.0]];
        let err = Dbscan::new(0.5, 1).fit(&data).unwrap_err();
        assert_eq!(
            err,
            Error::NonFiniteCoordinate {
                point: 1,
                feature: 0
            }
        );

        let data = vec![vec![0.0], vec![f32::INFINITY]];
        assert!(matches!(
            Dbscan::new(0.5, 1).fit(&data),
            Err(Error::NonFiniteCoordinate { point: 1, .. })
        ));
    }

    #[test]
    fn test_dbscan_parallel_matches_sequential() {
        let data: Vec<Vec<f32>> = (0..120)
            .map(|i| {
                let group = (i % 3) as f32 * 10.0;
                vec![group + (i % 7) as f32 * 0.2, group - (i % 5) as f32 * 0.2]
            })
            .collect();

        let seq = Dbscan::new(0.5, 4).fit(&data).unwrap();
        let par = Dbscan::new(0.5, 4).with_parallel(true).fit(&data).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_fit_predict_with_noise() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![100.0, 100.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ];

        let labels = Dbscan::new(0.3, 3).fit_predict_with_noise(&data).unwrap();
        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(0), None, Some(1), Some(1), Some(1)]
        );
        assert!(<Dbscan as DbscanExt>::is_noise(NOISE));
        assert!(!<Dbscan as DbscanExt>::is_noise(0));
    }

    #[test]
    fn test_params_round_trip() {
        let params = DbscanParams {
            eps: 0.3,
            min_samples: 10,
            metric: MetricKind::Minkowski,
            p: 3.0,
            parallel: true,
        };
        let dbscan = Dbscan::from_params(&params).unwrap();
        assert_eq!(dbscan.metric(), Metric::Minkowski { p: 3.0 });
        assert_eq!(dbscan.params(), params);

        let json = serde_json::to_string(&params).unwrap();
        let back: DbscanParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_params_defaults_and_validation() {
        let params: DbscanParams =
            serde_json::from_str(r#"{"eps": 0.25, "min_samples": 3}"#).unwrap();
        assert_eq!(params.metric, MetricKind::Euclidean);
        assert_eq!(params.p, 2.0);
        assert!(!params.parallel);

        let dbscan = Dbscan::from_params(&params).unwrap();
        assert_eq!(dbscan.eps(), 0.25);
        assert_eq!(dbscan.min_samples(), 3);

        let bad: DbscanParams =
            serde_json::from_str(r#"{"metric": "minkowski", "p": -2.0}"#).unwrap();
        assert!(Dbscan::from_params(&bad).is_err());

        assert_eq!(Dbscan::default().params(), DbscanParams::default());
    }
}
