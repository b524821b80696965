//! Epsilon-neighborhood queries by brute-force scan.
//!
//! Each query visits every point, so one query costs O(n·d) and a full DBSCAN
//! run costs O(n²·d) in the worst case.

use rayon::prelude::*;

use super::metric::Metric;
use crate::error::Result;

/// Radius query over a fixed point set.
#[derive(Debug, Clone, Copy)]
pub struct RegionQuery<'a> {
    data: &'a [Vec<f32>],
    eps: f32,
    metric: Metric,
    parallel: bool,
}

impl<'a> RegionQuery<'a> {
    /// Query `data` with radius `eps` under `metric`.
    pub fn new(data: &'a [Vec<f32>], eps: f32, metric: Metric) -> Self {
        Self {
            data,
            eps,
            metric,
            parallel: false,
        }
    }

    /// Scan the point set with a rayon parallel iterator.
    ///
    /// Results are identical to the sequential scan.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Indices of every point within `eps` of `data[point_idx]`, ascending.
    ///
    /// The boundary is inclusive and the query point is its own neighbor as
    /// long as its coordinates are finite. A NaN is never within `eps` of
    /// anything; [`Dbscan::fit`](super::Dbscan::fit) rejects such input up front.
    ///
    /// # Panics
    ///
    /// Panics if `point_idx` is out of bounds.
    pub fn region_query(&self, point_idx: usize) -> Result<Vec<usize>> {
        self.within(&self.data[point_idx])
    }

    /// Indices of every point within `eps` of an arbitrary `point`, ascending.
    pub fn within(&self, point: &[f32]) -> Result<Vec<usize>> {
        if self.parallel {
            let hits = self
                .data
                .par_iter()
                .enumerate()
                .map(|(idx, other)| self.hit(point, idx, other))
                .collect::<Result<Vec<Option<usize>>>>()?;
            Ok(hits.into_iter().flatten().collect())
        } else {
            let mut neighbors = Vec::new();
            for (idx, other) in self.data.iter().enumerate() {
                if let Some(idx) = self.hit(point, idx, other)? {
                    neighbors.push(idx);
                }
            }
            Ok(neighbors)
        }
    }

    #[inline]
    fn hit(&self, point: &[f32], idx: usize, other: &[f32]) -> Result<Option<usize>> {
        let dist = self.metric.distance(point, other)?;
        Ok((dist <= self.eps).then_some(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn line(xs: &[f32]) -> Vec<Vec<f32>> {
        xs.iter().map(|&x| vec![x]).collect()
    }

    #[test]
    fn test_includes_self_and_is_ordered() {
        let data = line(&[5.0, 0.0, 4.5, 100.0, 5.5]);
        let query = RegionQuery::new(&data, 0.5, Metric::Euclidean);
        assert_eq!(query.region_query(0).unwrap(), vec![0, 2, 4]);
        assert_eq!(query.region_query(3).unwrap(), vec![3]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let query = RegionQuery::new(&data, 5.0, Metric::Euclidean);
        assert_eq!(query.region_query(0).unwrap(), vec![0, 1]);

        let query = RegionQuery::new(&data, 4.999, Metric::Euclidean);
        assert_eq!(query.region_query(0).unwrap(), vec![0]);
    }

    #[test]
    fn test_zero_radius_keeps_duplicates() {
        let data = line(&[1.0, 2.0, 1.0]);
        let query = RegionQuery::new(&data, 0.0, Metric::Manhattan);
        assert_eq!(query.region_query(0).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data: Vec<Vec<f32>> = (0..200)
            .map(|i| vec![(i % 17) as f32 * 0.3, (i % 5) as f32])
            .collect();
        let seq = RegionQuery::new(&data, 1.0, Metric::Manhattan);
        let par = seq.with_parallel(true);
        for idx in 0..data.len() {
            assert_eq!(seq.region_query(idx).unwrap(), par.region_query(idx).unwrap());
        }
    }

    #[test]
    fn test_ragged_rows_fail() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let query = RegionQuery::new(&data, 1.0, Metric::Euclidean);
        assert!(matches!(
            query.region_query(0),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            query.with_parallel(true).region_query(0),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
