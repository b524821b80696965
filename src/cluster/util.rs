use super::dbscan::Label;
use crate::error::{Error, Result};

/// Check that every row has the same length and return it.
///
/// An empty point set has dimensionality 0.
pub(crate) fn check_dimensions(data: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let expected = first.len();
    match data.iter().find(|row| row.len() != expected) {
        Some(row) => Err(Error::DimensionMismatch {
            expected,
            found: row.len(),
        }),
        None => Ok(expected),
    }
}

/// Check that every coordinate is finite.
///
/// A NaN coordinate makes a point's distance to itself NaN, so it would fall
/// outside its own neighborhood.
pub(crate) fn check_finite(data: &[Vec<f32>]) -> Result<()> {
    for (point, row) in data.iter().enumerate() {
        if let Some(feature) = row.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteCoordinate { point, feature });
        }
    }
    Ok(())
}

/// Check that `labels` is index-aligned with `data`.
pub(crate) fn check_label_count(data: &[Vec<f32>], labels: &[Label]) -> Result<()> {
    if data.len() != labels.len() {
        return Err(Error::LabelCountMismatch {
            points: data.len(),
            labels: labels.len(),
        });
    }
    Ok(())
}
