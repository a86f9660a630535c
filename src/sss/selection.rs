use thiserror::Error;

use super::Point;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("threshold must be at least 1")]
    ZeroThreshold,
    #[error("insufficient points: {required} required, {available} available")]
    InsufficientPoints { required: usize, available: usize },
}

/// Outcome of a selection: the points used for interpolation and the ones left aside.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<Y> {
    /// Exactly `k` points, ascending by x.
    pub selected: Vec<Point<Y>>,
    /// Remaining points, ascending by x.
    pub unused: Vec<Point<Y>>,
}

/// Sorts the points by ascending x and keeps the first `k` of them.
///
/// This is a fixed, deterministic policy. It does not look for the subset that best
/// tolerates corrupted shares.
pub fn select<Y>(points: Vec<Point<Y>>, k: usize) -> Result<Selection<Y>, SelectionError> {
    if k == 0 {
        return Err(SelectionError::ZeroThreshold);
    }
    if points.len() < k {
        return Err(SelectionError::InsufficientPoints {
            required: k,
            available: points.len(),
        });
    }

    let mut selected = points;
    selected.sort_by_key(|p| p.x);
    let unused = selected.split_off(k);
    Ok(Selection { selected, unused })
}
