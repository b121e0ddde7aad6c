//! Inverse-distance "kriging factors" between two point sets.
//!
//! No variogram is fitted: a source's weight is `1 / distance`, normalized so
//! each target's row sums to one. A source that sits exactly on the target
//! takes the whole weight (shared equally when several coincide).

use rayon::prelude::*;

use crate::error::CalibError;
use crate::model::{KrigeFactorRow, SpatialPoint};

/// Compute one weight row per target, aligned with the order of `sources`.
pub fn compute_weights(
    targets: &[SpatialPoint],
    sources: &[SpatialPoint],
) -> Result<Vec<KrigeFactorRow>, CalibError> {
    if sources.is_empty() {
        return Err(CalibError::NoSourcePoints);
    }

    let rows: Vec<KrigeFactorRow> = targets
        .par_iter()
        .map(|target| {
            let distances: Vec<f64> = sources.iter().map(|s| target.distance_to(s)).collect();
            KrigeFactorRow {
                target_id: target.id.clone(),
                weights: inverse_distance_weights(&distances, 1),
            }
        })
        .collect();

    log::debug!(
        "computed {} factor rows against {} source points",
        rows.len(),
        sources.len()
    );
    Ok(rows)
}

/// Normalized `1 / d^power` weights. Zero distances snap to an exact match.
pub(crate) fn inverse_distance_weights(distances: &[f64], power: i32) -> Vec<f64> {
    let coincident = distances.iter().filter(|d| **d == 0.0).count();
    if coincident > 0 {
        let share = 1.0 / coincident as f64;
        return distances
            .iter()
            .map(|d| if *d == 0.0 { share } else { 0.0 })
            .collect();
    }

    let raw: Vec<f64> = distances.iter().map(|d| d.powi(power).recip()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}
