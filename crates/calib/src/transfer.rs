use crate::error::CalibError;
use crate::krige::compute_weights;
use crate::model::SpatialPoint;

/// Transfer source values onto targets with inverse-distance weights.
///
/// The result has one value per target, in target order. Every source must
/// carry a value.
pub fn transfer(targets: &[SpatialPoint], sources: &[SpatialPoint]) -> Result<Vec<f64>, CalibError> {
    let values = source_values(sources)?;
    let rows = compute_weights(targets, sources)?;
    Ok(rows.iter().map(|row| row.apply(&values)).collect())
}

/// Like [`transfer`], returning the targets with their transferred values attached.
pub fn transfer_onto(
    targets: &[SpatialPoint],
    sources: &[SpatialPoint],
) -> Result<Vec<SpatialPoint>, CalibError> {
    let values = transfer(targets, sources)?;
    Ok(targets
        .iter()
        .zip(values)
        .map(|(t, v)| SpatialPoint::with_value(t.id.clone(), t.x, t.y, v))
        .collect())
}

fn source_values(sources: &[SpatialPoint]) -> Result<Vec<f64>, CalibError> {
    sources
        .iter()
        .map(|s| s.value.ok_or_else(|| CalibError::MissingPointValue { id: s.id.clone() }))
        .collect()
}
