use rayon::prelude::*;

use crate::config::FactorConfig;
use crate::error::CalibError;
use crate::krige::inverse_distance_weights;
use crate::model::{PilotPointFactors, SpatialPoint};

/// Inverse-distance-squared factors from each target to its nearest pilot points.
///
/// Used to spread pilot-point parameter values onto model nodes. Each target
/// gets `config.n_points` entries, nearest first, with weights summing to one.
pub fn pilot_point_factors(
    targets: &[SpatialPoint],
    pilot_points: &[SpatialPoint],
    config: &FactorConfig,
) -> Result<Vec<PilotPointFactors>, CalibError> {
    config.validate()?;
    if pilot_points.is_empty() {
        return Err(CalibError::NoSourcePoints);
    }
    if config.n_points > pilot_points.len() {
        return Err(CalibError::ConfigValidation(format!(
            "n_points = {} but only {} pilot points were given",
            config.n_points,
            pilot_points.len()
        )));
    }

    let factors = targets
        .par_iter()
        .map(|target| {
            let mut by_distance: Vec<(usize, f64)> = pilot_points
                .iter()
                .enumerate()
                .map(|(i, pp)| (i, target.distance_to(pp)))
                .collect();
            by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
            by_distance.truncate(config.n_points);

            let distances: Vec<f64> = by_distance.iter().map(|(_, d)| *d).collect();
            let weights = inverse_distance_weights(&distances, 2);
            PilotPointFactors {
                target_id: target.id.clone(),
                entries: by_distance.iter().map(|(i, _)| *i).zip(weights).collect(),
            }
        })
        .collect();

    Ok(factors)
}

/// Spread pilot-point parameter values onto targets through their factors.
///
/// `values` is indexed like the pilot-point list the factors were built
/// from. Returns `(target_id, value)` in factor order.
pub fn apply_factors(factors: &[PilotPointFactors], values: &[f64]) -> Result<Vec<(String, f64)>, CalibError> {
    factors
        .iter()
        .map(|f| {
            let mut total = 0.0;
            for &(index, weight) in &f.entries {
                let value = values.get(index).ok_or_else(|| CalibError::UnknownPilotPoint {
                    target: f.target_id.clone(),
                    index: index + 1,
                    count: values.len(),
                })?;
                total += value * weight;
            }
            Ok((f.target_id.clone(), total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<SpatialPoint> {
        vec![
            SpatialPoint::new("pp1", 0.0, 0.0),
            SpatialPoint::new("pp2", 10.0, 0.0),
            SpatialPoint::new("pp3", 0.0, 10.0),
            SpatialPoint::new("pp4", 100.0, 100.0),
        ]
    }

    #[test]
    fn nearest_points_first() {
        let targets = vec![SpatialPoint::new("n1", 1.0, 0.0)];
        let factors = pilot_point_factors(&targets, &grid(), &FactorConfig::default()).unwrap();
        assert_eq!(factors.len(), 1);
        let entries = &factors[0].entries;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, 0);
        assert_eq!(entries[1].0, 1);
        assert_eq!(entries[2].0, 2);
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(entries[0].1 > entries[1].1 && entries[1].1 > entries[2].1);
    }

    #[test]
    fn inverse_square_ratio() {
        // distances 1 and 2 (and a far third)
        let pps = vec![
            SpatialPoint::new("a", 1.0, 0.0),
            SpatialPoint::new("b", -2.0, 0.0),
            SpatialPoint::new("c", 0.0, 50.0),
        ];
        let targets = vec![SpatialPoint::new("n", 0.0, 0.0)];
        let f = pilot_point_factors(&targets, &pps, &FactorConfig::default()).unwrap();
        let w = &f[0].entries;
        assert!((w[0].1 / w[1].1 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn node_on_a_pilot_point() {
        let targets = vec![SpatialPoint::new("n", 10.0, 0.0)];
        let f = pilot_point_factors(&targets, &grid(), &FactorConfig::default()).unwrap();
        assert_eq!(f[0].entries[0], (1, 1.0));
        assert_eq!(f[0].entries[1].1, 0.0);
        assert_eq!(f[0].entries[2].1, 0.0);
    }

    #[test]
    fn too_few_pilot_points() {
        let targets = vec![SpatialPoint::new("n", 0.0, 0.0)];
        let err = pilot_point_factors(&targets, &grid()[..2], &FactorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("only 2 pilot points"));
    }

    #[test]
    fn factors_spread_values() {
        let factors = vec![
            PilotPointFactors {
                target_id: "1".into(),
                entries: vec![(0, 1.0)],
            },
            PilotPointFactors {
                target_id: "2".into(),
                entries: vec![(0, 0.5), (1, 0.5)],
            },
        ];
        let out = apply_factors(&factors, &[100.0, 200.0]).unwrap();
        assert_eq!(out, vec![("1".to_string(), 100.0), ("2".to_string(), 150.0)]);

        let err = apply_factors(&factors, &[100.0]).unwrap_err();
        assert!(matches!(err, CalibError::UnknownPilotPoint { index: 2, count: 1, .. }));
    }

    #[test]
    fn computed_factors_reproduce_a_flat_field() {
        let targets = vec![SpatialPoint::new("n1", 3.0, 4.0), SpatialPoint::new("n2", 50.0, 60.0)];
        let factors = pilot_point_factors(&targets, &grid(), &FactorConfig::default()).unwrap();
        for (_, v) in apply_factors(&factors, &[7.0; 4]).unwrap() {
            assert!((v - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn count_outside_configured_range() {
        let targets = vec![SpatialPoint::new("n", 0.0, 0.0)];
        let err = pilot_point_factors(&targets, &grid(), &FactorConfig::with_points(1)).unwrap_err();
        assert!(matches!(err, CalibError::ConfigValidation(_)));
    }
}
