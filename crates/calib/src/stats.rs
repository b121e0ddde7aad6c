use std::collections::BTreeMap;

use crate::model::{MatchedRecord, SiteKey, SiteStats};

/// Site key used for the statistics row over every matched record.
pub const OVERALL_SITE: &str = "all";

/// Root-mean-square of residuals. Zero for an empty slice.
pub fn rmse(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    let mean_sq = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
    mean_sq.sqrt()
}

/// Mean residual. Zero for an empty slice.
pub fn bias(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    residuals.iter().sum::<f64>() / residuals.len() as f64
}

/// Group matched records by site and compute RMSE, bias and count for each.
///
/// Residuals are `observed - simulated`. Output is sorted by site key; only
/// sites with at least one record appear.
pub fn aggregate(records: &[MatchedRecord]) -> Vec<SiteStats> {
    let mut groups: BTreeMap<&SiteKey, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(&r.site).or_default().push(r.observed - r.simulated);
    }

    groups
        .into_iter()
        .map(|(site, residuals)| site_stats(site.clone(), &residuals))
        .collect()
}

/// Statistics over every record regardless of site, or `None` when there are none.
pub fn overall(records: &[MatchedRecord]) -> Option<SiteStats> {
    if records.is_empty() {
        return None;
    }
    let residuals: Vec<f64> = records.iter().map(|r| r.observed - r.simulated).collect();
    Some(site_stats(SiteKey::new(OVERALL_SITE), &residuals))
}

fn site_stats(site: SiteKey, residuals: &[f64]) -> SiteStats {
    SiteStats {
        site,
        rmse: rmse(residuals),
        bias: bias(residuals),
        count: residuals.len(),
    }
}
