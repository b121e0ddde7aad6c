use std::collections::{BTreeMap, HashMap};

use crate::config::MatchingConfig;
use crate::error::CalibError;
use crate::interp::{sim_equiv, timestep};
use crate::model::{
    MatchOutput, MatchedRecord, MissingSites, Observation, SimulatedSeries, SiteKey, WellIndex,
};
use crate::reconcile::reconcile;

/// Match observations against simulated output.
///
/// Each observation ends in one of three states:
/// - its site has no well metadata: dropped, counted, and listed in `missing.obs_only`;
/// - its date is outside the simulated period: dropped into `out_of_range`;
/// - otherwise the simulated value is interpolated onto the observation date.
///
/// Observations may arrive in any order. A well whose column has no simulated
/// series fails the whole pass.
pub fn match_observations(
    observations: &[Observation],
    wells: &WellIndex,
    series: &[SimulatedSeries],
    options: &MatchingConfig,
) -> Result<MatchOutput, CalibError> {
    let by_column: HashMap<usize, &SimulatedSeries> =
        series.iter().map(|s| (s.column(), s)).collect();

    let sim_sites: Vec<SiteKey> = wells.keys().cloned().collect();
    let obs_sites: Vec<SiteKey> = observations.iter().map(|o| o.site.clone()).collect();
    let (sim_only, obs_only) = reconcile(&sim_sites, &obs_sites);
    for site in &obs_only {
        log::debug!("observation site '{site}' has no well metadata; dropped");
    }

    let mut matched = Vec::new();
    let mut out_of_range = Vec::new();
    let mut unmatched_site_count = 0;
    let mut per_site: BTreeMap<SiteKey, usize> = BTreeMap::new();

    for obs in observations {
        let Some(well) = wells.get(&obs.site) else {
            unmatched_site_count += 1;
            continue;
        };
        let sim = by_column.get(&well.column).ok_or_else(|| CalibError::UnknownColumn {
            site: obs.site.to_string(),
            column: well.column,
        })?;

        let count = per_site.entry(obs.site.clone()).or_insert(0);
        let equiv = sim_equiv(sim, obs.date, options.round_decimals);
        match equiv.zip(timestep(sim.dates(), obs.date)) {
            Some((simulated, step)) => {
                *count += 1;
                matched.push(MatchedRecord {
                    site: obs.site.clone(),
                    date: obs.date,
                    observed: obs.value,
                    simulated,
                    difference: obs.value - simulated,
                    timestep: step,
                });
            }
            None => out_of_range.push(obs.clone()),
        }
    }

    let sites_without_matches: Vec<SiteKey> = per_site
        .into_iter()
        .filter(|(_, n)| *n == 0)
        .map(|(site, _)| site)
        .collect();
    for site in &sites_without_matches {
        log::warn!("site '{site}' has no observations inside the simulated period");
    }

    log::info!(
        "matched {} of {} observations ({} unknown site, {} out of range)",
        matched.len(),
        observations.len(),
        unmatched_site_count,
        out_of_range.len()
    );

    Ok(MatchOutput {
        matched,
        missing: MissingSites { sim_only, obs_only },
        unmatched_site_count,
        out_of_range,
        sites_without_matches,
    })
}
