use crate::config::CalibConfig;
use crate::error::CalibError;
use crate::matcher::match_observations;
use crate::model::{CalibInput, CalibMeta, CalibResult, CalibSummary};
use crate::stats::{aggregate, overall};
use crate::timing::Stopwatch;

/// Run one calibration pass per config. Returns matched records + statistics.
///
/// All-or-nothing: any error aborts the pass with no partial result.
pub fn run(config: &CalibConfig, input: &CalibInput) -> Result<CalibResult, CalibError> {
    let mut stopwatch = Stopwatch::start();

    let matched = match_observations(
        &input.observations,
        &input.wells,
        &input.series,
        &config.matching,
    )?;
    stopwatch.log_lap("match observations");

    let stats = aggregate(&matched.matched);
    let overall = overall(&matched.matched);
    stopwatch.log_lap("aggregate statistics");

    let summary = CalibSummary {
        observations: input.observations.len(),
        matched: matched.matched.len(),
        unmatched_site_observations: matched.unmatched_site_count,
        out_of_range_observations: matched.out_of_range.len(),
        sites_with_stats: stats.len(),
        sites_without_matches: matched.sites_without_matches.len(),
    };

    log::info!(
        "calibration '{}' finished in {:.3}s",
        config.name,
        stopwatch.elapsed().as_secs_f64()
    );

    Ok(CalibResult {
        meta: CalibMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        stats,
        overall,
        missing: matched.missing,
        sites_without_matches: matched.sites_without_matches,
        matched: matched.matched,
    })
}
