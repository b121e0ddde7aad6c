//! `calib run` / `calib validate`: config-driven calibration pass.

use std::path::{Path, PathBuf};

use iwfm_calib::model::CalibInput;
use iwfm_calib::{CalibConfig, CalibError};
use iwfm_calib_io::{read_hydrographs, read_smp, read_wells};
use iwfm_calib_io::report::{append_missing_sites, write_matched_records, write_stats_report};
use iwfm_calib_io::smp::{format_simulated, format_simulated_ins};
use iwfm_calib_io::text::write_file;

use crate::CliError;

fn load_config(config_path: &Path) -> Result<CalibConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| CliError::io(config_path, e))?;
    Ok(CalibConfig::from_toml(&config_str)?)
}

/// Input errors name a path that may be relative to the config directory.
fn with_path_hint(err: CalibError) -> CliError {
    let is_io = matches!(err, CalibError::Io { .. });
    let cli_err = CliError::from(err);
    if is_io {
        cli_err.with_hint("paths in the config are relative to the config file's directory")
    } else {
        cli_err
    }
}

pub fn cmd_run(config_path: PathBuf, json_output: bool, output_file: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let obs_path = base_dir.join(&config.inputs.observations);

    let input = CalibInput {
        observations: read_smp(&obs_path).map_err(with_path_hint)?,
        wells: read_wells(&base_dir.join(&config.inputs.wells)).map_err(with_path_hint)?,
        series: read_hydrographs(
            &base_dir.join(&config.inputs.hydrographs),
            config.hydrograph.header_lines,
        )
        .map_err(with_path_hint)?,
    };

    let result = iwfm_calib::run(&config, &input)?;

    // Configured reports
    let out = &config.output;
    if let Some(ref stats) = out.stats {
        let path = base_dir.join(stats);
        let rows = write_stats_report(&path, &result.stats, &input.wells, out.delimiter.as_byte())?;
        eprintln!("wrote {} ({rows} wells)", path.display());
    }
    if let Some(ref missing) = out.missing {
        let path = base_dir.join(missing);
        if append_missing_sites(&path, &config.inputs.observations, &result.missing.obs_only)? {
            eprintln!("appended {} missing sites to {}", result.missing.obs_only.len(), path.display());
        }
    }
    if let Some(ref matched) = out.matched {
        let path = base_dir.join(matched);
        write_matched_records(&path, &result.matched, out.delimiter.as_byte())?;
        eprintln!("wrote {} ({} observations)", path.display(), result.matched.len());
    }
    if let Some(ref smp) = out.smp {
        let path = base_dir.join(smp);
        let ins_path = path.with_extension("ins");
        write_file(&path, &format_simulated(&result.matched))?;
        write_file(&ins_path, &format_simulated_ins(&result.matched))?;
        eprintln!("wrote {} and {}", path.display(), ins_path.display());
    }

    // JSON
    let json_str = serde_json::to_string_pretty(&result).map_err(CliError::json)?;
    for path in out.json.iter().map(|p| base_dir.join(p)).chain(output_file) {
        write_file(&path, &json_str)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "calibration '{}': {} observations, {} matched, {} unknown site, {} outside simulated period",
        result.meta.config_name,
        s.observations,
        s.matched,
        s.unmatched_site_observations,
        s.out_of_range_observations,
    );
    if let Some(ref overall) = result.overall {
        eprintln!(
            "  {} wells: RMSE {:.2}, bias {:.2}",
            s.sites_with_stats, overall.rmse, overall.bias
        );
    }
    if !result.sites_without_matches.is_empty() {
        eprintln!(
            "  {} wells had no observations inside the simulated period",
            result.sites_without_matches.len()
        );
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let rounding = match config.matching.round_decimals {
        Some(d) => format!("rounded to {d} decimals"),
        None => "unrounded".to_string(),
    };
    eprintln!(
        "valid: calibration '{}' ({}, {} hydrograph header lines, {rounding})",
        config.name, config.inputs.observations, config.hydrograph.header_lines,
    );
    Ok(())
}
