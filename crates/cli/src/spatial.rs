//! `calib krige`, `transfer`, `ppk2fac`, `fac-trans`, `fac2iwfm`: point-to-point weights.

use std::path::PathBuf;

use iwfm_calib::config::FactorConfig;
use iwfm_calib::krige::compute_weights;
use iwfm_calib::pilot::{apply_factors, pilot_point_factors};
use iwfm_calib::timing::Stopwatch;
use iwfm_calib::transfer::transfer_onto;
use iwfm_calib_io::factors::{
    format_factor_file, format_node_values, read_factor_file, read_parameter_values, read_translation,
    translate_factor_file,
};
use iwfm_calib_io::points::{format_factor_rows, format_points, read_points};
use iwfm_calib_io::text::{read_file_as_utf8, write_file};

use crate::{emit, CliError};

pub fn cmd_krige(targets: PathBuf, sources: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let targets = read_points(&targets)?;
    let sources = read_points(&sources)?;
    let rows = compute_weights(&targets, &sources)?;
    emit(output.as_deref(), &format_factor_rows(&rows, &sources))
}

pub fn cmd_transfer(targets: PathBuf, sources: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let targets = read_points(&targets)?;
    let sources = read_points(&sources)?;
    let transferred = transfer_onto(&targets, &sources)?;
    emit(output.as_deref(), &format_points(&transferred))
}

pub fn cmd_ppk2fac(
    pp_path: PathBuf,
    nodes_path: PathBuf,
    output: PathBuf,
    points: usize,
) -> Result<(), CliError> {
    let mut stopwatch = Stopwatch::start();

    let pilot_points = read_points(&pp_path)?;
    log::info!("read {} pilot points from {}", pilot_points.len(), pp_path.display());
    let nodes = read_points(&nodes_path)?;
    log::info!("read {} nodes from {}", nodes.len(), nodes_path.display());
    stopwatch.log_lap("read points");

    let factors = pilot_point_factors(&nodes, &pilot_points, &FactorConfig::with_points(points))?;
    stopwatch.log_lap("compute factors");

    let pp_name = pp_path.display().to_string();
    write_file(&output, &format_factor_file(&pp_name, &pilot_points, &factors))?;
    eprintln!(
        "wrote {} node factors to {} in {:.2}s",
        factors.len(),
        output.display(),
        stopwatch.elapsed().as_secs_f64()
    );
    Ok(())
}

pub fn cmd_fac_trans(factors: PathBuf, translation: PathBuf, output: PathBuf) -> Result<(), CliError> {
    let table = read_translation(&translation)?;
    let content = read_file_as_utf8(&factors)?;
    let translated = translate_factor_file(&content, &factors.display().to_string(), &table)?;
    write_file(&output, &translated)?;
    eprintln!("wrote {}", output.display());
    Ok(())
}

pub fn cmd_fac2iwfm(factors: PathBuf, values: PathBuf, output: Option<PathBuf>) -> Result<(), CliError> {
    let factors = read_factor_file(&factors)?;
    let values = read_parameter_values(&values)?;
    log::info!("applying {} pilot point values to {} nodes", values.len(), factors.len());
    let nodes = apply_factors(&factors, &values)?;
    emit(output.as_deref(), &format_node_values(&nodes))
}
