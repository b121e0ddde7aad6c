//! `calib headdiff`, `smp-ins`, `smp-fmt`, `exe-time`: PEST observation helpers.

use std::path::PathBuf;

use iwfm_calib::headdiff::match_well_pairs;
use iwfm_calib::interp::timestep;
use iwfm_calib_io::exe_time::{extract_run_time, NOT_FOUND};
use iwfm_calib_io::report::write_head_diffs;
use iwfm_calib_io::smp::{format_ins, format_observations, reformat_smp};
use iwfm_calib_io::text::{read_file_as_utf8, write_file};
use iwfm_calib_io::wells::{read_obs_csv, read_well_pairs};
use iwfm_calib_io::{read_hydrographs, read_smp};

use crate::exit_codes::EXIT_NO_RUN_TIME;
use crate::{emit, CliError};

pub fn cmd_headdiff(
    pairs_path: PathBuf,
    obs_path: PathBuf,
    days: u32,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let pairs = read_well_pairs(&pairs_path)?;
    let observations = read_obs_csv(&obs_path)?;
    let diffs = match_well_pairs(&pairs, &observations, days);

    let output = output.unwrap_or_else(|| obs_path.with_file_name("head_diffs.csv"));
    write_head_diffs(&output, &diffs)?;
    eprintln!(
        "wrote {} head differences for {} well pairs to {}",
        diffs.len(),
        pairs.len(),
        output.display()
    );
    Ok(())
}

/// Observations are numbered by the model timestep they fall in; those
/// outside the simulated period are left out of both files.
pub fn cmd_smp_ins(
    obs_path: PathBuf,
    hydrographs: PathBuf,
    header_lines: usize,
    smp_path: PathBuf,
    ins_path: PathBuf,
) -> Result<(), CliError> {
    let observations = read_smp(&obs_path)?;
    let series = read_hydrographs(&hydrographs, header_lines)?;
    let dates = series.first().map(|s| s.dates()).unwrap_or_default();

    let mut kept = Vec::with_capacity(observations.len());
    let mut steps = Vec::with_capacity(observations.len());
    for obs in observations {
        match timestep(dates, obs.date) {
            Some(step) => {
                kept.push(obs);
                steps.push(step);
            }
            None => log::warn!(
                "{} {}: outside the simulated period; left out",
                obs.site,
                obs.date.format("%m/%d/%Y")
            ),
        }
    }

    write_file(&smp_path, &format_observations(&kept))?;
    let rows = kept.iter().map(|o| o.site.name()).zip(steps.iter().copied());
    write_file(&ins_path, &format_ins(rows))?;
    eprintln!(
        "wrote {} observations to {} and {}",
        kept.len(),
        smp_path.display(),
        ins_path.display()
    );
    Ok(())
}

pub fn cmd_smp_fmt(input: PathBuf, width: usize, output: Option<PathBuf>) -> Result<(), CliError> {
    let content = read_file_as_utf8(&input)?;
    let formatted = reformat_smp(&content, &input.display().to_string(), width)?;
    emit(output.as_deref(), &formatted)
}

pub fn cmd_exe_time(messages: PathBuf, output: PathBuf) -> Result<(), CliError> {
    let seconds = extract_run_time(&messages, &output)?;
    if seconds == NOT_FOUND {
        return Err(CliError::new(
            EXIT_NO_RUN_TIME,
            format!("no TOTAL RUN TIME line in {}", messages.display()),
        )
        .with_hint(format!("{} records the missing value", output.display())));
    }
    eprintln!("run time {seconds} s");
    Ok(())
}
