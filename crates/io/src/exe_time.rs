// Simulation run time from an IWFM messages file, as a PEST sample

use std::path::Path;

use chrono::NaiveDate;
use iwfm_calib::CalibError;

use crate::smp::format_smp_line;
use crate::text::{read_file_as_utf8, write_file};

pub const RUN_TIME_MARKER: &str = "TOTAL RUN TIME:";
/// Returned (and written) when no run time line is found.
pub const NOT_FOUND: f64 = -999.0;
pub const EXETIME_SITE: &str = "EXETIME";

fn exetime_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1985, 10, 31).unwrap_or(NaiveDate::MIN)
}

/// Seconds in the first `TOTAL RUN TIME: [h HOURS] [m MINUTES] s SECONDS` line.
pub fn parse_run_time(content: &str) -> Option<f64> {
    let line = content.lines().find(|l| l.contains(RUN_TIME_MARKER))?;
    let (_, rest) = line.split_once(RUN_TIME_MARKER)?;

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let mut seconds = 0.0;
    let mut found = false;
    for pair in tokens.chunks(2) {
        let [amount, unit] = pair else {
            break;
        };
        let Ok(amount) = amount.parse::<f64>() else {
            break;
        };
        let scale = match unit.to_ascii_uppercase().as_str() {
            "HOURS" | "HOUR" => 3600.0,
            "MINUTES" | "MINUTE" => 60.0,
            "SECONDS" | "SECOND" => 1.0,
            _ => break,
        };
        seconds += amount * scale;
        found = true;
    }
    found.then_some(seconds)
}

/// Write the run time found in `infile` to `outfile` and return it.
///
/// When the messages file has no run time, `outfile` gets a note naming
/// `infile` and the result is [`NOT_FOUND`].
pub fn extract_run_time(infile: &Path, outfile: &Path) -> Result<f64, CalibError> {
    let content = read_file_as_utf8(infile)?;
    match parse_run_time(&content) {
        Some(seconds) => {
            let line = format_smp_line(EXETIME_SITE, exetime_date(), seconds);
            write_file(outfile, &format!("{line}\n"))?;
            log::info!("run time {seconds} s written to {}", outfile.display());
            Ok(seconds)
        }
        None => {
            let note = format!(
                "{EXETIME_SITE}: '{}' not found in {}\n",
                RUN_TIME_MARKER.trim_end_matches(':'),
                infile.display()
            );
            write_file(outfile, &note)?;
            log::warn!("no run time found in {}", infile.display());
            Ok(NOT_FOUND)
        }
    }
}
