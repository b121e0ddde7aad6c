// IWFM groundwater hydrograph output (e.g. GW_Hyd.out)

use std::path::Path;

use chrono::NaiveDate;
use iwfm_calib::model::SimulatedSeries;
use iwfm_calib::CalibError;

use crate::text::{label, parse_f64, parse_mdy, read_file_as_utf8};

pub fn read_hydrographs(path: &Path, header_lines: usize) -> Result<Vec<SimulatedSeries>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_hydrographs(&content, header_lines, &label(path))
}

/// Parse hydrograph text into one series per value column (column 1 first).
///
/// The first `header_lines` lines are skipped. Each data row is a timestamp
/// `MM/DD/YYYY_24:00` followed by one value per hydrograph; every row must
/// have the same number of values.
pub fn parse_hydrographs(
    content: &str,
    header_lines: usize,
    file: &str,
) -> Result<Vec<SimulatedSeries>, CalibError> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(header_lines) {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(stamp) = tokens.next() else {
            continue;
        };
        let date = parse_timestamp(stamp)
            .ok_or_else(|| CalibError::parse(file, line_no, format!("invalid timestamp '{stamp}'")))?;

        let values = tokens
            .map(|t| parse_f64(t, "head", file, line_no))
            .collect::<Result<Vec<f64>, _>>()?;
        if columns.is_empty() {
            if values.is_empty() {
                return Err(CalibError::parse(file, line_no, "row has no hydrograph values"));
            }
            columns = vec![Vec::new(); values.len()];
        } else if values.len() != columns.len() {
            return Err(CalibError::parse(
                file,
                line_no,
                format!("expected {} values, found {}", columns.len(), values.len()),
            ));
        }

        dates.push(date);
        for (col, v) in columns.iter_mut().zip(values) {
            col.push(v);
        }
    }

    log::debug!("read {} timesteps x {} hydrographs from {file}", dates.len(), columns.len());

    columns
        .into_iter()
        .enumerate()
        .map(|(i, values)| SimulatedSeries::new(i + 1, dates.clone(), values))
        .collect()
}

/// `MM/DD/YYYY_24:00` → date. The time suffix marks the end of that day.
fn parse_timestamp(stamp: &str) -> Option<NaiveDate> {
    let date = stamp.split_once('_').map_or(stamp, |(date, _)| date);
    parse_mdy(date)
}
