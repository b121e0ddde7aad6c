//! PEST sample (`.smp`) and instruction (`.ins`) files.
//!
//! A sample line is `site date time value`, whitespace-delimited, with the
//! date as `MM/DD/YYYY`. Files written here use fixed columns so that the
//! matching instruction file can read the value at columns 42 to 70.

use std::path::Path;

use chrono::NaiveDate;
use iwfm_calib::model::{MatchedRecord, Observation};
use iwfm_calib::util::round_to;
use iwfm_calib::CalibError;

use crate::text::{is_skippable, label, parse_f64, parse_mdy, read_file_as_utf8};

/// Width of the left-justified site column in written sample files.
pub const SITE_WIDTH: usize = 20;
/// Width of the right-justified value column in written sample files.
pub const VALUE_WIDTH: usize = 22;
/// Decimals kept for written values.
pub const VALUE_DECIMALS: u32 = 6;

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

pub fn read_smp(path: &Path) -> Result<Vec<Observation>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_smp(&content, &label(path))
}

/// Parse sample-file text. Blank lines and `#` comments are skipped.
pub fn parse_smp(content: &str, file: &str) -> Result<Vec<Observation>, CalibError> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let (site, date, _time, value) = split_smp_line(line, file, idx + 1)?;
        let value = parse_f64(value, "value", file, idx + 1)?;
        out.push(Observation::new(site, date, value));
    }
    log::debug!("read {} observations from {file}", out.len());
    Ok(out)
}

fn split_smp_line<'a>(
    line: &'a str,
    file: &str,
    line_no: usize,
) -> Result<(&'a str, NaiveDate, &'a str, &'a str), CalibError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(CalibError::parse(
            file,
            line_no,
            format!("expected 'site date time value', found {} fields", tokens.len()),
        ));
    }
    let date = parse_mdy(tokens[1])
        .ok_or_else(|| CalibError::parse(file, line_no, format!("invalid date '{}'", tokens[1])))?;
    Ok((tokens[0], date, tokens[2], tokens[3]))
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// One fixed-column sample line, without the trailing newline.
pub fn format_smp_line(site: &str, date: NaiveDate, value: f64) -> String {
    format!(
        "{site:<sw$}{}  0:00:00  {:>vw$.prec$}",
        date.format("%m/%d/%Y"),
        round_to(value, VALUE_DECIMALS),
        sw = SITE_WIDTH,
        vw = VALUE_WIDTH,
        prec = VALUE_DECIMALS as usize,
    )
}

/// Sample file of observed values.
pub fn format_observations(observations: &[Observation]) -> String {
    let mut out = String::new();
    for obs in observations {
        out.push_str(&format_smp_line(obs.site.name(), obs.date, obs.value));
        out.push('\n');
    }
    out
}

/// Sample file of simulated equivalents.
pub fn format_simulated(records: &[MatchedRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&format_smp_line(r.site.name(), r.date, r.simulated));
        out.push('\n');
    }
    out
}

/// Normalize a sample file: names padded to `name_width`, dates zero-padded,
/// time and value kept as written.
pub fn reformat_smp(content: &str, file: &str, name_width: usize) -> Result<String, CalibError> {
    let mut out = String::new();
    for (idx, line) in content.lines().enumerate() {
        if is_skippable(line) {
            continue;
        }
        let (site, date, time, value) = split_smp_line(line, file, idx + 1)?;
        out.push_str(&format!(
            "{site:<name_width$} {}  {time}  {value}\n",
            date.format("%m/%d/%Y")
        ));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Instruction files
// ---------------------------------------------------------------------------

/// Observation name used by PEST: site plus its 1-based model timestep, e.g. `WELL_A_042`.
pub fn observation_name(site: &str, step: usize) -> String {
    format!("{site}_{step:03}")
}

pub fn ins_line(site: &str, step: usize) -> String {
    format!("L1  [{}]42:70", observation_name(site, step))
}

/// Instruction file for a sample file of `(site, timestep)` rows, in the same order.
pub fn format_ins<'a>(rows: impl IntoIterator<Item = (&'a str, usize)>) -> String {
    let mut out = String::from("pif #\n");
    for (site, step) in rows {
        out.push_str(&ins_line(site, step));
        out.push('\n');
    }
    out
}

/// Instruction file matching [`format_simulated`] for the same records.
pub fn format_simulated_ins(records: &[MatchedRecord]) -> String {
    format_ins(records.iter().map(|r| (r.site.name(), r.timestep)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let text = "# header\n\nWELL1  01/15/2000  00:00:00  125.50\nwell2 2/3/2001 0:00:00 -3\n";
        let obs = parse_smp(text, "obs.smp").unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].site.as_str(), "well1");
        assert_eq!(obs[0].date, d(2000, 1, 15));
        assert_eq!(obs[0].value, 125.5);
        assert_eq!(obs[1].date, d(2001, 2, 3));
        assert_eq!(obs[1].value, -3.0);
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        let err = parse_smp("A 01/01/2000 0:00:00 1\nB 01/01/2000\n", "obs.smp").unwrap_err();
        assert_eq!(err.to_string(), "obs.smp:2: expected 'site date time value', found 2 fields");

        let err = parse_smp("A 31/01/2000 0:00:00 1\n", "obs.smp").unwrap_err();
        assert!(err.to_string().contains("invalid date '31/01/2000'"));

        let err = parse_smp("A 01/01/2000 0:00:00 abc\n", "obs.smp").unwrap_err();
        assert!(err.to_string().contains("invalid value 'abc'"));
    }

    #[test]
    fn fixed_columns() {
        let line = format_smp_line("well_a", d(2000, 1, 6), 100.1234567);
        assert_eq!(line.len(), SITE_WIDTH + 10 + 11 + VALUE_WIDTH);
        assert!(line.starts_with("well_a              01/06/2000  0:00:00  "));
        assert!(line.ends_with("            100.123457"));
    }

    #[test]
    fn reformat_keeps_values_verbatim() {
        let text = "W1 1/2/2003 12:00:00 1.50\n";
        let out = reformat_smp(text, "x.smp", 8).unwrap();
        assert_eq!(out, "W1       01/02/2003  12:00:00  1.50\n");
    }

    #[test]
    fn written_names_keep_their_case() {
        let obs = vec![Observation::new("MY_WELL", d(2000, 3, 15), 1.0)];
        let text = format_observations(&obs);
        assert!(text.starts_with("MY_WELL             03/15/2000"));
    }

    #[test]
    fn ins_names_use_model_timesteps() {
        let rec = |site: &str, m: u32, step: usize| MatchedRecord {
            site: site.into(),
            date: d(2000, m, 15),
            observed: 1.0,
            simulated: 1.0,
            difference: 0.0,
            timestep: step,
        };
        let records = vec![rec("MY_WELL", 3, 3), rec("MY_WELL", 7, 7), rec("Other", 3, 42)];
        let ins = format_simulated_ins(&records);
        let lines: Vec<&str> = ins.lines().collect();
        assert_eq!(
            lines,
            vec!["pif #", "L1  [MY_WELL_003]42:70", "L1  [MY_WELL_007]42:70", "L1  [Other_042]42:70"]
        );
        assert_eq!(format_simulated(&records).lines().count(), 3);
    }
}
