//! Calibration reports: per-well RMSE/bias table, matched-record table,
//! missing-site list, head-difference table.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use iwfm_calib::model::{HeadDifference, MatchedRecord, SiteKey, SiteStats, WellIndex};
use iwfm_calib::CalibError;

pub const STATS_HEADER: [&str; 8] = ["ID", "Well Name", "X", "Y", "Layer", "RMSE", "Bias", "Count"];

pub const MATCHED_HEADER: [&str; 5] = ["Well ID", "Date", "Observed", "Simulated", "Difference"];

pub const HEAD_DIFF_HEADER: [&str; 9] = [
    "WELL_PAIR_ID",
    "WELL_1_NAME",
    "WELL_1_DATE",
    "WELL_1_HEAD",
    "WELL_2_NAME",
    "WELL_2_DATE",
    "WELL_2_HEAD",
    "MID_DATE",
    "HEAD_DIFF",
];

fn csv_io(path: &Path, e: csv::Error) -> CalibError {
    CalibError::io(path, e.into())
}

// ---------------------------------------------------------------------------
// RMSE / bias
// ---------------------------------------------------------------------------

/// Write one row per site found in `wells`; returns the number of rows.
///
/// Sites without well metadata (including the overall row) are skipped.
pub fn write_stats_report(
    path: &Path,
    stats: &[SiteStats],
    wells: &WellIndex,
    delimiter: u8,
) -> Result<usize, CalibError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| csv_io(path, e))?;
    writer.write_record(STATS_HEADER).map_err(|e| csv_io(path, e))?;

    let mut count = 0;
    for s in stats {
        let Some(well) = wells.get(&s.site) else {
            log::debug!("no well metadata for '{}'; left out of stats report", s.site);
            continue;
        };
        count += 1;
        writer
            .write_record([
                count.to_string(),
                well.name.clone(),
                well.x.to_string(),
                well.y.to_string(),
                well.layer.to_string(),
                format!("{:.2}", s.rmse),
                format!("{:.2}", s.bias),
                s.count.to_string(),
            ])
            .map_err(|e| csv_io(path, e))?;
    }
    writer.flush().map_err(|e| CalibError::io(path, e))?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// Matched records
// ---------------------------------------------------------------------------

/// One row per matched observation, in input order, values to 2 decimals.
pub fn write_matched_records(path: &Path, records: &[MatchedRecord], delimiter: u8) -> Result<(), CalibError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| csv_io(path, e))?;
    writer.write_record(MATCHED_HEADER).map_err(|e| csv_io(path, e))?;
    for r in records {
        writer
            .write_record([
                r.site.name().to_string(),
                r.date.format("%m/%d/%Y").to_string(),
                format!("{:.2}", r.observed),
                format!("{:.2}", r.simulated),
                format!("{:.2}", r.difference),
            ])
            .map_err(|e| csv_io(path, e))?;
    }
    writer.flush().map_err(|e| CalibError::io(path, e))
}

// ---------------------------------------------------------------------------
// Missing sites
// ---------------------------------------------------------------------------

/// Append the sorted list of observation sites that have no simulated output.
///
/// Returns `false` without touching the file when `sites` is empty.
pub fn append_missing_sites(path: &Path, obs_file: &str, sites: &[SiteKey]) -> Result<bool, CalibError> {
    if sites.is_empty() {
        return Ok(false);
    }
    let mut sorted: Vec<&SiteKey> = sites.iter().collect();
    sorted.sort();

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CalibError::io(path, e))?;

    let mut text = format!("Observation sites in {obs_file} without simulated hydrographs:\n");
    for site in sorted {
        text.push_str(site.name());
        text.push('\n');
    }
    file.write_all(text.as_bytes()).map_err(|e| CalibError::io(path, e))?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Head differences
// ---------------------------------------------------------------------------

/// Heads and the difference are written to 2 decimals.
pub fn write_head_diffs(path: &Path, diffs: &[HeadDifference]) -> Result<(), CalibError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_io(path, e))?;
    writer.write_record(HEAD_DIFF_HEADER).map_err(|e| csv_io(path, e))?;
    for h in diffs {
        writer
            .write_record([
                h.pair_id.clone(),
                h.well_1.name().to_string(),
                h.date_1.format("%m/%d/%Y").to_string(),
                format!("{:.2}", h.head_1),
                h.well_2.name().to_string(),
                h.date_2.format("%m/%d/%Y").to_string(),
                format!("{:.2}", h.head_2),
                h.mid_date.format("%m/%d/%Y").to_string(),
                format!("{:.2}", h.head_diff),
            ])
            .map_err(|e| csv_io(path, e))?;
    }
    writer.flush().map_err(|e| CalibError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use iwfm_calib::model::WellInfo;

    fn wells() -> WellIndex {
        let mut wells = WellIndex::new();
        wells.insert(
            "WELL_A",
            WellInfo {
                column: 1,
                x: 6200000.5,
                y: 2100000.0,
                layer: 2,
                name: "WELL_A".into(),
            },
        );
        wells
    }

    fn stat(site: &str, rmse: f64, bias: f64, count: usize) -> SiteStats {
        SiteStats {
            site: SiteKey::new(site),
            rmse,
            bias,
            count,
        }
    }

    #[test]
    fn stats_report_tab_delimited() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rmse_bias.txt");
        let stats = vec![stat("well_a", 3.5355, -0.5, 2), stat("ghost", 1.0, 1.0, 1), stat("all", 1.0, 1.0, 3)];
        let rows = write_stats_report(&path, &stats, &wells(), b'\t').unwrap();
        assert_eq!(rows, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID\tWell Name\tX\tY\tLayer\tRMSE\tBias\tCount");
        assert_eq!(lines[1], "1\tWELL_A\t6200000.5\t2100000\t2\t3.54\t-0.50\t2");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn missing_list_appends_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tmp");

        assert!(!append_missing_sites(&path, "obs.smp", &[]).unwrap());
        assert!(!path.exists());

        let sites = vec![SiteKey::new("zeta"), SiteKey::new("Alpha")];
        assert!(append_missing_sites(&path, "obs.smp", &sites).unwrap());
        assert!(append_missing_sites(&path, "obs2.smp", &[SiteKey::new("mid")]).unwrap());

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("obs.smp"));
        assert_eq!(&lines[1..3], &["Alpha", "zeta"]);
        assert!(lines[3].contains("obs2.smp"));
        assert_eq!(lines[4], "mid");
    }

    #[test]
    fn matched_record_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim_obs.csv");
        let records = vec![MatchedRecord {
            site: SiteKey::new("MY_WELL"),
            date: NaiveDate::from_ymd_opt(2000, 3, 15).unwrap(),
            observed: 100.0,
            simulated: 97.456,
            difference: 2.544,
            timestep: 3,
        }];
        write_matched_records(&path, &records, b',').unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Well ID,Date,Observed,Simulated,Difference");
        assert_eq!(lines[1], "MY_WELL,03/15/2000,100.00,97.46,2.54");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn head_diff_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("head_diffs.csv");
        let d = |day| NaiveDate::from_ymd_opt(2021, 3, day).unwrap();
        let diffs = vec![HeadDifference {
            pair_id: "1".into(),
            well_1: SiteKey::new("S01"),
            date_1: d(1),
            head_1: 105.2,
            well_2: SiteKey::new("D01"),
            date_2: d(10),
            head_2: 100.0,
            mid_date: d(5),
            head_diff: 5.2,
        }];
        write_head_diffs(&path, &diffs).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEAD_DIFF_HEADER.join(","));
        assert_eq!(lines[1], "1,S01,03/01/2021,105.20,D01,03/10/2021,100.00,03/05/2021,5.20");
    }
}
