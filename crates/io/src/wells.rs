// CSV inputs: well metadata, well pairs, observation lists

use std::path::Path;

use iwfm_calib::model::{Observation, SiteKey, WellIndex, WellInfo, WellPair};
use iwfm_calib::CalibError;
use serde::Deserialize;

use crate::text::{label, parse_date, read_file_as_utf8};

#[derive(Debug, Deserialize)]
struct WellRow {
    name: String,
    column: usize,
    x: f64,
    y: f64,
    layer: u32,
}

#[derive(Debug, Deserialize)]
struct PairRow {
    #[serde(rename = "PairNo")]
    pair_no: String,
    #[serde(rename = "WellName1")]
    well_1: String,
    #[serde(rename = "WellName2")]
    well_2: String,
}

#[derive(Debug, Deserialize)]
struct ObsRow {
    #[serde(rename = "WELL_NAME")]
    well_name: String,
    #[serde(rename = "MSMT_DATE")]
    date: String,
    #[serde(rename = "WSE")]
    wse: f64,
}

fn reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

fn csv_error(file: &str, e: csv::Error) -> CalibError {
    let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
    CalibError::parse(file, line, e.to_string())
}

// ---------------------------------------------------------------------------
// Well metadata
// ---------------------------------------------------------------------------

pub fn read_wells(path: &Path) -> Result<WellIndex, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_wells(&content, &label(path))
}

/// Parse `name,column,x,y,layer` rows. A repeated name keeps the last row.
pub fn parse_wells(content: &str, file: &str) -> Result<WellIndex, CalibError> {
    let mut index = WellIndex::new();
    for record in reader(content).deserialize() {
        let row: WellRow = record.map_err(|e| csv_error(file, e))?;
        let previous = index.insert(
            &row.name,
            WellInfo {
                column: row.column,
                x: row.x,
                y: row.y,
                layer: row.layer,
                name: row.name.clone(),
            },
        );
        if previous.is_some() {
            log::warn!("{file}: well '{}' listed more than once; last entry wins", row.name);
        }
    }
    log::debug!("read {} wells from {file}", index.len());
    Ok(index)
}

// ---------------------------------------------------------------------------
// Head-difference inputs
// ---------------------------------------------------------------------------

pub fn read_well_pairs(path: &Path) -> Result<Vec<WellPair>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_well_pairs(&content, &label(path))
}

/// Parse `PairNo,WellName1,WellName2` rows.
pub fn parse_well_pairs(content: &str, file: &str) -> Result<Vec<WellPair>, CalibError> {
    reader(content)
        .deserialize()
        .map(|record| -> Result<WellPair, CalibError> {
            let row: PairRow = record.map_err(|e| csv_error(file, e))?;
            Ok(WellPair {
                pair_id: row.pair_no,
                well_1: SiteKey::new(&row.well_1),
                well_2: SiteKey::new(&row.well_2),
            })
        })
        .collect()
}

pub fn read_obs_csv(path: &Path) -> Result<Vec<Observation>, CalibError> {
    let content = read_file_as_utf8(path)?;
    parse_obs_csv(&content, &label(path))
}

/// Parse `WELL_NAME,MSMT_DATE,WSE` rows; dates as `M/D/YYYY` or `YYYY-MM-DD`.
pub fn parse_obs_csv(content: &str, file: &str) -> Result<Vec<Observation>, CalibError> {
    let mut rdr = reader(content);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let row: ObsRow = record.map_err(|e| csv_error(file, e))?;
        // header is line 1
        let line = out.len() + 2;
        let date = parse_date(&row.date)
            .ok_or_else(|| CalibError::parse(file, line, format!("invalid date '{}'", row.date)))?;
        out.push(Observation::new(&row.well_name, date, row.wse));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn wells_keyed_canonically() {
        let text = "name,column,x,y,layer\n WELL_A ,1,6200000.5,2100000,1\nWell_B,2,1,2,3\n";
        let wells = parse_wells(text, "wells.csv").unwrap();
        assert_eq!(wells.len(), 2);
        let a = wells.get(&SiteKey::new("well_a")).unwrap();
        assert_eq!(a.column, 1);
        assert_eq!(a.x, 6_200_000.5);
        assert_eq!(a.name, "WELL_A");
        assert_eq!(wells.get(&SiteKey::new("WELL_B")).unwrap().layer, 3);
    }

    #[test]
    fn bad_well_row_reports_line() {
        let text = "name,column,x,y,layer\nA,1,0,0,1\nB,two,0,0,1\n";
        let err = parse_wells(text, "wells.csv").unwrap_err();
        match err {
            CalibError::Parse { file, line, .. } => {
                assert_eq!(file, "wells.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn pairs_and_observations() {
        let pairs = parse_well_pairs("PairNo,WellName1,WellName2\n1,S01,D01\n", "pairs.csv").unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].pair_id, "1");
        assert_eq!(pairs[0].well_2, SiteKey::new("d01"));

        let obs = parse_obs_csv(
            "WELL_NAME,MSMT_DATE,WSE\nS01,3/1/2021,105.2\nD01,2021-03-10,100\n",
            "obs.csv",
        )
        .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(obs[1].date, NaiveDate::from_ymd_opt(2021, 3, 10).unwrap());
        assert_eq!(obs[1].value, 100.0);
    }

    #[test]
    fn bad_observation_date() {
        let err = parse_obs_csv("WELL_NAME,MSMT_DATE,WSE\nS01,March,1\n", "obs.csv").unwrap_err();
        assert_eq!(err.to_string(), "obs.csv:2: invalid date 'March'");
    }
}
