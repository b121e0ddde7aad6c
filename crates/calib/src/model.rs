use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::CalibError;

// ---------------------------------------------------------------------------
// Site keys
// ---------------------------------------------------------------------------

/// Site identifier compared on its canonical form: trimmed, ASCII-lowercased.
///
/// The name as first read is kept for display, so written files carry the
/// user's identifiers. Equality, hashing and ordering use only the key.
#[derive(Debug, Clone)]
pub struct SiteKey {
    key: String,
    name: String,
}

impl SiteKey {
    pub fn new(raw: &str) -> Self {
        let name = raw.trim();
        Self {
            key: name.to_ascii_lowercase(),
            name: name.to_string(),
        }
    }

    /// Canonical form used for matching.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Name as read, trimmed.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for SiteKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for SiteKey {}

impl Hash for SiteKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for SiteKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SiteKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Serialize for SiteKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for SiteKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ---------------------------------------------------------------------------
// Time series input
// ---------------------------------------------------------------------------

/// A single field measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub site: SiteKey,
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(site: &str, date: NaiveDate, value: f64) -> Self {
        Self {
            site: SiteKey::new(site),
            date,
            value,
        }
    }
}

/// One column of simulated model output.
#[derive(Debug, Clone)]
pub struct SimulatedSeries {
    column: usize,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl SimulatedSeries {
    /// Build a series, rejecting unequal lengths and dates that do not strictly increase.
    pub fn new(column: usize, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, CalibError> {
        if dates.len() != values.len() {
            return Err(CalibError::LengthMismatch {
                column,
                dates: dates.len(),
                values: values.len(),
            });
        }
        if let Some(index) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CalibError::NonMonotonicDates {
                column,
                index: index + 1,
            });
        }
        Ok(Self { column, dates, values })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

}

// ---------------------------------------------------------------------------
// Well metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellInfo {
    /// 1-based column of this well in the simulated hydrograph output.
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub layer: u32,
    pub name: String,
}

/// Well metadata keyed by canonical site name. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct WellIndex {
    wells: HashMap<SiteKey, WellInfo>,
}

impl WellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a well; a later entry for the same key replaces the earlier one.
    pub fn insert(&mut self, site: &str, info: WellInfo) -> Option<WellInfo> {
        self.wells.insert(SiteKey::new(site), info)
    }

    pub fn get(&self, site: &SiteKey) -> Option<&WellInfo> {
        self.wells.get(site)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SiteKey> {
        self.wells.keys()
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

impl FromIterator<(String, WellInfo)> for WellIndex {
    fn from_iter<I: IntoIterator<Item = (String, WellInfo)>>(iter: I) -> Self {
        let mut index = WellIndex::new();
        for (site, info) in iter {
            index.insert(&site, info);
        }
        index
    }
}

// ---------------------------------------------------------------------------
// Matching output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRecord {
    pub site: SiteKey,
    pub date: NaiveDate,
    pub observed: f64,
    pub simulated: f64,
    /// observed - simulated
    pub difference: f64,
    /// 1-based simulated timestep the observation falls in: the step ending
    /// on or after its date.
    pub timestep: usize,
}

/// Sites present on only one side of a calibration pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MissingSites {
    /// Wells with simulated output but no observations.
    pub sim_only: Vec<SiteKey>,
    /// Observation sites with no well metadata.
    pub obs_only: Vec<SiteKey>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchOutput {
    pub matched: Vec<MatchedRecord>,
    pub missing: MissingSites,
    /// Observations dropped because their site has no well metadata.
    pub unmatched_site_count: usize,
    /// Observations dropped because they fall outside the simulated period.
    pub out_of_range: Vec<Observation>,
    /// Known wells that had observations but none inside the simulated period.
    pub sites_without_matches: Vec<SiteKey>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    pub site: SiteKey,
    pub rmse: f64,
    pub bias: f64,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub value: Option<f64>,
}

impl SpatialPoint {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            value: None,
        }
    }

    pub fn with_value(id: impl Into<String>, x: f64, y: f64, value: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            value: Some(value),
        }
    }

    pub fn distance_to(&self, other: &SpatialPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Inverse-distance weights for one target, aligned with the source list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KrigeFactorRow {
    pub target_id: String,
    pub weights: Vec<f64>,
}

impl KrigeFactorRow {
    /// Weighted sum of `values`, which must be aligned with the source list.
    pub fn apply(&self, values: &[f64]) -> f64 {
        self.weights.iter().zip(values).map(|(w, v)| w * v).sum()
    }
}

/// Weights for the nearest pilot points of one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PilotPointFactors {
    pub target_id: String,
    /// (0-based pilot point index, normalized weight), nearest first.
    pub entries: Vec<(usize, f64)>,
}

// ---------------------------------------------------------------------------
// Head differences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WellPair {
    pub pair_id: String,
    pub well_1: SiteKey,
    pub well_2: SiteKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadDifference {
    pub pair_id: String,
    pub well_1: SiteKey,
    pub date_1: NaiveDate,
    pub head_1: f64,
    pub well_2: SiteKey,
    pub date_2: NaiveDate,
    pub head_2: f64,
    pub mid_date: NaiveDate,
    pub head_diff: f64,
}

// ---------------------------------------------------------------------------
// Calibration pass
// ---------------------------------------------------------------------------

/// Pre-loaded inputs for one calibration pass.
pub struct CalibInput {
    pub observations: Vec<Observation>,
    pub wells: WellIndex,
    pub series: Vec<SimulatedSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibSummary {
    pub observations: usize,
    pub matched: usize,
    pub unmatched_site_observations: usize,
    pub out_of_range_observations: usize,
    pub sites_with_stats: usize,
    pub sites_without_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibResult {
    pub meta: CalibMeta,
    pub summary: CalibSummary,
    pub stats: Vec<SiteStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<SiteStats>,
    pub missing: MissingSites,
    pub sites_without_matches: Vec<SiteKey>,
    pub matched: Vec<MatchedRecord>,
}
