//! `iwfm-calib`: Groundwater model calibration engine.
//!
//! Pure engine crate: receives pre-loaded observations, well metadata and
//! simulated series, returns matched records and fit statistics. Also holds
//! the spatial weighting used for pilot points and value transfer.
//! No CLI or file format dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod headdiff;
pub mod interp;
pub mod krige;
pub mod matcher;
pub mod model;
pub mod pilot;
pub mod reconcile;
pub mod stats;
pub mod timing;
pub mod transfer;
pub mod util;

pub use config::CalibConfig;
pub use engine::run;
pub use error::CalibError;
pub use model::{
    CalibInput, CalibResult, MatchedRecord, Observation, SimulatedSeries, SiteKey, SiteStats,
    SpatialPoint, WellIndex, WellInfo,
};
