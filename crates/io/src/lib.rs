//! `iwfm-calib-io`: File formats for the calibration engine.
//!
//! Readers for PEST sample files, IWFM hydrograph output, well metadata and
//! point tables; writers for reports, instruction files and pilot-point
//! factor files. All errors are `iwfm_calib::CalibError`.

pub mod exe_time;
pub mod factors;
pub mod hydrograph;
pub mod points;
pub mod report;
pub mod smp;
pub mod text;
pub mod wells;

pub use hydrograph::read_hydrographs;
pub use smp::read_smp;
pub use text::read_file_as_utf8;
pub use wells::read_wells;
