// Shared text-file helpers

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use iwfm_calib::CalibError;

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, CalibError> {
    let mut file = std::fs::File::open(path).map_err(|e| CalibError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| CalibError::io(path, e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Model files written on Windows are usually Windows-1252
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

pub fn write_file(path: &Path, content: &str) -> Result<(), CalibError> {
    std::fs::write(path, content).map_err(|e| CalibError::io(path, e))
}

/// Label used for a file in parse errors.
pub(crate) fn label(path: &Path) -> String {
    path.display().to_string()
}

/// Comment or blank line in a whitespace-delimited input.
pub(crate) fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse `M/D/YYYY` (leading zeros optional).
pub fn parse_mdy(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a date written either as `M/D/YYYY` or ISO `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_mdy(text).or_else(|| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
}

pub(crate) fn parse_f64(token: &str, what: &str, file: &str, line: usize) -> Result<f64, CalibError> {
    token
        .parse::<f64>()
        .map_err(|_| CalibError::parse(file, line, format!("invalid {what} '{token}'")))
}
