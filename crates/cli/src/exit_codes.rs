//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: PEST run scripts and batch
//! files check them between model runs.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                             |
//! |------|-----------------------------------------------------|
//! | 0    | Success                                             |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args)                          |
//! | 3    | Config file failed to parse or validate             |
//! | 4    | Input file is malformed or inconsistent             |
//! | 5    | File could not be read or written                   |
//! | 6    | `exe-time` found no run time in the messages file   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` or the relevant command

use iwfm_calib::CalibError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config TOML could not be parsed, or failed validation.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// Malformed input: bad line, bad date, unknown column, degenerate points.
pub const EXIT_PARSE: u8 = 4;

/// File missing or not writable.
pub const EXIT_IO: u8 = 5;

/// Simulation messages file had no `TOTAL RUN TIME` line.
pub const EXIT_NO_RUN_TIME: u8 = 6;

/// Map an engine/IO error to its exit code.
pub fn calib_exit_code(err: &CalibError) -> u8 {
    match err {
        CalibError::ConfigParse(_) | CalibError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        CalibError::Io { .. } => EXIT_IO,
        CalibError::Parse { .. }
        | CalibError::UnknownColumn { .. }
        | CalibError::NonMonotonicDates { .. }
        | CalibError::LengthMismatch { .. }
        | CalibError::NoSourcePoints
        | CalibError::MissingPointValue { .. }
        | CalibError::UnknownPilotPoint { .. } => EXIT_PARSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_CONFIG_INVALID,
            EXIT_PARSE,
            EXIT_IO,
            EXIT_NO_RUN_TIME,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn error_mapping() {
        assert_eq!(calib_exit_code(&CalibError::ConfigParse("x".into())), EXIT_CONFIG_INVALID);
        assert_eq!(calib_exit_code(&CalibError::parse("f", 1, "bad")), EXIT_PARSE);
        assert_eq!(calib_exit_code(&CalibError::NoSourcePoints), EXIT_PARSE);
        let io = CalibError::io("x", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(calib_exit_code(&io), EXIT_IO);
    }
}
