use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CalibError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad factor counts, unknown delimiter, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Malformed line in an input file.
    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },
    /// File read/write failure.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A well refers to a simulated column that is not in the hydrograph output.
    #[error("well '{site}' refers to simulated column {column}, which is not present")]
    UnknownColumn { site: String, column: usize },
    /// Simulated dates must be strictly increasing.
    #[error("simulated column {column}: dates are not strictly increasing at index {index}")]
    NonMonotonicDates { column: usize, index: usize },
    /// Simulated dates and values have different lengths.
    #[error("simulated column {column}: {dates} dates but {values} values")]
    LengthMismatch {
        column: usize,
        dates: usize,
        values: usize,
    },
    /// Spatial interpolation needs at least one source point.
    #[error("spatial interpolation requires at least one source point")]
    NoSourcePoints,
    /// A source point used for value transfer carries no value.
    #[error("source point '{id}' has no value to transfer")]
    MissingPointValue { id: String },
    /// A factor entry names a pilot point with no parameter value.
    #[error("node '{target}' uses pilot point {index}, but only {count} pilot point values were given")]
    UnknownPilotPoint {
        target: String,
        index: usize,
        count: usize,
    },
}

impl CalibError {
    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
