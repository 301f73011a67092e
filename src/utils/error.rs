// src/utils/error.rs
use thiserror::Error;

// Errors raised while a filter is being assembled from its keywords.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("use either {0} or {1}, not both")]
    ConflictingKeywords(&'static str, &'static str),

    #[error("to_string or to_re cannot be used together with num_lines")]
    CountWithEndMarker,

    #[error("to_string or to_re needs from_string or from_re")]
    EndMarkerWithoutStart,

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid mask '{0}': {1}")]
    InvalidMask(String, String),

    #[error("invalid tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),

    #[error("ignore_below ({below}) is larger than ignore_above ({above})")]
    InvalidSkipWindow { below: f64, above: f64 },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum CompareError {
    // A section descriptor matched nothing in one of the inputs.
    #[error("filter {filter} did not extract anything from file {file}")]
    BadFilter { filter: String, file: String },

    #[error("{0}")]
    FilterKeyword(String),

    #[error("test {name} failed{}", verbose_suffix(.diff))]
    TestFailed { name: String, diff: Option<String> },

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

fn verbose_suffix(diff: &Option<String>) -> String {
    diff.as_deref().map(|d| format!("\n{d}")).unwrap_or_default()
}

impl CompareError {
    /// Configuration errors abort a comparison immediately; everything else is a verdict or I/O.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, CompareError::BadFilter { .. } | CompareError::FilterKeyword(_))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Comparison failed: {0}")]
    Compare(#[from] CompareError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
