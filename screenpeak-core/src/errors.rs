use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuideTableError {
    #[error("Guide table is missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Guide table is empty (no header row): {0}")]
    EmptyFile(String),

    #[error("Line {line}: can't parse coordinate tag '{tag}'")]
    BadCoordinateTag { line: usize, tag: String },

    #[error("Line {line}: can't parse read count '{value}' for guide '{tag}'")]
    BadCount {
        line: usize,
        tag: String,
        value: String,
    },

    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    TruncatedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("No usable guide records left after filtering: {0}")]
    EmptyTable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum IntervalError {
    #[error("Can't merge an empty interval set")]
    EmptyIntervalSet,
}

#[derive(Error, Debug)]
pub enum PeakIoError {
    #[error("Line {line}: malformed peak record: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("No peak records found in: {0}")]
    EmptyPeakFile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
