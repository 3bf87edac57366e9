use crate::complexity::Hardness;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

/// Failures surfaced at the row-evaluation boundary.
///
/// Row numbers are 1-based positions among the data rows of the input.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("row {row}: cannot decode field `{field}`: {reason}")]
    Decoding {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("row {row}: field `{field}` is missing or not text")]
    InvalidInput { row: usize, field: &'static str },

    #[error("no rows were classified as {0}")]
    EmptyCategory(Hardness),

    #[error("row {0} is not part of the dataset")]
    UnknownRow(usize),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
