//! Error types for checked transform assignment and scene descriptions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A transform was rejected because it has no inverse.
    #[error("transform is not invertible (determinant is zero)")]
    NonInvertible,

    /// A description named a shape kind that does not exist.
    #[error("unknown shape type: {0}")]
    UnknownShape(String),

    /// A description named a pattern kind that does not exist.
    #[error("unknown pattern type: {0}")]
    UnknownPattern(String),

    /// A raw matrix description did not hold 16 elements.
    #[error("matrix needs 16 elements, got {0}")]
    MalformedMatrix(usize),

    #[error("malformed description: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
