// THEORY:
// The `error` module holds every way a frame can fail to become a sentence. A bad
// bounding box is a `BoxViolation` naming the first bound it breaks. Everything
// else is a `DescribeError`, returned to the caller.

use thiserror::Error;

/// A single violated bound of a pixel bounding box. Checked in declaration
/// order; the first violation found is the one reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxViolation {
    #[error("xmin is greater than xmax")]
    XminGreaterThanXmax,

    #[error("ymin is greater than ymax")]
    YminGreaterThanYmax,

    #[error("xmin is greater than image width")]
    XminBeyondWidth,

    #[error("xmax is greater than image width")]
    XmaxBeyondWidth,

    #[error("ymin is greater than image height")]
    YminBeyondHeight,

    #[error("ymax is greater than image height")]
    YmaxBeyondHeight,

    #[error("xmin < 0")]
    NegativeXmin,

    #[error("ymin < 0")]
    NegativeYmin,

    #[error("image has zero width or height")]
    EmptyImage,
}

#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("Validation error: {0}")]
    Validation(#[from] BoxViolation),

    #[error("Degenerate region: crop of {width}x{height} pixels has no area")]
    DegenerateRegion { width: u32, height: u32 },

    #[error("Invalid count {count} for '{category}': must be a positive integer")]
    InvalidCount { category: String, count: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for DescribeError {
    fn from(err: tokio::task::JoinError) -> Self {
        DescribeError::Worker(err.to_string())
    }
}
