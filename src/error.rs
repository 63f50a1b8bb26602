use thiserror::Error;

/// Errors raised by pattern generation and the surface helpers
#[derive(Debug, Error, PartialEq)]
pub enum CamoError {
    #[error("invalid resolution {0}: must be at least 1")]
    InvalidResolution(usize),

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("invalid radius {0}: must be finite and positive")]
    InvalidRadius(f64),

    #[error("shape mismatch: expected {expected}x{expected}, found {width}x{height}")]
    ShapeMismatch {
        expected: usize,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, CamoError>;
