//! Error module for the Rusty Raster library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum RasterError {
    /// Error for invalid parameters, e.g., a non-positive time bin or window length.
    InvalidParameter(String),
    /// Error for trial data whose rows do not share the same number of time bins.
    ShapeMismatch(String),
    /// Error for empty inputs where a non-empty result is required, e.g., no onsets.
    EmptyInput(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RasterError::InvalidParameter(e) => write!(f, "Invalid parameter: {}", e),
            RasterError::ShapeMismatch(e) => write!(f, "Shape mismatch: {}", e),
            RasterError::EmptyInput(e) => write!(f, "Empty input: {}", e),
            RasterError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for RasterError {}

impl From<std::io::Error> for RasterError {
    fn from(e: std::io::Error) -> Self {
        RasterError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for RasterError {
    fn from(e: serde_json::Error) -> Self {
        RasterError::IOError(format!("JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            RasterError::InvalidParameter("dt must be positive".to_string()).to_string(),
            "Invalid parameter: dt must be positive"
        );
        assert_eq!(
            RasterError::ShapeMismatch("row 2".to_string()).to_string(),
            "Shape mismatch: row 2"
        );
        assert_eq!(
            RasterError::EmptyInput("no onsets".to_string()).to_string(),
            "Empty input: no onsets"
        );
    }

    #[test]
    fn test_from_io_error() {
        let err: RasterError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err, RasterError::IOError("missing".to_string()));
    }
}
