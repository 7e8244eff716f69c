//! Error types for recency

use std::fmt;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity was zero or negative
    InvalidCapacity(i64),

    /// Key not found
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", cap)
            }
            Error::NotFound => write!(f, "Key not found"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::InvalidCapacity(-3).to_string(),
            "Invalid capacity: -3 (must be greater than 0)"
        );
        assert_eq!(Error::NotFound.to_string(), "Key not found");
    }
}
