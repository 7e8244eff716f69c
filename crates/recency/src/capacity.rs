//! Validated cache capacity

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

/// Maximum number of live entries a cache may hold. Always greater than 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validate a capacity
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity(0))` if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self)
            .ok_or(Error::InvalidCapacity(0))
    }

    /// Get the capacity as a plain integer
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(capacity: NonZeroUsize) -> Self {
        Self(capacity)
    }
}

impl TryFrom<usize> for Capacity {
    type Error = Error;

    fn try_from(capacity: usize) -> Result<Self> {
        Self::new(capacity)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = Error;

    fn try_from(capacity: i64) -> Result<Self> {
        if capacity <= 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        // Only fails on targets where usize is narrower than i64.
        usize::try_from(capacity)
            .map_err(|_| Error::InvalidCapacity(capacity))
            .and_then(Self::new)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_zero_rejected() {
        assert_eq!(Capacity::new(0), Err(Error::InvalidCapacity(0)));
        assert_eq!(Capacity::try_from(0usize), Err(Error::InvalidCapacity(0)));
        assert_eq!(Capacity::try_from(0i64), Err(Error::InvalidCapacity(0)));
    }

    #[test]
    fn test_capacity_negative_rejected() {
        assert_eq!(Capacity::try_from(-1i64), Err(Error::InvalidCapacity(-1)));
        assert_eq!(
            Capacity::try_from(i64::MIN),
            Err(Error::InvalidCapacity(i64::MIN))
        );
    }

    #[test]
    fn test_capacity_positive() {
        assert_eq!(Capacity::new(7).unwrap().get(), 7);
        assert_eq!(Capacity::try_from(3i64).unwrap().get(), 3);
        assert_eq!(Capacity::from(NonZeroUsize::MIN).get(), 1);
        assert_eq!(Capacity::new(42).unwrap().to_string(), "42");
    }
}
