//! Ownership shares.
//!
//! A share is a fraction of the total proceeds in (0, 1]. The share row of
//! the source sheets accepts fraction entry (`1/3`), so [`Share::parse`]
//! understands decimals, percentages, and simple fractions.

use std::fmt;

use super::error::AllocationError;

/// Tolerance for validating that a share sequence sums to 1.
pub const SHARE_SUM_TOLERANCE: f64 = 1e-9;

/// A party's fractional ownership of the total proceeds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Share(f64);

impl Share {
    pub fn new(fraction: f64) -> Result<Share, AllocationError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(AllocationError::ShareOutOfRange { value: fraction });
        }
        Ok(Share(fraction))
    }

    /// Parse a share from user text: `0.25`, `25%`, or `1/4`.
    pub fn parse(text: &str) -> Result<Share, AllocationError> {
        let trimmed = text.trim();
        let parse_err = || AllocationError::ShareParse {
            text: text.to_string(),
        };

        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| parse_err())?;
            return Share::new(value / 100.0);
        }

        if let Some((num, den)) = trimmed.split_once('/') {
            let num: f64 = num.trim().parse().map_err(|_| parse_err())?;
            let den: f64 = den.trim().parse().map_err(|_| parse_err())?;
            if den == 0.0 {
                return Err(parse_err());
            }
            return Share::new(num / den);
        }

        let value: f64 = trimmed.parse().map_err(|_| parse_err())?;
        Share::new(value)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that shares sum to 1 within [`SHARE_SUM_TOLERANCE`].
pub fn validate_share_sum(shares: &[Share]) -> Result<(), AllocationError> {
    let actual: f64 = shares.iter().map(|s| s.fraction()).sum();
    if (actual - 1.0).abs() > SHARE_SUM_TOLERANCE {
        return Err(AllocationError::InvalidShareSum { actual });
    }
    Ok(())
}
