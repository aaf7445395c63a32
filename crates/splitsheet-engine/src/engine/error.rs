//! Error types for the allocation engine.

use thiserror::Error;

use super::share::SHARE_SUM_TOLERANCE;

/// Validation failures reported by the allocation engine.
///
/// These carry enough detail for a caller to correct the input; none are
/// retried or silently corrected. A party with a blank share is not an
/// error state and never produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error(
        "party shares must sum to 1: got {actual} (tolerance {})",
        SHARE_SUM_TOLERANCE
    )]
    InvalidShareSum { actual: f64 },

    #[error("no parties supplied")]
    EmptyPartySet,

    #[error("negative amount for {subject}: {amount}")]
    NegativeAmount { subject: String, amount: i64 },

    #[error("share {value} out of range: must be greater than 0 and at most 1")]
    ShareOutOfRange { value: f64 },

    #[error("cannot parse share from {text:?}")]
    ShareParse { text: String },

    #[error("too many custom expense labels: {count} (at most {limit})")]
    TooManyOtherLabels { count: usize, limit: usize },
}
