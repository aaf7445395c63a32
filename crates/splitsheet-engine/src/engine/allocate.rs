//! Remainder-safe proportional allocation.
//!
//! Splitting a rounded total independently per party loses or duplicates
//! units whenever shares do not divide evenly. The cumulative technique
//! used here allocates against the running cumulative share instead: after
//! processing the first `i` parties the allocated sum always equals the
//! rounded cumulative target, so the grand total is preserved exactly and
//! each party deviates from its ideal `share * total` by at most one
//! rounding unit.

use super::error::AllocationError;
use super::money::Money;
use super::share::{Share, validate_share_sum};

/// Split `total` across `shares`, preserving the total exactly.
///
/// Shares must be non-empty and sum to 1 within tolerance; `total` must be
/// non-negative. The allocation for party `i` is
/// `round(cumulative_share[i] * total) - allocated_so_far`, rounding half
/// away from zero. Order matters: reordering parties with the same shares
/// may shift individual allocations by a unit, never the total.
pub fn allocate(total: Money, shares: &[Share]) -> Result<Vec<Money>, AllocationError> {
    if shares.is_empty() {
        return Err(AllocationError::EmptyPartySet);
    }
    if total.is_negative() {
        return Err(AllocationError::NegativeAmount {
            subject: "total".to_string(),
            amount: total.units(),
        });
    }
    validate_share_sum(shares)?;

    let mut allocations = Vec::with_capacity(shares.len());
    let mut cumulative = 0.0;
    let mut allocated = 0i64;

    for (i, share) in shares.iter().enumerate() {
        cumulative += share.fraction();
        // The validated sum counts as exactly 1 for the last party, which
        // pins the grand total to `total` under tolerance-level noise.
        let target = if i + 1 == shares.len() {
            total.units()
        } else {
            Money::from_fraction(cumulative * total.as_f64()).units()
        };
        allocations.push(Money::new(target - allocated));
        allocated = target;
    }

    Ok(allocations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares(fractions: &[f64]) -> Vec<Share> {
        fractions.iter().map(|&f| Share::new(f).unwrap()).collect()
    }

    fn total_of(allocations: &[Money]) -> i64 {
        allocations.iter().map(|m| m.units()).sum()
    }

    #[test]
    fn test_quarter_quarter_half() {
        let result = allocate(Money::new(18_300_000), &shares(&[0.25, 0.25, 0.5])).unwrap();
        assert_eq!(
            result,
            vec![
                Money::new(4_575_000),
                Money::new(4_575_000),
                Money::new(9_150_000)
            ]
        );
        assert_eq!(total_of(&result), 18_300_000);
    }

    #[test]
    fn test_thirds_preserve_total() {
        let third = 1.0 / 3.0;
        let result = allocate(Money::new(100), &shares(&[third, third, third])).unwrap();
        // Cumulative targets are ROUND(33.33) = 33 and ROUND(66.67) = 67,
        // so the middle party absorbs the first remainder unit and the
        // rest lands on the last party.
        assert_eq!(result, vec![Money::new(33), Money::new(34), Money::new(33)]);
        assert_eq!(total_of(&result), 100);
    }

    #[test]
    fn test_single_party_receives_everything() {
        let result = allocate(Money::new(997), &shares(&[1.0])).unwrap();
        assert_eq!(result, vec![Money::new(997)]);
    }

    #[test]
    fn test_sum_invariant_over_awkward_shares() {
        let fractions = [0.1, 0.15, 0.2, 0.25, 0.3];
        for total in [1, 7, 99, 1_000_003, 18_300_000] {
            let result = allocate(Money::new(total), &shares(&fractions)).unwrap();
            assert_eq!(total_of(&result), total, "total {} not preserved", total);
        }
    }

    #[test]
    fn test_per_party_deviation_bounded() {
        let third = 1.0 / 3.0;
        let total = 1_000_000;
        let result = allocate(Money::new(total), &shares(&[third, third, third])).unwrap();
        for (money, share) in result.iter().zip(&shares(&[third, third, third])) {
            let ideal = share.fraction() * total as f64;
            assert!((money.as_f64() - ideal).abs() <= 3.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let s = shares(&[0.6, 0.4]);
        let first = allocate(Money::new(1001), &s).unwrap();
        let second = allocate(Money::new(1001), &s).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_share_sum_tolerance_boundary() {
        let ok = shares(&[0.5, 0.500_000_000_1]);
        assert!(allocate(Money::new(100), &ok).is_ok());

        let bad = shares(&[0.5, 0.4]);
        assert!(matches!(
            allocate(Money::new(100), &bad),
            Err(AllocationError::InvalidShareSum { .. })
        ));
    }

    #[test]
    fn test_empty_party_set() {
        assert_eq!(
            allocate(Money::new(100), &[]),
            Err(AllocationError::EmptyPartySet)
        );
    }

    #[test]
    fn test_negative_total() {
        let err = allocate(Money::new(-1), &shares(&[1.0])).unwrap_err();
        assert!(matches!(err, AllocationError::NegativeAmount { amount: -1, .. }));
    }

    #[test]
    fn test_zero_total_allocates_zeros() {
        let result = allocate(Money::ZERO, &shares(&[0.25, 0.75])).unwrap();
        assert_eq!(result, vec![Money::ZERO, Money::ZERO]);
    }
}
