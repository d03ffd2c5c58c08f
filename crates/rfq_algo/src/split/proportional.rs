//! Quantity-weighted split of an aggregate amount (integers only).
//!
//! Contract:
//! - Weights are item quantities; each item gets `floor(total * w_i / W)`.
//! - The leftover minor units (< number of items) go one each by largest
//!   remainder; ties by larger weight, then item order.
//! - Lines are non-negative and sum exactly to `total`.
//!
//! Determinism:
//! - No RNG here; the same inputs always give the same lines.

use rfq_core::{Money, OfferId, RfqItem};

use super::{PriceSplitter, SplitError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalSplit;

impl PriceSplitter for ProportionalSplit {
    fn split(&self, _offer: &OfferId, total: Money, items: &[RfqItem]) -> Result<Vec<Money>, SplitError> {
        let weights: Vec<u128> = items.iter().map(|i| u128::from(i.quantity)).collect();
        largest_remainder(total, &weights)
    }
}

/// Distribute `total` across `weights` by largest remainder.
pub(crate) fn largest_remainder(total: Money, weights: &[u128]) -> Result<Vec<Money>, SplitError> {
    if total.is_negative() {
        return Err(SplitError::NegativeTotal);
    }
    if total == Money::ZERO {
        return Ok(vec![Money::ZERO; weights.len()]);
    }
    if weights.is_empty() {
        return Err(SplitError::NoItems);
    }
    let w_sum: u128 = weights.iter().sum();
    if w_sum == 0 {
        return Err(SplitError::ZeroWeight);
    }

    let t = total.minor() as u128;
    let mut floors: Vec<u128> = Vec::with_capacity(weights.len());
    let mut ranking: Vec<(usize, u128, u128)> = Vec::with_capacity(weights.len());
    for (ix, &w) in weights.iter().enumerate() {
        let share = t * w;
        floors.push(share / w_sum);
        ranking.push((ix, share % w_sum, w));
    }

    let assigned: u128 = floors.iter().sum();
    let leftover = (t - assigned) as usize;

    // remainder desc, weight desc, item order asc
    ranking.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    for &(ix, _, _) in ranking.iter().take(leftover) {
        floors[ix] += 1;
    }

    // Each floor is <= total, which fits in i64.
    Ok(floors.into_iter().map(|f| Money::from_minor(f as i64)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(total: i64, items: &[RfqItem]) -> Result<Vec<Money>, SplitError> {
        ProportionalSplit.split(&"S1".parse().unwrap(), Money::from_minor(total), items)
    }

    fn items(qtys: &[u32]) -> Vec<RfqItem> {
        qtys.iter()
            .enumerate()
            .map(|(i, &q)| RfqItem { name: format!("item-{i}"), quantity: q, unit: "pcs".into() })
            .collect()
    }

    #[test]
    fn splits_by_quantity() {
        let lines = split(1000, &items(&[1, 3])).unwrap();
        assert_eq!(lines, vec![Money::from_minor(250), Money::from_minor(750)]);
    }

    #[test]
    fn leftover_goes_to_largest_remainder() {
        // 100 / 3 each -> 33 r1 ; one leftover goes to the first (all tie).
        let lines = split(100, &items(&[1, 1, 1])).unwrap();
        assert_eq!(lines.iter().copied().sum::<Money>(), Money::from_minor(100));
        assert_eq!(lines[0], Money::from_minor(34));
        assert_eq!(lines[1], Money::from_minor(33));
    }

    #[test]
    fn zero_quantity_item_gets_nothing() {
        let lines = split(999, &items(&[0, 2])).unwrap();
        assert_eq!(lines, vec![Money::ZERO, Money::from_minor(999)]);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(split(1, &[]), Err(SplitError::NoItems));
        assert_eq!(split(1, &items(&[0, 0])), Err(SplitError::ZeroWeight));
        assert_eq!(split(-1, &items(&[1])), Err(SplitError::NegativeTotal));
        assert_eq!(split(0, &[]).unwrap(), vec![]);
    }
}
