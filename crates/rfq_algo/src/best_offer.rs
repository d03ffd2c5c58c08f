//! Best offer: lowest grand total among `Full` offers.
//!
//! Partial offers are never candidates, even when they are the cheapest
//! overall. With no full offer there is no winner (`None`), which is not an
//! error. Ties keep the earliest candidate in input order.

use rfq_core::SellerOffer;

pub fn best_offer<'a, I>(offers: I) -> Option<&'a SellerOffer>
where
    I: IntoIterator<Item = &'a SellerOffer>,
{
    let mut best: Option<&'a SellerOffer> = None;
    for offer in offers.into_iter().filter(|o| o.is_full()) {
        match best {
            Some(b) if b.grand_total() <= offer.grand_total() => {}
            _ => best = Some(offer),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfq_core::{Money, ProposalItem, RfqItem};

    fn required() -> Vec<RfqItem> {
        vec![RfqItem { name: "Widget".into(), quantity: 1, unit: "pcs".into() }]
    }

    fn offer(id: &str, base: i64, full: bool) -> SellerOffer {
        let items = if full {
            vec![ProposalItem {
                id: format!("{id}-1"),
                item_name: "Widget".into(),
                quantity: 1,
                unit_price: Money::from_major(base),
                total: Money::from_major(base),
            }]
        } else {
            vec![]
        };
        SellerOffer::new(id.parse().unwrap(), id, Money::from_major(base), None, items, &required()).unwrap()
    }

    #[test]
    fn partial_never_wins() {
        let s1 = offer("S1", 1000, true);
        let s2 = offer("S2", 800, false);
        let best = best_offer([&s1, &s2]).unwrap();
        assert_eq!(best.id().as_str(), "S1");
    }

    #[test]
    fn no_full_offer_means_no_winner() {
        let s1 = offer("S1", 10, false);
        let s2 = offer("S2", 20, false);
        assert!(best_offer([&s1, &s2]).is_none());
        assert!(best_offer(std::iter::empty::<&SellerOffer>()).is_none());
    }

    #[test]
    fn cheapest_full_and_first_on_tie() {
        let s1 = offer("S1", 500, true);
        let s2 = offer("S2", 300, true);
        let s3 = offer("S3", 300, true);
        assert_eq!(best_offer([&s1, &s2, &s3]).unwrap().id().as_str(), "S2");
        assert_eq!(best_offer([&s3, &s2, &s1]).unwrap().id().as_str(), "S3");
    }
}
