//! Best price per item: the minimum line total among the offers that quote it.
//!
//! Offers without the item do not participate (an absent line is "not
//! available", never zero). Every offer tied at the minimum is a holder.

use rfq_core::{Money, OfferId, SellerOffer};

/// Minimum line total for `item_name`, or `None` if no offer contains it.
pub fn best_price<'a, I>(item_name: &str, offers: I) -> Option<Money>
where
    I: IntoIterator<Item = &'a SellerOffer>,
{
    offers
        .into_iter()
        .filter_map(|o| o.item(item_name).map(|p| p.total))
        .min()
}

/// Every offer whose line total for `item_name` equals the minimum, in input order.
pub fn best_price_holders<'a, I>(item_name: &str, offers: I) -> Vec<OfferId>
where
    I: IntoIterator<Item = &'a SellerOffer>,
{
    let quoted: Vec<(&OfferId, Money)> = offers
        .into_iter()
        .filter_map(|o| o.item(item_name).map(|p| (o.id(), p.total)))
        .collect();
    let Some(min) = quoted.iter().map(|(_, t)| *t).min() else {
        return Vec::new();
    };
    quoted
        .into_iter()
        .filter(|(_, t)| *t == min)
        .map(|(id, _)| id.clone())
        .collect()
}

/// True iff `offer` quotes `item_name` at the minimum across `offers`.
pub fn is_best_price<'a, I>(item_name: &str, offer: &SellerOffer, offers: I) -> bool
where
    I: IntoIterator<Item = &'a SellerOffer>,
{
    match (offer.item(item_name), best_price(item_name, offers)) {
        (Some(line), Some(min)) => line.total == min,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfq_core::ProposalItem;

    fn offer(id: &str, lines: &[(&str, i64)]) -> SellerOffer {
        let items = lines
            .iter()
            .map(|(n, t)| ProposalItem {
                id: format!("{id}-{n}"),
                item_name: (*n).into(),
                quantity: 1,
                unit_price: Money::from_major(*t),
                total: Money::from_major(*t),
            })
            .collect();
        SellerOffer::new(id.parse().unwrap(), id, Money::from_major(1), None, items, &[]).unwrap()
    }

    #[test]
    fn minimum_and_single_holder() {
        let s1 = offer("S1", &[("Widget", 100)]);
        let s2 = offer("S2", &[("Widget", 90)]);
        let s3 = offer("S3", &[("Widget", 95)]);
        let all = [&s1, &s2, &s3];
        assert_eq!(best_price("Widget", all), Some(Money::from_major(90)));
        assert_eq!(best_price_holders("Widget", all), vec![s2.id().clone()]);
        assert!(is_best_price("Widget", &s2, all));
        assert!(!is_best_price("Widget", &s1, all));
    }

    #[test]
    fn ties_mark_every_holder() {
        let s1 = offer("S1", &[("Bolt", 40)]);
        let s2 = offer("S2", &[("Bolt", 50)]);
        let s3 = offer("S3", &[("Bolt", 40)]);
        let holders = best_price_holders("Bolt", [&s1, &s2, &s3]);
        assert_eq!(holders, vec![s1.id().clone(), s3.id().clone()]);
    }

    #[test]
    fn absent_item_does_not_compete() {
        let s1 = offer("S1", &[("Nut", 12)]);
        let s2 = offer("S2", &[("Nut", 15)]);
        let s3 = offer("S3", &[("Bolt", 1)]);
        let all = [&s1, &s2, &s3];
        assert_eq!(best_price("Nut", all), Some(Money::from_major(12)));
        assert!(!is_best_price("Nut", &s3, all));
        assert_eq!(best_price("Washer", all), None);
        assert!(best_price_holders("Washer", all).is_empty());
    }
}
