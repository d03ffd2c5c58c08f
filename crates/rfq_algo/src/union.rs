//! Item union across offers (comparison table rows).

use std::collections::BTreeSet;

use rfq_core::SellerOffer;

/// Sorted (byte-lexicographic), deduplicated item names across all offers.
///
/// Names are compared exactly; "Bolt" and "bolt" are different rows.
pub fn item_union<'a, I>(offers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a SellerOffer>,
{
    let names: BTreeSet<&str> = offers
        .into_iter()
        .flat_map(|o| o.items().iter().map(|p| p.item_name.as_str()))
        .collect();
    names.into_iter().map(str::to_owned).collect()
}
