//! Offer normalization: `VendorSubmission` + `Rfq` → `SellerOffer`.
//!
//! Contract:
//! - Submissions without `submitted_rfq` or without an amount are excluded
//!   (`Ok(None)`), never turned into offers.
//! - Itemized submissions (`lines`) keep the vendor's own line totals; RFQ items
//!   the vendor did not price make the offer `Partial`.
//! - Aggregate-only submissions are split across every RFQ item through the
//!   given `PriceSplitter`; such offers are always `Full`.
//! - Pure: the same RFQ, submission and splitter always give the same offer,
//!   independent of any other submission. No I/O; only trace logging.

use std::collections::BTreeSet;

use rfq_core::{CoreError, Money, OfferId, ProposalItem, QuotedLine, Rfq, RfqId, SellerOffer, VendorSubmission};
use thiserror::Error;

use crate::split::{PriceSplitter, SplitError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("submission {offer} belongs to RFQ {found}, not {expected}")]
    ForeignSubmission { offer: OfferId, expected: RfqId, found: RfqId },
    #[error("submission {offer}: negative amount {amount}")]
    NegativeAmount { offer: OfferId, amount: Money },
    #[error("submission {offer}: line for unknown item {item:?}")]
    UnknownItem { offer: OfferId, item: String },
    #[error("submission {offer}: item {item:?} quoted more than once")]
    DuplicateItem { offer: OfferId, item: String },
    #[error("submission {offer}: negative line total for item {item:?}")]
    NegativeLine { offer: OfferId, item: String },
    #[error("submission {offer}: split failed: {source}")]
    Split { offer: OfferId, #[source] source: SplitError },
    #[error("submission {offer}: {source}")]
    Core { offer: OfferId, #[source] source: CoreError },
}

/// Normalize one submission against its RFQ.
pub fn normalize(
    rfq: &Rfq,
    submission: &VendorSubmission,
    splitter: &dyn PriceSplitter,
) -> Result<Option<SellerOffer>, NormalizeError> {
    let offer = &submission.id;
    if submission.rfq_id != rfq.id {
        return Err(NormalizeError::ForeignSubmission {
            offer: offer.clone(),
            expected: rfq.id.clone(),
            found: submission.rfq_id.clone(),
        });
    }

    let amount = match (submission.submitted_rfq, submission.amount) {
        (true, Some(a)) => a,
        _ => {
            tracing::debug!(offer = %offer, "submission has no quote; excluded");
            return Ok(None);
        }
    };
    if amount.is_negative() {
        return Err(NormalizeError::NegativeAmount { offer: offer.clone(), amount });
    }

    let items = match &submission.lines {
        Some(lines) => itemized(rfq, offer, lines)?,
        None => split_aggregate(rfq, offer, amount, splitter)?,
    };

    let seller = SellerOffer::new(
        offer.clone(),
        submission.vendor_name.clone(),
        amount,
        submission.note.clone(),
        items,
        &rfq.items,
    )
    .map_err(|source| NormalizeError::Core { offer: offer.clone(), source })?;

    tracing::debug!(
        offer = %offer,
        status = ?seller.status(),
        grand_total = %seller.grand_total(),
        "normalized submission"
    );
    Ok(Some(seller))
}

fn item_id(offer: &OfferId, ix: usize) -> String {
    format!("{offer}-{}", ix + 1)
}

/// Vendor-provided lines, emitted in RFQ item order.
fn itemized(rfq: &Rfq, offer: &OfferId, lines: &[QuotedLine]) -> Result<Vec<ProposalItem>, NormalizeError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for line in lines {
        if rfq.item(&line.item_name).is_none() {
            return Err(NormalizeError::UnknownItem { offer: offer.clone(), item: line.item_name.clone() });
        }
        if !seen.insert(line.item_name.as_str()) {
            return Err(NormalizeError::DuplicateItem { offer: offer.clone(), item: line.item_name.clone() });
        }
    }

    let mut out = Vec::with_capacity(lines.len());
    for rfq_item in &rfq.items {
        let Some(line) = lines.iter().find(|l| l.item_name == rfq_item.name) else {
            continue;
        };
        let total = line
            .line_total()
            .map_err(|source| NormalizeError::Core { offer: offer.clone(), source })?;
        if total.is_negative() || line.unit_price.is_negative() {
            return Err(NormalizeError::NegativeLine { offer: offer.clone(), item: line.item_name.clone() });
        }
        out.push(ProposalItem {
            id: item_id(offer, out.len()),
            item_name: line.item_name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            total,
        });
    }
    Ok(out)
}

/// Synthesized lines: one per RFQ item with the RFQ quantity.
fn split_aggregate(
    rfq: &Rfq,
    offer: &OfferId,
    amount: Money,
    splitter: &dyn PriceSplitter,
) -> Result<Vec<ProposalItem>, NormalizeError> {
    let totals = splitter
        .split(offer, amount, &rfq.items)
        .map_err(|source| NormalizeError::Split { offer: offer.clone(), source })?;

    Ok(rfq
        .items
        .iter()
        .zip(totals)
        .enumerate()
        .map(|(ix, (item, total))| ProposalItem {
            id: item_id(offer, ix),
            item_name: item.name.clone(),
            quantity: item.quantity,
            unit_price: total.per_unit(item.quantity),
            total,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::{ProportionalSplit, SeededSplit};
    use rfq_core::{OfferStatus, RfqItem, RfqStatus};

    fn rfq() -> Rfq {
        Rfq {
            id: "R1".parse().unwrap(),
            title: "Fasteners".into(),
            items: vec![
                RfqItem { name: "Bolt".into(), quantity: 100, unit: "pcs".into() },
                RfqItem { name: "Nut".into(), quantity: 300, unit: "pcs".into() },
            ],
            invited_vendors: vec!["Acme".into(), "Beta".into()],
            status: RfqStatus::Ongoing,
        }
    }

    fn submission(id: &str, amount: Option<&str>) -> VendorSubmission {
        VendorSubmission {
            id: id.parse().unwrap(),
            rfq_id: "R1".parse().unwrap(),
            vendor_name: format!("Vendor {id}"),
            location: "Lyon".into(),
            submitted_rfq: amount.is_some(),
            submission_date: Some("2024-05-02".into()),
            amount: amount.map(|a| a.parse().unwrap()),
            note: None,
            lines: None,
        }
    }

    #[test]
    fn aggregate_is_split_into_full_offer() {
        let o = normalize(&rfq(), &submission("S1", Some("400.00")), &ProportionalSplit)
            .unwrap()
            .unwrap();
        assert_eq!(o.status(), OfferStatus::Full);
        assert_eq!(o.items().len(), 2);
        assert_eq!(o.items()[0].total, Money::from_major(100));
        assert_eq!(o.items()[1].total, Money::from_major(300));
        assert_eq!(o.items()[0].unit_price, Money::from_major(1));
        assert_eq!(o.items()[0].id, "S1-1");
        assert_eq!(o.grand_total(), Money::from_major(480));
        assert_eq!(o.vat(), Money::from_major(80));
    }

    #[test]
    fn not_submitted_is_excluded() {
        assert_eq!(normalize(&rfq(), &submission("S2", None), &ProportionalSplit).unwrap(), None);

        let mut flagged_without_amount = submission("S3", Some("10"));
        flagged_without_amount.amount = None;
        assert_eq!(normalize(&rfq(), &flagged_without_amount, &ProportionalSplit).unwrap(), None);

        let mut amount_not_submitted = submission("S4", Some("10"));
        amount_not_submitted.submitted_rfq = false;
        assert_eq!(normalize(&rfq(), &amount_not_submitted, &ProportionalSplit).unwrap(), None);
    }

    #[test]
    fn itemized_missing_line_is_partial() {
        let mut s = submission("S5", Some("90.00"));
        s.lines = Some(vec![QuotedLine {
            item_name: "Bolt".into(),
            quantity: 100,
            unit_price: Money::from_minor(90),
            total: None,
        }]);
        let o = normalize(&rfq(), &s, &ProportionalSplit).unwrap().unwrap();
        assert_eq!(o.status(), OfferStatus::Partial);
        assert_eq!(o.items().len(), 1);
        assert_eq!(o.item("Bolt").unwrap().total, Money::from_major(90));
        assert!(o.item("Nut").is_none());
    }

    #[test]
    fn itemized_errors() {
        let line = |name: &str| QuotedLine {
            item_name: name.into(),
            quantity: 1,
            unit_price: Money::from_major(1),
            total: None,
        };
        let mut s = submission("S6", Some("2"));
        s.lines = Some(vec![line("Screw")]);
        assert!(matches!(
            normalize(&rfq(), &s, &ProportionalSplit),
            Err(NormalizeError::UnknownItem { .. })
        ));
        s.lines = Some(vec![line("Bolt"), line("Bolt")]);
        assert!(matches!(
            normalize(&rfq(), &s, &ProportionalSplit),
            Err(NormalizeError::DuplicateItem { .. })
        ));
    }

    #[test]
    fn foreign_and_negative() {
        let mut s = submission("S7", Some("5"));
        s.rfq_id = "R2".parse().unwrap();
        assert!(matches!(
            normalize(&rfq(), &s, &ProportionalSplit),
            Err(NormalizeError::ForeignSubmission { .. })
        ));
        let s = submission("S8", Some("-5"));
        assert!(matches!(
            normalize(&rfq(), &s, &ProportionalSplit),
            Err(NormalizeError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn seeded_normalization_is_repeatable() {
        let splitter = SeededSplit::new(7);
        let s = submission("S9", Some("1000.00"));
        let first = normalize(&rfq(), &s, &splitter).unwrap().unwrap();
        let second = normalize(&rfq(), &s, &splitter).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.items().iter().map(|p| p.total).sum::<Money>(), Money::from_major(1000));
    }
}
