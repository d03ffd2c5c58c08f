//! Domain entities: RFQs, vendor submissions and the normalized `SellerOffer`.
//!
//! `SellerOffer::new` is the only constructor of an offer; it derives VAT and
//! grand total from the base amount and the full/partial status from the RFQ
//! item list, so both invariants hold for every offer that exists.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::fmt;

use crate::errors::CoreError;
use crate::ids::{OfferId, RfqId};
use crate::money::Money;

/// RFQ lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RfqStatus {
    Ongoing,
    Completed,
}

impl RfqStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RfqStatus::Ongoing => "ongoing",
            RfqStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested line of an RFQ.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RfqItem {
    pub name: String,
    pub quantity: u32,
    /// Unit of measure ("pcs", "kg", ...).
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rfq {
    pub id: RfqId,
    pub title: String,
    pub items: Vec<RfqItem>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub invited_vendors: Vec<String>,
    pub status: RfqStatus,
}

impl Rfq {
    /// Mark the RFQ completed. Returns `false` if it already was.
    pub fn complete(&mut self) -> bool {
        match self.status {
            RfqStatus::Ongoing => {
                self.status = RfqStatus::Completed;
                true
            }
            RfqStatus::Completed => false,
        }
    }

    pub fn item(&self, name: &str) -> Option<&RfqItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// A vendor-priced line, when the vendor itemizes its quote.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuotedLine {
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// Explicit line total; defaults to `quantity * unit_price`.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub total: Option<Money>,
}

impl QuotedLine {
    pub fn line_total(&self) -> Result<Money, CoreError> {
        match self.total {
            Some(t) => Ok(t),
            None => self
                .unit_price
                .checked_mul_qty(self.quantity)
                .ok_or(CoreError::AmountOverflow),
        }
    }
}

/// A vendor's response to an RFQ. One per vendor per RFQ; immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VendorSubmission {
    pub id: OfferId,
    pub rfq_id: RfqId,
    pub vendor_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: String,
    pub submitted_rfq: bool,
    /// YYYY-MM-DD
    #[cfg_attr(feature = "serde", serde(default))]
    pub submission_date: Option<String>,
    /// Aggregate amount, excluding tax.
    #[cfg_attr(feature = "serde", serde(default))]
    pub amount: Option<Money>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub lines: Option<Vec<QuotedLine>>,
}

impl VendorSubmission {
    /// True iff this submission is eligible to become a `SellerOffer`.
    #[inline]
    pub fn has_quote(&self) -> bool {
        self.submitted_rfq && self.amount.is_some()
    }
}

/// Strict `YYYY-MM-DD` shape check (calendar ranges only, no leap-year math).
pub fn check_date(s: &str) -> Result<(), CoreError> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return Err(CoreError::InvalidDate);
    }
    let digits = |r: core::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    if !(digits(0..4) && digits(5..7) && digits(8..10)) {
        return Err(CoreError::InvalidDate);
    }
    let month: u8 = s[5..7].parse().map_err(|_| CoreError::InvalidDate)?;
    let day: u8 = s[8..10].parse().map_err(|_| CoreError::InvalidDate)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(CoreError::InvalidDate);
    }
    Ok(())
}

/// Offer eligibility status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OfferStatus {
    Full,
    Partial,
}

impl OfferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OfferStatus::Full => "full",
            OfferStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProposalItem {
    pub id: String,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
}

/// Normalized, itemized offer. Derived on demand; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SellerOffer {
    id: OfferId,
    seller_name: String,
    status: OfferStatus,
    base_amount: Money,
    vat: Money,
    grand_total: Money,
    note: Option<String>,
    items: Vec<ProposalItem>,
}

impl SellerOffer {
    /// Build an offer. `status` is `Full` iff `items` names every entry of
    /// `required_items`.
    pub fn new(
        id: OfferId,
        seller_name: impl Into<String>,
        base_amount: Money,
        note: Option<String>,
        items: Vec<ProposalItem>,
        required_items: &[RfqItem],
    ) -> Result<Self, CoreError> {
        let covers_all = required_items
            .iter()
            .all(|r| items.iter().any(|p| p.item_name == r.name));
        let status = if covers_all { OfferStatus::Full } else { OfferStatus::Partial };
        Ok(Self {
            id,
            seller_name: seller_name.into(),
            status,
            base_amount,
            vat: base_amount.vat(),
            grand_total: base_amount.with_vat()?,
            note,
            items,
        })
    }

    pub fn id(&self) -> &OfferId { &self.id }
    pub fn seller_name(&self) -> &str { &self.seller_name }
    pub fn status(&self) -> OfferStatus { self.status }
    pub fn is_full(&self) -> bool { self.status == OfferStatus::Full }
    pub fn base_amount(&self) -> Money { self.base_amount }
    pub fn vat(&self) -> Money { self.vat }
    pub fn grand_total(&self) -> Money { self.grand_total }
    pub fn note(&self) -> Option<&str> { self.note.as_deref() }
    pub fn items(&self) -> &[ProposalItem] { &self.items }

    /// Line for `item_name` (exact, case-sensitive match).
    pub fn item(&self, item_name: &str) -> Option<&ProposalItem> {
        self.items.iter().find(|p| p.item_name == item_name)
    }
}
