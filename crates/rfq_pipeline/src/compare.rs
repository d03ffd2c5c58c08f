//! Comparison projections (summary and line-item) for a selection.
//!
//! Both projections are recomputed from the offers on every call; nothing here
//! is cached or mutated. A missing line is `Cell::NotAvailable`, which never
//! counts as a price.

use rfq_algo::{best_offer, best_price, item_union};
use rfq_core::{Money, OfferId, OfferStatus, SellerOffer};
use serde::Serialize;

use crate::selection::SelectionSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonViewModel {
    pub summary: Vec<SummaryRow>,
    pub line_items: LineItemTable,
    /// Best full offer among the selected ones, if any.
    pub best_offer: Option<OfferId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub offer_id: OfferId,
    pub seller_name: String,
    pub status: OfferStatus,
    pub base_amount: Money,
    pub vat: Money,
    pub grand_total: Money,
    pub is_best_offer: bool,
    pub is_partial: bool,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferColumn {
    pub offer_id: OfferId,
    pub seller_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemTable {
    /// Column order = selection order.
    pub offers: Vec<OfferColumn>,
    /// One row per item of the union, sorted by name.
    pub rows: Vec<LineItemRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRow {
    pub item_name: String,
    pub best_price: Option<Money>,
    /// One cell per column, same order as `LineItemTable::offers`.
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Cell {
    Available {
        quantity: u32,
        unit_price: Money,
        total: Money,
        is_best: bool,
    },
    NotAvailable,
}

impl Cell {
    pub fn is_best(&self) -> bool {
        matches!(self, Cell::Available { is_best: true, .. })
    }
}

impl ComparisonViewModel {
    pub fn row(&self, item_name: &str) -> Option<&LineItemRow> {
        self.line_items.rows.iter().find(|r| r.item_name == item_name)
    }

    /// Cell of `offer` in the row for `item_name`.
    pub fn cell(&self, item_name: &str, offer: &OfferId) -> Option<&Cell> {
        let col = self.line_items.offers.iter().position(|c| &c.offer_id == offer)?;
        self.row(item_name).and_then(|r| r.cells.get(col))
    }
}

/// Build both projections for the offers of `pool_offers` named by `selection`.
///
/// Ids that are not in `pool_offers` are skipped.
pub fn build_comparison(pool_offers: &[SellerOffer], selection: &SelectionSet) -> ComparisonViewModel {
    let selected: Vec<&SellerOffer> = selection
        .iter()
        .filter_map(|id| {
            let found = pool_offers.iter().find(|o| o.id() == id);
            if found.is_none() {
                tracing::warn!(offer = %id, "selected offer not in pool; skipped");
            }
            found
        })
        .collect();

    let winner = best_offer(selected.iter().copied()).map(|o| o.id().clone());

    let summary = selected
        .iter()
        .map(|o| SummaryRow {
            offer_id: o.id().clone(),
            seller_name: o.seller_name().to_string(),
            status: o.status(),
            base_amount: o.base_amount(),
            vat: o.vat(),
            grand_total: o.grand_total(),
            is_best_offer: winner.as_ref() == Some(o.id()),
            is_partial: o.status() == OfferStatus::Partial,
            note: o.note().map(str::to_string),
        })
        .collect();

    let columns = selected
        .iter()
        .map(|o| OfferColumn { offer_id: o.id().clone(), seller_name: o.seller_name().to_string() })
        .collect();

    let rows = item_union(selected.iter().copied())
        .into_iter()
        .map(|name| {
            let min = best_price(&name, selected.iter().copied());
            let cells = selected
                .iter()
                .map(|o| match o.item(&name) {
                    Some(p) => Cell::Available {
                        quantity: p.quantity,
                        unit_price: p.unit_price,
                        total: p.total,
                        is_best: Some(p.total) == min,
                    },
                    None => Cell::NotAvailable,
                })
                .collect();
            LineItemRow { item_name: name, best_price: min, cells }
        })
        .collect();

    ComparisonViewModel {
        summary,
        line_items: LineItemTable { offers: columns, rows },
        best_offer: winner,
    }
}
