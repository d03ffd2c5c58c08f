//! Comparison document model and renderers (JSON/HTML).
//!
//! The document is the hand-off to an external document generator: RFQ
//! header, best offer, summary and line-item projections, with amounts already
//! formatted as decimal strings. Renderers never recompute prices; they read
//! the `ComparisonViewModel` produced by `rfq_pipeline`.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use rfq_core::{OfferStatus, Rfq, RfqStatus};
use rfq_io::IoError;
use rfq_pipeline::{Cell, ComparisonViewModel};
use serde::Serialize;
use thiserror::Error;

#[cfg(feature = "render_html")]
pub mod render_html;
#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_html")]
pub use render_html::render_html;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

pub const ENGINE_NAME: &str = "rfq-engine";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("nothing to export: the comparison has no offers")]
    EmptyComparison,
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ===== Model =====

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComparisonDocument {
    pub header: DocumentHeader,
    pub best_offer: Option<BestOfferLine>,
    pub summary: Vec<SummaryLine>,
    pub line_items: LineItemSection,
    pub footer: Footer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentHeader {
    pub rfq_id: String,
    pub title: String,
    pub status: RfqStatus,
    pub currency: String,
    pub items: Vec<HeaderItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderItem {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BestOfferLine {
    pub offer_id: String,
    pub seller_name: String,
    pub grand_total: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub offer_id: String,
    pub seller_name: String,
    pub status: OfferStatus,
    pub base_amount: String,
    pub vat: String,
    pub grand_total: String,
    pub is_best_offer: bool,
    pub is_partial: bool,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineItemSection {
    /// Seller names, in column order.
    pub columns: Vec<String>,
    pub rows: Vec<LineRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineRow {
    pub item_name: String,
    pub best_price: Option<String>,
    pub cells: Vec<CellView>,
}

/// One offer's line; `None` price fields mean "not available".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub available: bool,
    pub quantity: Option<u32>,
    pub unit_price: Option<String>,
    pub total: Option<String>,
    pub is_best: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Footer {
    /// `CMP:<sha256>` over the canonical bytes of the document body.
    pub export_id: String,
    pub engine: String,
}

/// Body hashed into the export id (everything but the footer).
#[derive(Serialize)]
struct Body<'a> {
    header: &'a DocumentHeader,
    best_offer: &'a Option<BestOfferLine>,
    summary: &'a [SummaryLine],
    line_items: &'a LineItemSection,
}

// ===== API =====

/// Build the export document for `rfq` from a comparison view model.
pub fn build_document(
    rfq: &Rfq,
    currency: &str,
    vm: &ComparisonViewModel,
) -> Result<ComparisonDocument, ReportError> {
    if vm.summary.is_empty() {
        return Err(ReportError::EmptyComparison);
    }

    let header = DocumentHeader {
        rfq_id: rfq.id.to_string(),
        title: rfq.title.clone(),
        status: rfq.status,
        currency: currency.to_string(),
        items: rfq
            .items
            .iter()
            .map(|i| HeaderItem { name: i.name.clone(), quantity: i.quantity, unit: i.unit.clone() })
            .collect(),
    };

    let best_offer = vm.summary.iter().find(|r| r.is_best_offer).map(|r| BestOfferLine {
        offer_id: r.offer_id.to_string(),
        seller_name: r.seller_name.clone(),
        grand_total: r.grand_total.to_string(),
    });

    let summary: Vec<SummaryLine> = vm
        .summary
        .iter()
        .map(|r| SummaryLine {
            offer_id: r.offer_id.to_string(),
            seller_name: r.seller_name.clone(),
            status: r.status,
            base_amount: r.base_amount.to_string(),
            vat: r.vat.to_string(),
            grand_total: r.grand_total.to_string(),
            is_best_offer: r.is_best_offer,
            is_partial: r.is_partial,
            note: r.note.clone(),
        })
        .collect();

    let line_items = LineItemSection {
        columns: vm.line_items.offers.iter().map(|c| c.seller_name.clone()).collect(),
        rows: vm
            .line_items
            .rows
            .iter()
            .map(|row| LineRow {
                item_name: row.item_name.clone(),
                best_price: row.best_price.map(|m| m.to_string()),
                cells: row.cells.iter().map(cell_view).collect(),
            })
            .collect(),
    };

    let export_id = rfq_io::export_id(&Body {
        header: &header,
        best_offer: &best_offer,
        summary: &summary,
        line_items: &line_items,
    })?;

    Ok(ComparisonDocument {
        header,
        best_offer,
        summary,
        line_items,
        footer: Footer { export_id, engine: format!("{ENGINE_NAME} {ENGINE_VERSION}") },
    })
}

fn cell_view(c: &Cell) -> CellView {
    match c {
        Cell::Available { quantity, unit_price, total, is_best } => CellView {
            available: true,
            quantity: Some(*quantity),
            unit_price: Some(unit_price.to_string()),
            total: Some(total.to_string()),
            is_best: *is_best,
        },
        Cell::NotAvailable => CellView {
            available: false,
            quantity: None,
            unit_price: None,
            total: None,
            is_best: false,
        },
    }
}

/// Format a decimal amount string ("4776.00") with a narrow no-break space
/// (U+202F) between thousands groups.
pub fn group_thousands(amount: &str) -> String {
    let (sign, body) = match amount.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", amount),
    };
    let (int_part, frac) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    let mut out = String::with_capacity(amount.len() + 8);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('\u{202F}');
        }
        out.push(ch);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

// ===== Generators =====

/// External document generator seam: turns a document into a file.
pub trait DocumentGenerator {
    /// File name written inside the output directory.
    fn file_name(&self) -> &'static str;

    fn render(&self, doc: &ComparisonDocument) -> Result<Vec<u8>, ReportError>;

    /// Render and write atomically into `out_dir`; returns the written path.
    fn generate(&self, doc: &ComparisonDocument, out_dir: &Path) -> Result<PathBuf, ReportError> {
        let path = out_dir.join(self.file_name());
        let bytes = self.render(doc)?;
        rfq_io::write_bytes_atomic(&path, &bytes)?;
        tracing::info!(path = %path.display(), export_id = %doc.footer.export_id, "comparison exported");
        Ok(path)
    }
}

/// Pretty JSON in fixed section order.
#[cfg(feature = "render_json")]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonGenerator;

#[cfg(feature = "render_json")]
impl DocumentGenerator for JsonGenerator {
    fn file_name(&self) -> &'static str {
        "comparison.json"
    }

    fn render(&self, doc: &ComparisonDocument) -> Result<Vec<u8>, ReportError> {
        let mut bytes = serde_json::to_vec_pretty(&render_json(doc))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Self-contained HTML page.
#[cfg(feature = "render_html")]
#[derive(Debug, Clone)]
pub struct HtmlGenerator {
    pub lang: String,
}

#[cfg(feature = "render_html")]
impl Default for HtmlGenerator {
    fn default() -> Self {
        Self { lang: "en".to_string() }
    }
}

#[cfg(feature = "render_html")]
impl DocumentGenerator for HtmlGenerator {
    fn file_name(&self) -> &'static str {
        "comparison.html"
    }

    fn render(&self, doc: &ComparisonDocument) -> Result<Vec<u8>, ReportError> {
        Ok(render_html(doc, &self.lang).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands("0.50"), "0.50");
        assert_eq!(group_thousands("999.00"), "999.00");
        assert_eq!(group_thousands("4776.00"), "4\u{202F}776.00");
        assert_eq!(group_thousands("-1234567.89"), "-1\u{202F}234\u{202F}567.89");
    }
}
