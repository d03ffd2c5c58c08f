//! Comparison JSON renderer: header → best_offer → summary → line_items → footer.
//!
//! Relies on `serde_json`'s `preserve_order` feature: key order is the
//! insertion order below, not alphabetical.

use serde_json::{Map as JsonMap, Value};

use crate::{
    BestOfferLine, CellView, ComparisonDocument, DocumentHeader, Footer, LineItemSection, SummaryLine,
};

pub fn render_json(doc: &ComparisonDocument) -> Value {
    let mut root = obj();
    root.insert("header".into(), header_json(&doc.header));
    root.insert(
        "best_offer".into(),
        doc.best_offer.as_ref().map_or(Value::Null, best_offer_json),
    );
    root.insert("summary".into(), Value::Array(doc.summary.iter().map(summary_json).collect()));
    root.insert("line_items".into(), line_items_json(&doc.line_items));
    root.insert("footer".into(), footer_json(&doc.footer));
    Value::Object(root)
}

fn header_json(h: &DocumentHeader) -> Value {
    // rfq_id → title → status → currency → items[]
    let mut o = obj();
    o.insert("rfq_id".into(), s(&h.rfq_id));
    o.insert("title".into(), s(&h.title));
    o.insert("status".into(), s(h.status.as_str()));
    o.insert("currency".into(), s(&h.currency));
    let items = h
        .items
        .iter()
        .map(|i| {
            let mut it = obj();
            it.insert("name".into(), s(&i.name));
            it.insert("quantity".into(), i.quantity.into());
            it.insert("unit".into(), s(&i.unit));
            Value::Object(it)
        })
        .collect();
    o.insert("items".into(), Value::Array(items));
    Value::Object(o)
}

fn best_offer_json(b: &BestOfferLine) -> Value {
    let mut o = obj();
    o.insert("offer_id".into(), s(&b.offer_id));
    o.insert("seller_name".into(), s(&b.seller_name));
    o.insert("grand_total".into(), s(&b.grand_total));
    Value::Object(o)
}

fn summary_json(r: &SummaryLine) -> Value {
    let mut o = obj();
    o.insert("offer_id".into(), s(&r.offer_id));
    o.insert("seller_name".into(), s(&r.seller_name));
    o.insert("status".into(), s(r.status.as_str()));
    o.insert("base_amount".into(), s(&r.base_amount));
    o.insert("vat".into(), s(&r.vat));
    o.insert("grand_total".into(), s(&r.grand_total));
    o.insert("is_best_offer".into(), Value::Bool(r.is_best_offer));
    o.insert("is_partial".into(), Value::Bool(r.is_partial));
    // note only when present
    if let Some(n) = r.note.as_ref().filter(|n| !n.is_empty()) {
        o.insert("note".into(), s(n));
    }
    Value::Object(o)
}

fn line_items_json(l: &LineItemSection) -> Value {
    let mut o = obj();
    o.insert("columns".into(), Value::Array(l.columns.iter().map(|c| s(c)).collect()));
    let rows = l
        .rows
        .iter()
        .map(|row| {
            let mut r = obj();
            r.insert("item_name".into(), s(&row.item_name));
            r.insert("best_price".into(), row.best_price.as_deref().map_or(Value::Null, s));
            r.insert("cells".into(), Value::Array(row.cells.iter().map(cell_json).collect()));
            Value::Object(r)
        })
        .collect();
    o.insert("rows".into(), Value::Array(rows));
    Value::Object(o)
}

fn cell_json(c: &CellView) -> Value {
    let mut o = obj();
    if !c.available {
        o.insert("state".into(), s("not_available"));
        return Value::Object(o);
    }
    o.insert("state".into(), s("available"));
    if let Some(q) = c.quantity {
        o.insert("quantity".into(), q.into());
    }
    if let Some(p) = &c.unit_price {
        o.insert("unit_price".into(), s(p));
    }
    if let Some(t) = &c.total {
        o.insert("total".into(), s(t));
    }
    o.insert("is_best".into(), Value::Bool(c.is_best));
    Value::Object(o)
}

fn footer_json(f: &Footer) -> Value {
    let mut o = obj();
    o.insert("export_id".into(), s(&f.export_id));
    o.insert("engine".into(), s(&f.engine));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}

#[inline]
fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeaderItem, LineRow};
    use rfq_core::{OfferStatus, RfqStatus};

    fn doc() -> ComparisonDocument {
        ComparisonDocument {
            header: DocumentHeader {
                rfq_id: "R1".into(),
                title: "Paper".into(),
                status: RfqStatus::Ongoing,
                currency: "EUR".into(),
                items: vec![HeaderItem { name: "A4".into(), quantity: 10, unit: "box".into() }],
            },
            best_offer: None,
            summary: vec![SummaryLine {
                offer_id: "S1".into(),
                seller_name: "Acme".into(),
                status: OfferStatus::Partial,
                base_amount: "10.00".into(),
                vat: "2.00".into(),
                grand_total: "12.00".into(),
                is_best_offer: false,
                is_partial: true,
                note: Some(String::new()),
            }],
            line_items: LineItemSection {
                columns: vec!["Acme".into()],
                rows: vec![LineRow {
                    item_name: "A4".into(),
                    best_price: None,
                    cells: vec![CellView {
                        available: false,
                        quantity: None,
                        unit_price: None,
                        total: None,
                        is_best: false,
                    }],
                }],
            },
            footer: Footer { export_id: "CMP:00".into(), engine: "rfq-engine 0.1.0".into() },
        }
    }

    #[test]
    fn sections_in_fixed_order() {
        let v = render_json(&doc());
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["header", "best_offer", "summary", "line_items", "footer"]);
        let hk: Vec<&str> = v["header"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(hk, ["rfq_id", "title", "status", "currency", "items"]);
    }

    #[test]
    fn empty_note_and_missing_cells() {
        let v = render_json(&doc());
        assert!(v["summary"][0].get("note").is_none());
        assert_eq!(v["best_offer"], Value::Null);
        assert_eq!(v["line_items"]["rows"][0]["cells"][0], serde_json::json!({"state": "not_available"}));
        assert_eq!(v["summary"][0]["status"], "partial");
    }
}
