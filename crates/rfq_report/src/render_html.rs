//! Deterministic, offline HTML renderer for a `ComparisonDocument`.
//!
//! Section order: header → best offer → summary → line items → footer.
//! Every document-provided string is escaped; no external assets.

use std::fmt::Write as _;

use crate::{group_thousands, CellView, ComparisonDocument};

// ------------------------- phrasebook -------------------------

#[derive(Copy, Clone)]
struct Phrase {
    key: &'static str,
    en: &'static str,
    fr: &'static str,
}

const PHRASES: &[Phrase] = &[
    Phrase { key: "title", en: "Quotation comparison", fr: "Comparaison des offres" },
    Phrase { key: "items", en: "Requested items", fr: "Articles demandés" },
    Phrase { key: "best_offer", en: "Best offer", fr: "Meilleure offre" },
    Phrase { key: "no_best", en: "No complete offer among the selection", fr: "Aucune offre complète dans la sélection" },
    Phrase { key: "summary", en: "Summary", fr: "Récapitulatif" },
    Phrase { key: "line_items", en: "Line items", fr: "Détail par article" },
    Phrase { key: "seller", en: "Seller", fr: "Fournisseur" },
    Phrase { key: "status", en: "Status", fr: "Statut" },
    Phrase { key: "base", en: "Amount excl. VAT", fr: "Montant HT" },
    Phrase { key: "vat", en: "VAT (20%)", fr: "TVA (20 %)" },
    Phrase { key: "grand", en: "Total incl. VAT", fr: "Total TTC" },
    Phrase { key: "note", en: "Note", fr: "Remarque" },
    Phrase { key: "item", en: "Item", fr: "Article" },
    Phrase { key: "best_price", en: "Best price", fr: "Meilleur prix" },
    Phrase { key: "full", en: "full", fr: "complète" },
    Phrase { key: "partial", en: "partial", fr: "partielle" },
    Phrase { key: "not_available", en: "not available", fr: "non disponible" },
    Phrase { key: "export_id", en: "Export id", fr: "Identifiant d'export" },
];

fn t(lang: &str, key: &'static str) -> &'static str {
    let fr = matches!(lang, "fr" | "fr-FR" | "fr-CA" | "fr_FR" | "fr_CA");
    PHRASES
        .iter()
        .find(|p| p.key == key)
        .map_or(key, |p| if fr { p.fr } else { p.en })
}

/// Escape text for HTML.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

// ------------------------- builder -------------------------

struct HtmlBuilder<'a> {
    lang: &'a str,
    currency: &'a str,
    buf: String,
}

impl<'a> HtmlBuilder<'a> {
    fn new(lang: &'a str, currency: &'a str) -> Self {
        Self { lang, currency, buf: String::with_capacity(16 * 1024) }
    }

    fn money(&self, amount: &str) -> String {
        format!("{} {}", group_thousands(amount), esc(self.currency))
    }

    fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"{}\"><head><meta charset=\"utf-8\">\
             <title>{}</title>\
             <style>\
             body{{font-family:system-ui,sans-serif;margin:24px;}}\
             table{{border-collapse:collapse;margin-bottom:16px}}\
             td,th{{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}}\
             td.num{{text-align:right}}\
             .best{{font-weight:bold;background:#e6f4ea}}\
             .na{{color:#888;font-style:italic}}\
             .muted{{opacity:0.8}}\
             </style></head><body>",
            esc(self.lang),
            esc(title)
        );
    }

    fn finish(mut self) -> String {
        self.buf.push_str("</body></html>");
        self.buf
    }

    fn section_header(&mut self, doc: &ComparisonDocument) {
        let h = &doc.header;
        let _ = write!(
            self.buf,
            "<h1>{}</h1><h2>{} <span class=\"muted\">({})</span></h2><h3>{}</h3><ul>",
            esc(t(self.lang, "title")),
            esc(&h.title),
            esc(&h.rfq_id),
            esc(t(self.lang, "items")),
        );
        for item in &h.items {
            let _ = write!(self.buf, "<li>{} × {} {}</li>", esc(&item.name), item.quantity, esc(&item.unit));
        }
        self.buf.push_str("</ul>");
    }

    fn section_best_offer(&mut self, doc: &ComparisonDocument) {
        let _ = write!(self.buf, "<h3>{}</h3>", esc(t(self.lang, "best_offer")));
        match &doc.best_offer {
            Some(b) => {
                let _ = write!(
                    self.buf,
                    "<p class=\"best\">{} ({}): {}</p>",
                    esc(&b.seller_name),
                    esc(&b.offer_id),
                    self.money(&b.grand_total)
                );
            }
            None => {
                let _ = write!(self.buf, "<p class=\"muted\">{}</p>", esc(t(self.lang, "no_best")));
            }
        }
    }

    fn section_summary(&mut self, doc: &ComparisonDocument) {
        let _ = write!(
            self.buf,
            "<h3>{}</h3><table><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>",
            esc(t(self.lang, "summary")),
            esc(t(self.lang, "seller")),
            esc(t(self.lang, "status")),
            esc(t(self.lang, "base")),
            esc(t(self.lang, "vat")),
            esc(t(self.lang, "grand")),
            esc(t(self.lang, "note")),
        );
        for r in &doc.summary {
            let status = match r.status {
                rfq_core::OfferStatus::Full => t(self.lang, "full"),
                rfq_core::OfferStatus::Partial => t(self.lang, "partial"),
            };
            let _ = write!(
                self.buf,
                "<tr{}><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
                 <td class=\"num\">{}</td><td>{}</td></tr>",
                if r.is_best_offer { " class=\"best\"" } else { "" },
                esc(&r.seller_name),
                esc(status),
                self.money(&r.base_amount),
                self.money(&r.vat),
                self.money(&r.grand_total),
                esc(r.note.as_deref().unwrap_or("")),
            );
        }
        self.buf.push_str("</table>");
    }

    fn section_line_items(&mut self, doc: &ComparisonDocument) {
        let l = &doc.line_items;
        let _ = write!(
            self.buf,
            "<h3>{}</h3><table><tr><th>{}</th>",
            esc(t(self.lang, "line_items")),
            esc(t(self.lang, "item"))
        );
        for c in &l.columns {
            let _ = write!(self.buf, "<th>{}</th>", esc(c));
        }
        let _ = write!(self.buf, "<th>{}</th></tr>", esc(t(self.lang, "best_price")));

        for row in &l.rows {
            let _ = write!(self.buf, "<tr><td>{}</td>", esc(&row.item_name));
            for cell in &row.cells {
                self.cell(cell);
            }
            let best = row.best_price.as_deref().map(|b| self.money(b)).unwrap_or_default();
            let _ = write!(self.buf, "<td class=\"num\">{best}</td></tr>");
        }
        self.buf.push_str("</table>");
    }

    fn cell(&mut self, c: &CellView) {
        match (&c.total, c.quantity, &c.unit_price) {
            (Some(total), Some(q), Some(unit)) if c.available => {
                let _ = write!(
                    self.buf,
                    "<td class=\"num{}\">{}<br><span class=\"muted\">{} × {}</span></td>",
                    if c.is_best { " best" } else { "" },
                    self.money(total),
                    q,
                    self.money(unit),
                );
            }
            _ => {
                let _ = write!(self.buf, "<td class=\"na\">{}</td>", esc(t(self.lang, "not_available")));
            }
        }
    }

    fn section_footer(&mut self, doc: &ComparisonDocument) {
        let _ = write!(
            self.buf,
            "<p class=\"muted\">{}: {} · {}</p>",
            esc(t(self.lang, "export_id")),
            esc(&doc.footer.export_id),
            esc(&doc.footer.engine),
        );
    }
}

/// Render the whole document. `lang` selects the phrasebook ("en" or "fr";
/// anything else falls back to English).
pub fn render_html(doc: &ComparisonDocument, lang: &str) -> String {
    let mut h = HtmlBuilder::new(lang, &doc.header.currency);
    h.start(&format!("{} · {}", t(lang, "title"), doc.header.title));
    h.section_header(doc);
    h.section_best_offer(doc);
    h.section_summary(doc);
    h.section_line_items(doc);
    h.section_footer(doc);
    h.finish()
}
