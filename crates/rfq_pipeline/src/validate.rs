//! Structural & semantic validation of one RFQ and its submissions, run before
//! normalization. Deterministic output: issues are sorted by
//! (code, where, message).

use std::collections::{BTreeMap, BTreeSet};

use rfq_core::{entities::check_date, Money, OfferId, Rfq, RfqId, VendorSubmission};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Rfq(RfqId),
    Item(String),
    Submission(OfferId),
    Vendor(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// pass = no `Error` issue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

pub fn validate(rfq: &Rfq, submissions: &[VendorSubmission]) -> ValidationReport {
    let mut issues = Vec::new();

    issues.extend(check_rfq_items(rfq));
    issues.extend(check_submission_ids(submissions));
    issues.extend(check_vendors(rfq, submissions));
    for sub in submissions {
        issues.extend(check_submission(rfq, sub));
    }

    sort_issues_stably(&mut issues);

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

fn issue(severity: Severity, code: &'static str, message: String, where_: EntityRef) -> ValidationIssue {
    ValidationIssue { severity, code, message, where_ }
}

/// Errors: "Rfq.NoItems", "Item.DuplicateName"
/// Warnings: "Item.ZeroQuantity"
fn check_rfq_items(rfq: &Rfq) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    if rfq.items.is_empty() {
        out.push(issue(
            Severity::Error,
            "Rfq.NoItems",
            format!("RFQ {} requests no items", rfq.id),
            EntityRef::Rfq(rfq.id.clone()),
        ));
    }
    let mut seen = BTreeSet::new();
    for item in &rfq.items {
        if !seen.insert(item.name.as_str()) {
            out.push(issue(
                Severity::Error,
                "Item.DuplicateName",
                format!("item {:?} listed more than once", item.name),
                EntityRef::Item(item.name.clone()),
            ));
        }
        if item.quantity == 0 {
            out.push(issue(
                Severity::Warning,
                "Item.ZeroQuantity",
                format!("item {:?} has quantity 0", item.name),
                EntityRef::Item(item.name.clone()),
            ));
        }
    }
    out
}

/// Errors: "Submission.DuplicateId"
fn check_submission_ids(submissions: &[VendorSubmission]) -> Vec<ValidationIssue> {
    let mut seen = BTreeSet::new();
    submissions
        .iter()
        .filter(|s| !seen.insert(&s.id))
        .map(|s| {
            issue(
                Severity::Error,
                "Submission.DuplicateId",
                format!("submission id {} used more than once", s.id),
                EntityRef::Submission(s.id.clone()),
            )
        })
        .collect()
}

/// Warnings: "Vendor.MultipleSubmissions", "Vendor.NotInvited"
fn check_vendors(rfq: &Rfq, submissions: &[VendorSubmission]) -> Vec<ValidationIssue> {
    let mut per_vendor: BTreeMap<&str, usize> = BTreeMap::new();
    for s in submissions.iter().filter(|s| s.rfq_id == rfq.id) {
        *per_vendor.entry(s.vendor_name.as_str()).or_default() += 1;
    }

    let mut out = Vec::new();
    for (vendor, n) in per_vendor {
        if n > 1 {
            out.push(issue(
                Severity::Warning,
                "Vendor.MultipleSubmissions",
                format!("vendor {vendor:?} has {n} submissions"),
                EntityRef::Vendor(vendor.to_string()),
            ));
        }
        // An empty invitation list means the RFQ was open.
        if !rfq.invited_vendors.is_empty() && !rfq.invited_vendors.iter().any(|v| v == vendor) {
            out.push(issue(
                Severity::Warning,
                "Vendor.NotInvited",
                format!("vendor {vendor:?} was not invited"),
                EntityRef::Vendor(vendor.to_string()),
            ));
        }
    }
    out
}

/// Errors: "Submission.ForeignRfq", "Submission.NegativeAmount",
/// "Line.UnknownItem", "Line.Duplicate", "Line.Negative", "Line.Overflow"
/// Warnings: "Submission.MissingAmount", "Submission.BadDate", "Lines.SumMismatch"
fn check_submission(rfq: &Rfq, sub: &VendorSubmission) -> Vec<ValidationIssue> {
    let at = || EntityRef::Submission(sub.id.clone());
    let mut out = Vec::new();

    if sub.rfq_id != rfq.id {
        out.push(issue(
            Severity::Error,
            "Submission.ForeignRfq",
            format!("submission {} belongs to RFQ {}, not {}", sub.id, sub.rfq_id, rfq.id),
            at(),
        ));
        return out;
    }

    if let Some(date) = &sub.submission_date {
        if check_date(date).is_err() {
            out.push(issue(
                Severity::Warning,
                "Submission.BadDate",
                format!("submission {}: date {date:?} is not YYYY-MM-DD", sub.id),
                at(),
            ));
        }
    }

    match (sub.submitted_rfq, sub.amount) {
        (true, None) => out.push(issue(
            Severity::Warning,
            "Submission.MissingAmount",
            format!("submission {} is marked submitted but has no amount; excluded", sub.id),
            at(),
        )),
        (_, Some(a)) if a.is_negative() => out.push(issue(
            Severity::Error,
            "Submission.NegativeAmount",
            format!("submission {}: negative amount {a}", sub.id),
            at(),
        )),
        _ => {}
    }

    let Some(lines) = &sub.lines else {
        return out;
    };

    let mut seen = BTreeSet::new();
    let mut sum: Option<Money> = Some(Money::ZERO);
    for line in lines {
        if rfq.item(&line.item_name).is_none() {
            out.push(issue(
                Severity::Error,
                "Line.UnknownItem",
                format!("submission {}: line for unknown item {:?}", sub.id, line.item_name),
                at(),
            ));
        }
        if !seen.insert(line.item_name.as_str()) {
            out.push(issue(
                Severity::Error,
                "Line.Duplicate",
                format!("submission {}: item {:?} quoted more than once", sub.id, line.item_name),
                at(),
            ));
        }
        let total = match line.line_total() {
            Ok(t) => Some(t),
            Err(_) => {
                out.push(issue(
                    Severity::Error,
                    "Line.Overflow",
                    format!(
                        "submission {}: {} x {} for item {:?} does not fit an amount",
                        sub.id, line.quantity, line.unit_price, line.item_name
                    ),
                    at(),
                ));
                None
            }
        };
        if line.unit_price.is_negative() || total.map_or(false, Money::is_negative) {
            out.push(issue(
                Severity::Error,
                "Line.Negative",
                format!("submission {}: negative price for item {:?}", sub.id, line.item_name),
                at(),
            ));
        }
        sum = match (sum, total) {
            (Some(s), Some(t)) => s.checked_add(t),
            _ => None,
        };
    }

    if let (true, Some(amount), Some(sum)) = (sub.submitted_rfq, sub.amount, sum) {
        if sum != amount {
            out.push(issue(
                Severity::Warning,
                "Lines.SumMismatch",
                format!("submission {}: lines sum to {sum}, amount is {amount}", sub.id),
                at(),
            ));
        }
    }
    out
}

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfq_core::{QuotedLine, RfqItem, RfqStatus};

    fn rfq() -> Rfq {
        Rfq {
            id: "R1".parse().unwrap(),
            title: "Office".into(),
            items: vec![
                RfqItem { name: "Chair".into(), quantity: 4, unit: "pcs".into() },
                RfqItem { name: "Desk".into(), quantity: 2, unit: "pcs".into() },
            ],
            invited_vendors: vec!["Acme".into(), "Beta".into()],
            status: RfqStatus::Ongoing,
        }
    }

    fn sub(id: &str, vendor: &str, amount: Option<i64>) -> VendorSubmission {
        VendorSubmission {
            id: id.parse().unwrap(),
            rfq_id: "R1".parse().unwrap(),
            vendor_name: vendor.into(),
            location: "Paris".into(),
            submitted_rfq: true,
            submission_date: Some("2024-03-01".into()),
            amount: amount.map(Money::from_major),
            note: None,
            lines: None,
        }
    }

    fn line(item: &str, qty: u32, unit: i64) -> QuotedLine {
        QuotedLine { item_name: item.into(), quantity: qty, unit_price: Money::from_major(unit), total: None }
    }

    fn codes(r: &ValidationReport) -> Vec<&'static str> {
        r.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_dataset_passes() {
        let r = validate(&rfq(), &[sub("S1", "Acme", Some(100)), sub("S2", "Beta", Some(90))]);
        assert!(r.pass);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn structural_errors_fail() {
        let mut bad_rfq = rfq();
        bad_rfq.items.push(RfqItem { name: "Desk".into(), quantity: 0, unit: "pcs".into() });
        let mut neg = sub("S2", "Beta", Some(-1));
        neg.lines = Some(vec![line("Lamp", 1, 5), line("Desk", 1, 5), line("Desk", 1, 5)]);
        let r = validate(&bad_rfq, &[sub("S1", "Acme", Some(1)), sub("S1", "Acme", Some(2)), neg]);
        assert!(!r.pass);
        let c = codes(&r);
        for code in [
            "Item.DuplicateName",
            "Item.ZeroQuantity",
            "Submission.DuplicateId",
            "Submission.NegativeAmount",
            "Line.UnknownItem",
            "Line.Duplicate",
            "Vendor.MultipleSubmissions",
        ] {
            assert!(c.contains(&code), "missing {code} in {c:?}");
        }
    }

    #[test]
    fn overflowing_line_is_an_error() {
        let mut huge = sub("S1", "Acme", Some(100));
        huge.lines = Some(vec![QuotedLine {
            item_name: "Chair".into(),
            quantity: 4,
            unit_price: Money::from_minor(i64::MAX / 2),
            total: None,
        }]);
        let r = validate(&rfq(), &[huge]);
        assert!(!r.pass);
        assert_eq!(codes(&r), ["Line.Overflow"]);
        assert_eq!(r.issues[0].where_, EntityRef::Submission("S1".parse().unwrap()));
    }

    #[test]
    fn warnings_do_not_fail() {
        let mut missing = sub("S1", "Acme", None);
        missing.submission_date = Some("01/03/2024".into());
        let mut mismatch = sub("S2", "Gamma", Some(500));
        mismatch.lines = Some(vec![line("Chair", 4, 50), line("Desk", 2, 100)]);
        let r = validate(&rfq(), &[missing, mismatch]);
        assert!(r.pass);
        assert_eq!(
            codes(&r),
            ["Lines.SumMismatch", "Submission.BadDate", "Submission.MissingAmount", "Vendor.NotInvited"]
        );
        assert_eq!(r.warnings().count(), 4);
        assert_eq!(r.errors().count(), 0);
    }

    #[test]
    fn foreign_submission_is_one_error() {
        let mut s = sub("S1", "Acme", Some(10));
        s.rfq_id = "R2".parse().unwrap();
        let r = validate(&rfq(), &[s]);
        assert_eq!(codes(&r), ["Submission.ForeignRfq"]);
        assert!(!r.pass);
    }

    #[test]
    fn ordering_is_stable() {
        let subs = [sub("S2", "Zed", Some(1)), sub("S1", "Yan", Some(1))];
        let a = validate(&rfq(), &subs);
        let mut rev = subs.to_vec();
        rev.reverse();
        let b = validate(&rfq(), &rev);
        assert_eq!(a, b);
    }
}
