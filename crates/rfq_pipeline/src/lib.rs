//! Session-level surface of the comparison engine
//! (validate → normalize → offer pool → select → compare → navigate).
//!
//! This crate stays I/O-free: records come in as plain `rfq_core` values and
//! everything going out (view models, validation reports) is serializable.
//! Algorithms live in `rfq_algo`; this crate wires them to session state.

#![forbid(unsafe_code)]

pub mod compare;
pub mod reminders;
pub mod selection;
pub mod state;
pub mod validate;

use std::collections::BTreeSet;

use rfq_algo::{normalize, NormalizeError, PriceSplitter, ProportionalSplit, SeededSplit};
use rfq_core::{
    variables::{validate_domains, Params, SplitPolicy},
    CoreError, OfferId, Rfq, RfqId, SellerOffer, VendorSubmission,
};
use thiserror::Error;

pub use compare::{build_comparison, Cell, ComparisonViewModel, LineItemRow, LineItemTable, OfferColumn, SummaryRow};
pub use reminders::{pending_vendors, send_reminders, LogReminderSender, ReminderError, ReminderSender};
pub use selection::{toggle_selection, SelectionError, SelectionGuard, SelectionSet, Toggled, MAX_COMPARE_OFFERS};
pub use state::{ComparisonSession, NavError, PreviewOrigin, Screen};
pub use validate::{validate, EntityRef, Severity, ValidationIssue, ValidationReport};

/// Single error surface for pool assembly.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parameter domain error: {0}")]
    Params(#[from] CoreError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("duplicate offer id {0}")]
    DuplicateOffer(OfferId),
    #[error("validation failed with {errors} error(s); first: {first}")]
    Validation { errors: usize, first: String },
}

/// All normalized offers of one RFQ. Read-only once built.
#[derive(Debug, Clone)]
pub struct OfferPool {
    rfq_id: RfqId,
    offers: Vec<SellerOffer>,
    pending_vendors: Vec<String>,
}

impl OfferPool {
    pub fn rfq_id(&self) -> &RfqId { &self.rfq_id }
    pub fn offers(&self) -> &[SellerOffer] { &self.offers }

    /// Vendors invited (or known from a submission) that have not quoted yet.
    pub fn pending_vendors(&self) -> &[String] { &self.pending_vendors }

    /// Number of quote-submitted vendors.
    pub fn quoted_count(&self) -> usize { self.offers.len() }

    pub fn has_quotes(&self) -> bool { !self.offers.is_empty() }

    pub fn get(&self, id: &OfferId) -> Option<&SellerOffer> {
        self.offers.iter().find(|o| o.id() == id)
    }

    pub fn compare(&self, selection: &SelectionSet) -> ComparisonViewModel {
        build_comparison(&self.offers, selection)
    }
}

/// Splitter configured by `params`.
pub fn splitter_for(params: &Params) -> Result<Box<dyn PriceSplitter>, CoreError> {
    validate_domains(params)?;
    Ok(match (params.split_policy, params.split_seed) {
        (SplitPolicy::Seeded, Some(seed)) => Box::new(SeededSplit::new(seed)),
        (SplitPolicy::Seeded, None) => {
            return Err(CoreError::DomainOutOfRange("split_seed (required by seeded split)"))
        }
        (SplitPolicy::Proportional, _) => Box::new(ProportionalSplit),
    })
}

/// Normalize every submission of `rfq` into an offer pool.
///
/// Submissions are processed in the given order, which is also the pool order.
/// Each offer depends only on its own submission, so the order never changes
/// an offer's lines.
pub fn build_pool(
    rfq: &Rfq,
    submissions: &[VendorSubmission],
    params: &Params,
) -> Result<OfferPool, PipelineError> {
    let splitter = splitter_for(params)?;
    let mut offers = Vec::new();
    let mut seen: BTreeSet<OfferId> = BTreeSet::new();

    for sub in submissions {
        if !seen.insert(sub.id.clone()) {
            return Err(PipelineError::DuplicateOffer(sub.id.clone()));
        }
        if let Some(offer) = normalize(rfq, sub, splitter.as_ref())? {
            offers.push(offer);
        }
    }

    let pending = pending_vendors(rfq, submissions);
    tracing::info!(
        rfq = %rfq.id,
        submissions = submissions.len(),
        offers = offers.len(),
        pending = pending.len(),
        "offer pool built"
    );

    Ok(OfferPool {
        rfq_id: rfq.id.clone(),
        offers,
        pending_vendors: pending,
    })
}

/// Validate, then build the pool; any validation error aborts.
pub fn build_pool_checked(
    rfq: &Rfq,
    submissions: &[VendorSubmission],
    params: &Params,
) -> Result<(OfferPool, ValidationReport), PipelineError> {
    let report = validate(rfq, submissions);
    if !report.pass {
        let errors: Vec<&ValidationIssue> =
            report.issues.iter().filter(|i| i.severity == Severity::Error).collect();
        return Err(PipelineError::Validation {
            errors: errors.len(),
            first: errors.first().map(|i| i.message.clone()).unwrap_or_default(),
        });
    }
    for w in report.issues.iter().filter(|i| i.severity == Severity::Warning) {
        tracing::warn!(code = w.code, "{}", w.message);
    }
    let pool = build_pool(rfq, submissions, params)?;
    Ok((pool, report))
}
