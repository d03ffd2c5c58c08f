//! Reminders for vendors that have not quoted yet.
//!
//! Delivery is fire-and-forget: a failed send is logged and skipped, never
//! propagated to the comparison flow.

use std::collections::BTreeSet;

use rfq_core::{Rfq, RfqId, VendorSubmission};
use thiserror::Error;

use crate::OfferPool;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reminder to {vendor} failed: {reason}")]
pub struct ReminderError {
    pub vendor: String,
    pub reason: String,
}

/// Outbound notification channel (mail, SMS, ...).
pub trait ReminderSender {
    fn send(&mut self, rfq: &RfqId, vendor: &str) -> Result<(), ReminderError>;
}

/// Sender that only records the reminder in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReminderSender;

impl ReminderSender for LogReminderSender {
    fn send(&mut self, rfq: &RfqId, vendor: &str) -> Result<(), ReminderError> {
        tracing::info!(rfq = %rfq, vendor, "reminder sent");
        Ok(())
    }
}

/// Vendors without a submitted quote: invited vendors in invitation order,
/// then uninvited vendors that submitted without a quote. No duplicates.
pub fn pending_vendors(rfq: &Rfq, submissions: &[VendorSubmission]) -> Vec<String> {
    let own = || submissions.iter().filter(|s| s.rfq_id == rfq.id);
    let quoted: BTreeSet<&str> = own().filter(|s| s.has_quote()).map(|s| s.vendor_name.as_str()).collect();

    let mut seen = BTreeSet::new();
    rfq.invited_vendors
        .iter()
        .map(String::as_str)
        .chain(own().map(|s| s.vendor_name.as_str()))
        .filter(|v| !quoted.contains(v) && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Remind every pending vendor of `pool`. Returns the number of reminders
/// delivered.
pub fn send_reminders(pool: &OfferPool, sender: &mut dyn ReminderSender) -> usize {
    let mut sent = 0;
    for vendor in pool.pending_vendors() {
        match sender.send(pool.rfq_id(), vendor) {
            Ok(()) => sent += 1,
            Err(e) => tracing::warn!(rfq = %pool.rfq_id(), vendor = %vendor, error = %e, "reminder dropped"),
        }
    }
    sent
}
