//! Offer selection bounded by `MAX_COMPARE_OFFERS`.
//!
//! Rejections are recoverable signals: a refused toggle leaves the selection
//! exactly as it was.

use rfq_core::OfferId;
use serde::Serialize;
use thiserror::Error;

use crate::OfferPool;

/// Maximum number of offers compared side by side.
pub const MAX_COMPARE_OFFERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection limit reached: at most {max} offers can be compared")]
    SelectionLimitReached { max: usize },
    #[error("no vendor has submitted a quote yet")]
    NoQuotesAvailable,
    #[error("no offer selected")]
    NothingSelected,
    #[error("offer {0} is not a quote in this pool")]
    UnknownOffer(OfferId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Ordered, deduplicated offer ids chosen for comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<OfferId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn contains(&self, id: &OfferId) -> bool { self.ids.contains(id) }
    pub fn ids(&self) -> &[OfferId] { &self.ids }
    pub fn iter(&self) -> impl Iterator<Item = &OfferId> { self.ids.iter() }
}

/// Owns a `SelectionSet` and enforces the compare cap on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionGuard {
    selection: SelectionSet,
}

impl SelectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_selection(selection: SelectionSet) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Remove `id` if selected, otherwise add it unless the cap is reached.
    pub fn toggle(&mut self, id: &OfferId) -> Result<Toggled, SelectionError> {
        if let Some(pos) = self.selection.ids.iter().position(|x| x == id) {
            self.selection.ids.remove(pos);
            return Ok(Toggled::Removed);
        }
        if self.selection.ids.len() >= MAX_COMPARE_OFFERS {
            tracing::debug!(offer = %id, "selection limit reached; toggle rejected");
            return Err(SelectionError::SelectionLimitReached { max: MAX_COMPARE_OFFERS });
        }
        self.selection.ids.push(id.clone());
        Ok(Toggled::Added)
    }

    /// `NoQuotesAvailable` takes precedence over `NothingSelected`; every
    /// selected id must name an offer of `pool`.
    pub fn can_compare(&self, pool: &OfferPool) -> Result<(), SelectionError> {
        if !pool.has_quotes() {
            return Err(SelectionError::NoQuotesAvailable);
        }
        if self.selection.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        if let Some(id) = self.selection.iter().find(|id| pool.get(id).is_none()) {
            return Err(SelectionError::UnknownOffer(id.clone()));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selection.ids.clear();
    }
}

/// Functional toggle: returns the new selection, or the rejection.
pub fn toggle_selection(selection: &SelectionSet, id: &OfferId) -> Result<SelectionSet, SelectionError> {
    let mut guard = SelectionGuard::from_selection(selection.clone());
    guard.toggle(id)?;
    Ok(guard.selection)
}
