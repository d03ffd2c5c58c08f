//! Screen navigation as an explicit state machine.
//!
//! `ComparisonSession` owns the only mutable session state: the current
//! `Screen`, the open RFQ and the `SelectionGuard`. Every transition is a
//! method that either moves to the next screen or returns a `NavError` and
//! leaves the session untouched.

use rfq_core::{OfferId, RfqId};
use serde::Serialize;
use thiserror::Error;

use crate::compare::ComparisonViewModel;
use crate::selection::{SelectionError, SelectionGuard, SelectionSet, Toggled};
use crate::OfferPool;

/// Screens a preview can be opened from (and returns to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewOrigin {
    OfferSelection,
    SummaryComparison,
    LineItemComparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Listing,
    Detail,
    OfferSelection,
    SummaryComparison,
    LineItemComparison,
    PdfPreview { return_to: PreviewOrigin },
}

impl From<PreviewOrigin> for Screen {
    fn from(o: PreviewOrigin) -> Self {
        match o {
            PreviewOrigin::OfferSelection => Screen::OfferSelection,
            PreviewOrigin::SummaryComparison => Screen::SummaryComparison,
            PreviewOrigin::LineItemComparison => Screen::LineItemComparison,
        }
    }
}

impl Screen {
    fn preview_origin(self) -> Option<PreviewOrigin> {
        match self {
            Screen::OfferSelection => Some(PreviewOrigin::OfferSelection),
            Screen::SummaryComparison => Some(PreviewOrigin::SummaryComparison),
            Screen::LineItemComparison => Some(PreviewOrigin::LineItemComparison),
            _ => None,
        }
    }

    fn is_comparison(self) -> bool {
        matches!(self, Screen::SummaryComparison | Screen::LineItemComparison)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("cannot {action} from {from:?}")]
    InvalidTransition { from: Screen, action: &'static str },
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("offer pool belongs to RFQ {found}, session has {expected:?} open")]
    PoolMismatch { expected: Option<RfqId>, found: RfqId },
}

/// One user's navigation session. Starts on `Listing`; there is no terminal state.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    screen: Screen,
    current_rfq: Option<RfqId>,
    guard: SelectionGuard,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self { screen: Screen::Listing, current_rfq: None, guard: SelectionGuard::new() }
    }

    pub fn current_state(&self) -> Screen {
        self.screen
    }

    pub fn current_rfq(&self) -> Option<&RfqId> {
        self.current_rfq.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet {
        self.guard.selection()
    }

    fn invalid(&self, action: &'static str) -> NavError {
        NavError::InvalidTransition { from: self.screen, action }
    }

    fn go(&mut self, next: Screen) {
        tracing::debug!(from = ?self.screen, to = ?next, "screen transition");
        self.screen = next;
    }

    fn check_pool(&self, pool: &OfferPool) -> Result<(), NavError> {
        if self.current_rfq.as_ref() != Some(pool.rfq_id()) {
            return Err(NavError::PoolMismatch {
                expected: self.current_rfq.clone(),
                found: pool.rfq_id().clone(),
            });
        }
        Ok(())
    }

    /// Listing -> Detail.
    pub fn open_rfq(&mut self, id: RfqId) -> Result<(), NavError> {
        if self.screen != Screen::Listing {
            return Err(self.invalid("open an RFQ"));
        }
        self.current_rfq = Some(id);
        self.go(Screen::Detail);
        Ok(())
    }

    /// Detail -> Listing.
    pub fn back_to_listing(&mut self) -> Result<(), NavError> {
        if self.screen != Screen::Detail {
            return Err(self.invalid("go back to the listing"));
        }
        self.current_rfq = None;
        self.go(Screen::Listing);
        Ok(())
    }

    /// Detail -> OfferSelection with a fresh selection. Stays on Detail when
    /// nobody has quoted.
    pub fn begin_selection(&mut self, pool: &OfferPool) -> Result<(), NavError> {
        if self.screen != Screen::Detail {
            return Err(self.invalid("start offer selection"));
        }
        self.check_pool(pool)?;
        if !pool.has_quotes() {
            return Err(SelectionError::NoQuotesAvailable.into());
        }
        self.guard.clear();
        self.go(Screen::OfferSelection);
        Ok(())
    }

    /// Add or remove `id`. Only offers of `pool` can be added.
    pub fn toggle(&mut self, pool: &OfferPool, id: &OfferId) -> Result<Toggled, NavError> {
        if self.screen != Screen::OfferSelection {
            return Err(self.invalid("toggle an offer"));
        }
        self.check_pool(pool)?;
        if !self.guard.selection().contains(id) && pool.get(id).is_none() {
            return Err(SelectionError::UnknownOffer(id.clone()).into());
        }
        Ok(self.guard.toggle(id)?)
    }

    /// OfferSelection -> SummaryComparison, gated by `can_compare`.
    pub fn compare(&mut self, pool: &OfferPool) -> Result<(), NavError> {
        if self.screen != Screen::OfferSelection {
            return Err(self.invalid("compare"));
        }
        self.check_pool(pool)?;
        self.guard.can_compare(pool)?;
        self.go(Screen::SummaryComparison);
        Ok(())
    }

    pub fn show_line_items(&mut self) -> Result<(), NavError> {
        if self.screen != Screen::SummaryComparison {
            return Err(self.invalid("show line items"));
        }
        self.go(Screen::LineItemComparison);
        Ok(())
    }

    pub fn show_summary(&mut self) -> Result<(), NavError> {
        if self.screen != Screen::LineItemComparison {
            return Err(self.invalid("show the summary"));
        }
        self.go(Screen::SummaryComparison);
        Ok(())
    }

    /// Back from a comparison view; the selection is kept.
    pub fn back_to_selection(&mut self) -> Result<(), NavError> {
        if !self.screen.is_comparison() {
            return Err(self.invalid("go back to offer selection"));
        }
        self.go(Screen::OfferSelection);
        Ok(())
    }

    /// Back to the RFQ detail; the selection is cleared.
    pub fn back_to_detail(&mut self) -> Result<(), NavError> {
        if self.screen.preview_origin().is_none() {
            return Err(self.invalid("go back to the RFQ detail"));
        }
        self.guard.clear();
        self.go(Screen::Detail);
        Ok(())
    }

    pub fn open_preview(&mut self) -> Result<(), NavError> {
        let Some(origin) = self.screen.preview_origin() else {
            return Err(self.invalid("open the preview"));
        };
        if self.guard.selection().is_empty() {
            return Err(SelectionError::NothingSelected.into());
        }
        self.go(Screen::PdfPreview { return_to: origin });
        Ok(())
    }

    /// Return to wherever the preview was opened from, selection intact.
    pub fn close_preview(&mut self) -> Result<(), NavError> {
        let Screen::PdfPreview { return_to } = self.screen else {
            return Err(self.invalid("close the preview"));
        };
        self.go(return_to.into());
        Ok(())
    }

    /// Comparison projections for the current selection. Only meaningful on
    /// comparison screens and on a preview opened from them.
    pub fn comparison(&self, pool: &OfferPool) -> Result<ComparisonViewModel, NavError> {
        let shows_comparison = match self.screen {
            Screen::PdfPreview { return_to } => Screen::from(return_to).is_comparison(),
            s => s.is_comparison(),
        };
        if !shows_comparison {
            return Err(self.invalid("build a comparison"));
        }
        self.check_pool(pool)?;
        Ok(pool.compare(self.guard.selection()))
    }
}
