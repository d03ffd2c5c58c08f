// crates/rfq_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure comparison algorithms over `rfq_core` types.
//!
//! Nothing here mutates an offer; every function takes borrowed snapshots and
//! is safe to recompute on each selection change.

pub use rfq_core::{Money, OfferId, OfferStatus, ProposalItem, SellerOffer};

// ----------------------------- Normalization ---------------------------------

pub mod normalize;

pub use normalize::{normalize, NormalizeError};

// ----------------------------- Price split seam ------------------------------

pub mod split {
    // File modules (actual implementations)
    pub mod proportional;
    #[cfg(feature = "seeded_split")]
    pub mod seeded;

    use rfq_core::{Money, OfferId, RfqItem};
    use thiserror::Error;

    pub use proportional::ProportionalSplit;
    #[cfg(feature = "seeded_split")]
    pub use seeded::SeededSplit;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum SplitError {
        #[error("cannot split a non-zero amount across zero items")]
        NoItems,
        #[error("cannot split a non-zero amount: every item has quantity 0")]
        ZeroWeight,
        #[error("cannot split a negative amount")]
        NegativeTotal,
    }

    /// Turns a vendor's single aggregate amount into per-item line totals.
    ///
    /// Implementations must return exactly one non-negative total per item,
    /// in item order, summing to `total`. The result depends only on the
    /// arguments: splitting the same offer twice gives the same lines, whatever
    /// was split before it.
    pub trait PriceSplitter {
        fn split(&self, offer: &OfferId, total: Money, items: &[RfqItem]) -> Result<Vec<Money>, SplitError>;
    }
}

pub use split::{PriceSplitter, ProportionalSplit, SplitError};
#[cfg(feature = "seeded_split")]
pub use split::SeededSplit;

// ----------------------------- Resolvers -------------------------------------

pub mod best_offer;
pub mod best_price;
pub mod union;

pub use best_offer::best_offer;
pub use best_price::{best_price, best_price_holders, is_best_price};
pub use union::item_union;
