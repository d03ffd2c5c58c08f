//! Core types, integer money, entities, parameters and a seeded RNG.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`rfq_io`, `rfq_algo`, `rfq_pipeline`, `rfq_report`, `rfq_cli`).
//!
//! - Ids: `RfqId`, `OfferId` (token charset, strict shape)
//! - Money in integer minor units; VAT at a fixed 20 % (half-even rounding)
//! - Entities: `Rfq`, `VendorSubmission`, `SellerOffer`, `ProposalItem`
//! - `Params` with explicit wire tokens and domain validation
//! - Seedable RNG (ChaCha20) for the price split seam **only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod entities;
pub mod errors;
pub mod ids;
pub mod money;
pub mod rng;
pub mod variables;

pub use entities::{
    OfferStatus, ProposalItem, QuotedLine, Rfq, RfqItem, RfqStatus, SellerOffer, VendorSubmission,
};
pub use errors::CoreError;
pub use ids::{OfferId, RfqId};
pub use money::Money;
pub use variables::{Params, SplitPolicy};
