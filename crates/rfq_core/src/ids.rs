//! crates/rfq_core/src/ids.rs
//! Identifier newtypes for RFQs and offers.
//! ASCII-only, strict token shape; no I/O.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

const TOKEN_MAX_LEN: usize = 64;

/// Token: ^[A-Za-z0-9_.:-]{1,64}$ (ASCII only)
#[inline]
pub fn is_valid_token(s: &str) -> bool {
    let bs = s.as_bytes();
    let len = bs.len();
    if len == 0 || len > TOKEN_MAX_LEN {
        return false;
    }
    bs.iter().all(|&b| {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b':' || b == b'-'
    })
}

macro_rules! token_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_token(s) { Ok(Self(s.to_owned())) } else { Err(CoreError::InvalidId) }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        #[cfg(feature = "serde")]
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                use serde::de::{Error as _, Unexpected};
                let s = String::deserialize(d)?;
                s.parse().map_err(|_| {
                    D::Error::invalid_value(Unexpected::Str(&s), &"token [A-Za-z0-9_.:-], len 1..=64")
                })
            }
        }
    }
}

token_newtype!(
    /// Request-for-quotation identifier.
    RfqId
);
token_newtype!(
    /// Offer identifier. Equal to the id of the vendor submission it was derived from.
    OfferId
);
