//! Engine parameters with safe defaults and domain validation.
//!
//! Notes:
//! - The VAT rate and the compare cap are fixed business constants and are
//!   deliberately not parameters.
//! - `split_seed` is only relevant when `split_policy == Seeded`.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::is_valid_token;

/// Define an enum with explicit wire tokens.
macro_rules! serde_enum {
    ($(#[$m:meta])* $name:ident => { $($variant:ident = $token:literal),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub fn as_token(self) -> &'static str {
                match self { $($name::$variant => $token,)+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_token()) }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

serde_enum!(
    /// How an aggregate quote is split into item lines when the vendor did not itemize.
    SplitPolicy => {
        Proportional = "proportional",
        Seeded       = "seeded"
    }
);

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    pub split_policy: SplitPolicy,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub split_seed: Option<u64>,
    /// ISO-like currency token used for display only.
    pub currency: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            split_policy: SplitPolicy::Proportional,
            split_seed: None,
            currency: "EUR".to_string(),
        }
    }
}

/// Validate parameter domains and cross-field requirements.
pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if p.split_policy == SplitPolicy::Seeded && p.split_seed.is_none() {
        return Err(CoreError::DomainOutOfRange("split_seed (required by seeded split)"));
    }
    if !is_valid_token(&p.currency) || p.currency.len() > 8 {
        return Err(CoreError::DomainOutOfRange("currency"));
    }
    Ok(())
}
