use core::fmt;

/// Minimal error set for core-domain validation & parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CoreError {
    InvalidId,
    InvalidAmount(String),
    InvalidDate,
    AmountOverflow,
    DomainOutOfRange(&'static str),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidId => write!(f, "invalid id"),
            CoreError::InvalidAmount(s) => write!(f, "invalid amount: {s}"),
            CoreError::InvalidDate => write!(f, "invalid date (expected YYYY-MM-DD)"),
            CoreError::AmountOverflow => write!(f, "amount overflow"),
            CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
        }
    }
}

impl std::error::Error for CoreError {}
