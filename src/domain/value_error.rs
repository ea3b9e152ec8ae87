//! Parse errors for domain value objects
//!
//! Shared by [`MoneyAmount`](super::money::MoneyAmount) and
//! [`ByteSize`](super::byte_size::ByteSize). These are structural failures:
//! callers decide whether to abort or skip, the value objects never default.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueParseError {
    #[error("Invalid {kind} format: '{input}'")]
    InvalidFormat { kind: &'static str, input: String },

    #[error("Invalid currency symbol: {symbol}. Valid symbols are: {valid}")]
    UnknownCurrency { symbol: String, valid: String },

    #[error("Invalid unit: {unit}. Valid units are: {valid}")]
    UnknownUnit { unit: String, valid: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValueParseError {
    pub(crate) fn invalid_format(kind: &'static str, input: &str) -> Self {
        Self::InvalidFormat {
            kind,
            input: input.to_string(),
        }
    }
}
