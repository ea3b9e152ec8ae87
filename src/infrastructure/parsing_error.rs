//! Parsing error types for listing page extraction
//!
//! Raised while turning one product card into a record. The pipeline decides,
//! per its failure policy, whether an error skips the product or ends the run.

use thiserror::Error;

use crate::domain::ValueParseError;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in HTML")]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid CSS selector for {name}: {selector} - {reason}")]
    InvalidSelector {
        name: String,
        selector: String,
        reason: String,
    },

    #[error("Invalid value for '{field}': {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: ValueParseError,
    },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: Option<String>,
    },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(str::to_string),
        }
    }

    pub fn invalid_selector(name: &str, selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            name: name.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_value(field: &str, source: ValueParseError) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            source,
        }
    }

    /// Name of the field the error is about, when it concerns a single field
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RequiredFieldMissing { field, .. } | Self::InvalidValue { field, .. } => Some(field),
            Self::InvalidSelector { .. } | Self::UrlResolutionFailed { .. } => None,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
