//! Error types shared by the form core and the submission path.
//!
//! Every error here is recoverable: the UI turns it into a transient
//! notification and keeps running.

use crate::constants::{GENERIC_ERROR_MESSAGE, INVALID_DATA_MESSAGE};
use crate::types::Axis;

/// A value was outside the domain of the field it was assigned to.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error carrying a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reasons a coordinate text input is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The text is not a number.
    #[error("Should be number like 1.123, got {text}")]
    Parse {
        /// The raw text that failed to parse
        text: String,
    },
    /// The text is longer than the input accepts.
    #[error("Too large {axis} input. Try shorter numbers")]
    TooLong {
        /// The axis whose input overflowed
        axis: Axis,
    },
    /// The number parsed but the setter refused it.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures of a submission round trip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The endpoint rejected the point (HTTP 422).
    #[error("endpoint rejected the submitted point")]
    RemoteRejection,
    /// The endpoint answered with an unexpected status.
    #[error("endpoint answered with status {status}")]
    RemoteFailure {
        /// HTTP status code of the reply
        status: u16,
    },
    /// The request never produced a reply.
    #[error("request failed: {0}")]
    Transport(String),
    /// The reply body was not the expected JSON document.
    #[error("malformed response body: {0}")]
    Decode(String),
}

impl SubmitError {
    /// The fixed message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::RemoteRejection => INVALID_DATA_MESSAGE,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}
