//! Fetch errors: what a message stores, what a client reports and what an
//! awaiting caller receives.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error slot of a message.
///
/// The code is caller-defined; the core stores, clears and propagates it
/// without interpreting it. On the wire `None` renders as `false` and a code
/// renders as its string, matching the feed's established message shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorState {
    #[default]
    None,
    Code(String),
}

impl ErrorState {
    pub fn is_none(&self) -> bool {
        matches!(self, ErrorState::None)
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ErrorState::None => None,
            ErrorState::Code(code) => Some(code),
        }
    }
}

impl Serialize for ErrorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorState::None => serializer.serialize_bool(false),
            ErrorState::Code(code) => serializer.serialize_str(code),
        }
    }
}

/// Failure reported by whoever performs the property lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl FetchFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: serde_json::Value::Null,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// What an awaited fetch handle settles with when it does not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The driver marked the message as errored.
    #[error("fetch failed ({code}): {message}")]
    Failed { code: String, message: String },

    /// A later `fetch` on the same message replaced this signal.
    #[error("fetch superseded by a later fetch on the same message")]
    Superseded,

    /// The message was cleaned up (or dropped) before the signal settled.
    #[error("fetch abandoned before it settled")]
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_state_serializes_like_the_feed() {
        assert_eq!(serde_json::to_value(ErrorState::None).unwrap(), false);
        assert_eq!(
            serde_json::to_value(ErrorState::Code("timeout".into())).unwrap(),
            "timeout"
        );
    }

    #[test]
    fn failed_error_mentions_code() {
        let err = FetchError::Failed {
            code: "timeout".into(),
            message: "fetch timed out".into(),
        };
        assert_eq!(err.to_string(), "fetch failed (timeout): fetch timed out");
    }
}
