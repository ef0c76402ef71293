use thiserror::Error;

use crate::domain::{FetchError, MessageState};

#[derive(Debug, Error)]
pub enum RcError {
    #[error("duplicate module id={0}")]
    DuplicateModule(String),

    #[error("message is not retryable in state={0:?}")]
    NotRetryable(MessageState),

    #[error("message has not settled successfully, state={0:?}")]
    NotSettled(MessageState),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Returned by a module that cannot take the message.
    #[error("module={module} rejected the message: {reason}")]
    Rejected { module: String, reason: String },
}
