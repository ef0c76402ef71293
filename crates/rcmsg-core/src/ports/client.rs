//! Client port - looks up named properties for a message.

use async_trait::async_trait;

use crate::domain::{FetchFailure, MessageType, Properties};

/// Everything a client gets to see about the message it enriches.
#[derive(Debug, Clone, Copy)]
pub struct LookupRequest<'a> {
    pub message_type: &'a MessageType,
    pub raw: &'a str,
    pub properties: &'a [String],

    /// Number of cleanups the message went through before this lookup.
    pub retries: u32,
}

/// Client performs the out-of-band lookup (HTTP/API calls, caches, ...).
///
/// A client never touches the message itself: the enricher turns the
/// returned values or failure into `apply` + `resolve` or `mark_error`.
#[async_trait]
pub trait Client: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn lookup(&self, request: LookupRequest<'_>) -> Result<Properties, FetchFailure>;
}
