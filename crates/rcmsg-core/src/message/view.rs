//! Serialized shape of a message.

use serde::Serialize;

use crate::domain::{Details, ErrorState, MessageType};

/// Borrowed view of a message, as sent to logs and transports.
///
/// The field list is fixed here and in the variant's `Details` struct.
/// The names used here are listed in
/// [`RESERVED_FIELDS`](crate::domain::RESERVED_FIELDS); details must not
/// reuse them.
/// Fetch intent, client, signal and generation never appear; the cache slot
/// appears as `_cached` only when it holds text.
#[derive(Debug, Serialize)]
pub struct MessageView<'a, D: Details> {
    pub raw: &'a str,

    #[serde(rename = "type")]
    pub message_type: &'a MessageType,

    pub error: &'a ErrorState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errmsg: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errdetails: Option<&'a serde_json::Value>,

    #[serde(skip_serializing_if = "is_zero")]
    pub retries: u32,

    #[serde(rename = "_cached", skip_serializing_if = "Option::is_none")]
    pub cached: Option<&'a str>,

    #[serde(flatten)]
    pub details: &'a D,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}
