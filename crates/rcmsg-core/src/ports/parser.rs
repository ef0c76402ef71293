//! Parser port - classifies raw feed lines into typed messages.
//!
//! The line grammar itself lives with the implementor; the core only needs
//! the parser's context to stamp onto every message it produces.

use std::sync::Arc;

use crate::domain::Details;
use crate::message::Message;

/// Source context shared by every message a parser produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserContext {
    /// Parser name, used in logs.
    pub name: String,

    /// Feed the lines come from (e.g. a wiki domain), if known.
    pub source: Option<String>,
}

impl ParserContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Parser produces messages from raw lines.
///
/// # Contract
/// - `parse` is synchronous and side-effect free
/// - lines that are not messages yield `None`
pub trait Parser<D: Details>: Send + Sync {
    fn context(&self) -> &Arc<ParserContext>;

    fn parse(&self, raw: &str) -> Option<Message<D>>;
}
