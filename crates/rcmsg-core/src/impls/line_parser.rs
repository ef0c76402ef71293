//! LineParser - grammar-free parser for fixed-type feeds
//!
//! Every non-blank line becomes one message with the configured type tag.
//! Feeds that need real classification plug their own `Parser` in.

use std::sync::Arc;

use crate::domain::{Details, MessageType};
use crate::message::Message;
use crate::ports::{Parser, ParserContext};

pub struct LineParser {
    context: Arc<ParserContext>,
    message_type: MessageType,
}

impl LineParser {
    pub fn new(name: impl Into<String>, message_type: impl Into<MessageType>) -> Self {
        Self {
            context: Arc::new(ParserContext::new(name)),
            message_type: message_type.into(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let context = (*self.context).clone().with_source(source);
        self.context = Arc::new(context);
        self
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }
}

impl<D: Details> Parser<D> for LineParser {
    fn context(&self) -> &Arc<ParserContext> {
        &self.context
    }

    fn parse(&self, raw: &str) -> Option<Message<D>> {
        let line = raw.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }
        Some(Message::new(self, line, self.message_type.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Properties;
    use crate::kinds::EditDetails;

    #[test]
    fn parses_lines_with_fixed_type() {
        let parser = LineParser::new("irc", "edit").with_source("community.example.org");
        let msg: Message<EditDetails> = parser.parse("[[Page]] edited by X\r\n").unwrap();

        assert_eq!(msg.raw(), "[[Page]] edited by X");
        assert_eq!(msg.message_type().as_str(), "edit");
        assert_eq!(msg.parser().source.as_deref(), Some("community.example.org"));
    }

    #[test]
    fn skips_blank_lines() {
        let parser = LineParser::new("irc", "edit");
        let parsed: Option<Message<Properties>> = parser.parse("   \n");
        assert!(parsed.is_none());
    }
}
