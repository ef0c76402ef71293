use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag assigned by the parser (`edit`, `log`, `discussion`, ...).
///
/// The tag is opaque to the core: it only travels with the message so that
/// drivers and modules can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageType(String);

impl MessageType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MessageType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let ty = MessageType::new("edit");
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"edit\"");
        assert_eq!(ty.to_string(), "edit");
    }
}
