//! Message lifecycle state.

use serde::{Deserialize, Serialize};

/// Where a message is in its fetch lifecycle.
///
/// State transitions:
/// - Created -> Fetching -> Succeeded
/// - Created -> Fetching -> Failed -> Created (cleanup, retryable)
///
/// `Created` after a cleanup differs from a fresh one only by the retained
/// fetch intent and the retry counter kept on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageState {
    /// Parsed, nothing requested yet (or reset by cleanup).
    Created,

    /// A fetch was registered and its signal has not settled.
    Fetching,

    /// Details were fetched; interested modules may consume the message.
    Succeeded,

    /// The fetch failed; `cleanup` makes the message fetchable again.
    Failed,
}

impl MessageState {
    /// Is this a terminal state (consumed by interested modules next)?
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageState::Succeeded)
    }

    /// Can a driver clean up and fetch again?
    pub fn is_retryable(self) -> bool {
        matches!(self, MessageState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::created(MessageState::Created, false, false)]
    #[case::fetching(MessageState::Fetching, false, false)]
    #[case::succeeded(MessageState::Succeeded, true, false)]
    #[case::failed(MessageState::Failed, false, true)]
    fn classifies_states(
        #[case] state: MessageState,
        #[case] terminal: bool,
        #[case] retryable: bool,
    ) {
        assert_eq!(state.is_terminal(), terminal);
        assert_eq!(state.is_retryable(), retryable);
    }
}
