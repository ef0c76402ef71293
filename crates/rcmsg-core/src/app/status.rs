//! Status - message counts by lifecycle state.

use serde::{Deserialize, Serialize};

use crate::domain::MessageState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub created: usize,
    pub fetching: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl StateCounts {
    pub fn record(&mut self, state: MessageState) {
        match state {
            MessageState::Created => self.created += 1,
            MessageState::Fetching => self.fetching += 1,
            MessageState::Succeeded => self.succeeded += 1,
            MessageState::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.fetching + self.succeeded + self.failed
    }
}

impl FromIterator<MessageState> for StateCounts {
    fn from_iter<I: IntoIterator<Item = MessageState>>(iter: I) -> Self {
        let mut counts = Self::default();
        for state in iter {
            counts.record(state);
        }
        counts
    }
}
