//! Test doubles shared by the app-layer tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Details;
use crate::error::RcError;
use crate::message::Message;
use crate::ports::Module;

/// Records the raw line of every message it consumes.
pub struct RecordingModule {
    id: String,
    fail: bool,
    seen: Mutex<Vec<String>>,
}

impl RecordingModule {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fail: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(id)
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl<D: Details> Module<D> for RecordingModule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn consume(&self, message: &Message<D>) -> Result<(), RcError> {
        if self.fail {
            return Err(RcError::Rejected {
                module: self.id.clone(),
                reason: "refused".to_string(),
            });
        }
        self.seen.lock().unwrap().push(message.raw().to_string());
        Ok(())
    }
}
