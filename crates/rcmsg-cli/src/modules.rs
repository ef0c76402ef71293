use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use rcmsg_core::domain::Properties;
use rcmsg_core::ports::Module;
use rcmsg_core::{Message, RcError};

/// Logs every message it is handed.
pub struct LogModule {
    id: String,
    consumed: AtomicUsize,
}

impl LogModule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            consumed: AtomicUsize::new(0),
        }
    }

    pub fn consumed(&self) -> usize {
        self.consumed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Module<Properties> for LogModule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn consume(&self, message: &Message<Properties>) -> Result<(), RcError> {
        let json = serde_json::to_string(message).map_err(|err| RcError::Rejected {
            module: self.id.clone(),
            reason: err.to_string(),
        })?;
        self.consumed.fetch_add(1, Ordering::Relaxed);
        info!(
            module = %self.id,
            message_type = %message.message_type(),
            retries = message.retries(),
            message = %json,
            "message received"
        );
        Ok(())
    }
}
