//! Dispatcher - hands a settled message to the modules interested in it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::registry::ModuleRegistry;
use crate::domain::{Details, MessageState};
use crate::error::RcError;
use crate::message::Message;

/// What happened to each interested module id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub delivered: Vec<String>,

    /// Ids no module is registered under.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<String>,

    /// (id, error) of modules that failed to consume the message.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<(String, String)>,
}

pub struct Dispatcher<D: Details> {
    registry: Arc<ModuleRegistry<D>>,
}

impl<D: Details> Dispatcher<D> {
    pub fn new(registry: Arc<ModuleRegistry<D>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModuleRegistry<D> {
        &self.registry
    }

    /// Deliver `message` to its interested modules, in the order they were
    /// requested. Only successfully fetched messages are delivered.
    pub async fn dispatch(&self, message: &Message<D>) -> Result<DispatchReport, RcError> {
        let state = message.state();
        if state != MessageState::Succeeded {
            return Err(RcError::NotSettled(state));
        }

        let mut report = DispatchReport::default();
        for id in message.interested().unwrap_or(&[]) {
            let Some(module) = self.registry.get(id) else {
                warn!(module = %id, message_type = %message.message_type(), "no module registered");
                report.unknown.push(id.clone());
                continue;
            };

            match module.consume(message).await {
                Ok(()) => {
                    debug!(module = %id, message_type = %message.message_type(), "message delivered");
                    report.delivered.push(id.clone());
                }
                Err(err) => {
                    warn!(module = %id, %err, "module failed to consume message");
                    report.failed.push((id.clone(), err.to_string()));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::RecordingModule;
    use crate::domain::Properties;
    use crate::impls::{LineParser, StaticClient};
    use crate::ports::Parser;

    fn dispatcher(modules: &[Arc<RecordingModule>]) -> Dispatcher<Properties> {
        let mut registry = ModuleRegistry::new();
        for module in modules {
            registry.register(module.clone()).unwrap();
        }
        Dispatcher::new(Arc::new(registry))
    }

    fn settled(interested: &[&str]) -> Message<Properties> {
        let mut msg = LineParser::new("test", "edit").parse("[[Page]] edited by X").unwrap();
        let client = Arc::new(StaticClient::new("fixture", Properties::new()));
        let _handle = msg.fetch(client, ["diffSize"], interested.iter().copied());
        msg.resolve();
        msg
    }

    #[tokio::test]
    async fn delivers_only_to_interested_modules() {
        let a = Arc::new(RecordingModule::new("moduleA"));
        let b = Arc::new(RecordingModule::new("moduleB"));
        let dispatcher = dispatcher(&[a.clone(), b.clone()]);

        let report = dispatcher.dispatch(&settled(&["moduleA"])).await.unwrap();

        assert_eq!(report.delivered, vec!["moduleA".to_string()]);
        assert_eq!(a.seen(), vec!["[[Page]] edited by X".to_string()]);
        assert!(b.seen().is_empty());
    }

    #[tokio::test]
    async fn reports_unknown_and_failing_modules() {
        let broken = Arc::new(RecordingModule::failing("broken"));
        let dispatcher = dispatcher(&[broken]);

        let report = dispatcher
            .dispatch(&settled(&["ghost", "broken"]))
            .await
            .unwrap();

        assert!(report.delivered.is_empty());
        assert_eq!(report.unknown, vec!["ghost".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert!(report.failed[0].1.contains("module=broken rejected"));
    }

    #[tokio::test]
    async fn refuses_unsettled_messages() {
        let dispatcher = dispatcher(&[]);
        let msg: Message<Properties> = LineParser::new("test", "edit").parse("line").unwrap();

        let err = dispatcher.dispatch(&msg).await.unwrap_err();
        assert!(matches!(err, RcError::NotSettled(MessageState::Created)));
    }
}
