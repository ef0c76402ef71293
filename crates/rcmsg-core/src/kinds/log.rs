//! Log entry notifications (blocks, deletions, moves, uploads, ...).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decode;
use crate::domain::{Details, FetchFailure, Properties};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Details for LogDetails {
    fn apply(&mut self, properties: Properties) -> Result<(), FetchFailure> {
        for (name, value) in properties {
            match name.as_str() {
                "title" => self.title = Some(decode(&name, value)?),
                "user" => self.user = Some(decode(&name, value)?),
                "logType" => self.log_type = Some(decode(&name, value)?),
                "action" => self.action = Some(decode(&name, value)?),
                "reason" => self.reason = Some(decode(&name, value)?),
                _ => debug!(property = %name, "log ignores unknown property"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_sets_log_fields() {
        let mut details = LogDetails::default();
        details
            .apply(
                Properties::new()
                    .with("logType", json!("block"))
                    .with("action", json!("reblock")),
            )
            .unwrap();

        assert_eq!(details.log_type.as_deref(), Some("block"));
        assert_eq!(details.action.as_deref(), Some("reblock"));
        assert_eq!(details.user, None);
    }
}
