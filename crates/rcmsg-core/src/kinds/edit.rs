//! Page edit notifications.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decode;
use crate::domain::{Details, FetchFailure, Properties};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Size of the change in bytes (negative for removals).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_size: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev_id: Option<u64>,
}

impl Details for EditDetails {
    fn apply(&mut self, properties: Properties) -> Result<(), FetchFailure> {
        for (name, value) in properties {
            match name.as_str() {
                "title" => self.title = Some(decode(&name, value)?),
                "user" => self.user = Some(decode(&name, value)?),
                "summary" => self.summary = Some(decode(&name, value)?),
                "diffSize" => self.diff_size = Some(decode(&name, value)?),
                "revId" => self.rev_id = Some(decode(&name, value)?),
                _ => debug!(property = %name, "edit ignores unknown property"),
            }
        }
        Ok(())
    }
}
