use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::work_item::Named;

/// One recorded change or comment on a work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub user: Option<Named>,
    pub notes: Option<String>,
    #[serde(default)]
    pub private_notes: bool,
    pub created_on: Option<DateTime<Utc>>,
    /// Only the details the host already filtered for visibility.
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalDetail {
    /// Kind of change, e.g. `attr`, `cf` or `attachment`.
    pub property: String,
    pub prop_key: String,
    pub old_value: Option<String>,
    pub value: Option<String>,
}
