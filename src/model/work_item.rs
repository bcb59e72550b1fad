use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An `(id, name)` reference to another host record (tracker, status, user, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub id: u64,
    pub name: String,
}

impl Named {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Read-only view of a work item as handed over by the host.
///
/// `None` on a collection means the host does not expose it at all, which is
/// different from an exposed but empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub project: Option<Project>,
    pub tracker: Option<Named>,
    pub status: Option<Named>,
    pub priority: Option<Named>,
    pub author: Option<Named>,
    pub assigned_to: Option<Named>,
    pub category: Option<Named>,
    pub fixed_version: Option<Named>,
    pub parent: Option<Named>,
    #[serde(default)]
    pub subject: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done_ratio: u8,
    #[serde(default)]
    pub is_private: bool,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub spent_hours: f64,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
    pub closed_on: Option<DateTime<Utc>>,
    pub custom_fields: Option<Vec<CustomFieldValue>>,
    pub attachments: Option<Vec<Attachment>>,
    pub watchers: Option<Vec<Named>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub custom_fields: Option<Vec<CustomFieldValue>>,
    pub members: Option<Vec<Member>>,
}

/// A project member together with the access flags the host computed for
/// the work item being projected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user: Named,
    #[serde(default)]
    pub can_view_issue: bool,
    #[serde(default)]
    pub can_view_private_notes: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub issues_visibility: IssuesVisibility,
    #[serde(default)]
    pub view_private_notes: bool,
}

/// Which issues a role lets its members see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuesVisibility {
    All,
    Default,
    Own,
}

impl IssuesVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuesVisibility::All => "all",
            IssuesVisibility::Default => "default",
            IssuesVisibility::Own => "own",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub value: CustomValue,
}

/// A custom field value is either one (possibly nil) string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Multi(Vec<String>),
    Single(Option<String>),
}

impl Default for CustomValue {
    fn default() -> Self {
        CustomValue::Single(None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub filesize: u64,
    pub content_type: Option<String>,
    pub description: Option<String>,
    pub author: Option<Named>,
    pub created_on: Option<DateTime<Utc>>,
}
