//! Flattens a host work item (and optionally its change history) into a
//! self-contained [`Document`].
//!
//! Absent relations are omitted rather than nulled. Relations between work
//! items, changesets and attachment download URLs are not projected.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::document::{Document, Object};
use crate::model::{
    Attachment, CustomFieldValue, CustomValue, JournalEntry, Member, Named, Project, WorkItem,
};

/// Keys of the `project` object that flattened custom fields may not shadow.
const RESERVED_PROJECT_KEYS: &[&str] = &["id", "name", "members"];

/// Project a work item. Passing `Some(journals)`, even an empty slice, opts
/// in to the `journals` key.
pub fn project(item: &WorkItem, journals: Option<&[JournalEntry]>) -> Document {
    let mut doc = Object::new();

    doc.insert("id", item.id);

    if let Some(project) = &item.project {
        doc.insert("project", project_object(project));
    }

    doc.insert_opt("tracker", item.tracker.as_ref().map(named));
    doc.insert_opt("status", item.status.as_ref().map(named));
    doc.insert_opt("priority", item.priority.as_ref().map(named));
    doc.insert_opt("author", item.author.as_ref().map(named));
    doc.insert_opt("assigned_to", item.assigned_to.as_ref().map(named));
    doc.insert_opt("category", item.category.as_ref().map(named));
    doc.insert_opt("fixed_version", item.fixed_version.as_ref().map(named));
    doc.insert_opt(
        "parent",
        item.parent.as_ref().map(|p| Object::new().with("id", p.id)),
    );

    doc.insert("subject", item.subject.as_str());
    doc.insert("description", item.description.as_deref());
    doc.insert("start_date", date(item.start_date));
    doc.insert("due_date", date(item.due_date));
    doc.insert("done_ratio", item.done_ratio);
    doc.insert("is_private", item.is_private);
    doc.insert("estimated_hours", item.estimated_hours);
    doc.insert("spent_hours", item.spent_hours);

    if let Some(fields) = &item.custom_fields {
        let fields: Vec<Document> = fields.iter().map(custom_field).collect();
        doc.insert("custom_fields", fields);
    }

    doc.insert("created_on", timestamp(item.created_on));
    doc.insert("updated_on", timestamp(item.updated_on));
    doc.insert("closed_on", timestamp(item.closed_on));

    if let Some(attachments) = &item.attachments {
        let attachments: Vec<Document> = attachments.iter().map(attachment).collect();
        doc.insert("attachments", attachments);
    }

    if let Some(journals) = journals {
        let journals: Vec<Document> = journals.iter().map(journal).collect();
        doc.insert("journals", journals);
    }

    if let Some(watchers) = &item.watchers {
        let watchers: Vec<Document> = watchers.iter().map(|u| named(u).into()).collect();
        doc.insert("watchers", watchers);
    }

    doc.into()
}

/// Wrap a projected work item into the event envelope `{"issue": ...}` the
/// dispatcher reads.
pub fn issue_event(issue: Document) -> Document {
    Object::new().with("issue", issue).into()
}

fn named(n: &Named) -> Object {
    Object::new().with("id", n.id).with("name", n.name.as_str())
}

fn project_object(project: &Project) -> Object {
    let mut obj = named(&Named::new(project.id, project.name.as_str()));

    // Multi-valued project fields are skipped: the flattened shape has no
    // place for them.
    for field in project.custom_fields.iter().flatten() {
        let CustomValue::Single(value) = &field.value else {
            continue;
        };
        if RESERVED_PROJECT_KEYS.contains(&field.name.as_str()) {
            tracing::debug!(
                project = project.id,
                field = %field.name,
                "Project custom field shadows a reserved key, skipping"
            );
            continue;
        }
        obj.insert(field.name.as_str(), value.as_deref());
    }

    if let Some(members) = &project.members {
        let members: Vec<Document> = members.iter().map(member).collect();
        obj.insert("members", members);
    }

    obj
}

fn member(m: &Member) -> Document {
    let access = Object::new()
        .with("view_current_issue", m.can_view_issue)
        .with("view_private_notes", m.can_view_private_notes);

    let roles: Vec<Document> = m
        .roles
        .iter()
        .map(|role| {
            let permissions = Object::new()
                .with("issues_visibility", role.issues_visibility.as_str())
                .with("view_private_notes", role.view_private_notes);
            Object::new()
                .with("id", role.id)
                .with("name", role.name.as_str())
                .with("permissions", permissions)
                .into()
        })
        .collect();

    named(&m.user)
        .with("access", access)
        .with("roles", roles)
        .into()
}

fn custom_field(field: &CustomFieldValue) -> Document {
    let mut obj = Object::new()
        .with("id", field.id)
        .with("name", field.name.as_str());
    if field.multiple {
        obj.insert("multiple", true);
    }

    let value: Document = match &field.value {
        CustomValue::Multi(values) => values
            .iter()
            .filter(|v| !is_blank(v))
            .map(|v| Document::from(v.as_str()))
            .collect::<Vec<_>>()
            .into(),
        CustomValue::Single(value) => value.as_deref().into(),
    };
    obj.insert("value", value);

    obj.into()
}

fn attachment(a: &Attachment) -> Document {
    let mut obj = Object::new()
        .with("id", a.id)
        .with("filename", a.filename.as_str())
        .with("filesize", a.filesize)
        .with("content_type", a.content_type.as_deref())
        .with("description", a.description.as_deref());
    obj.insert_opt("author", a.author.as_ref().map(named));
    obj.insert("created_on", timestamp(a.created_on));
    obj.into()
}

fn journal(entry: &JournalEntry) -> Document {
    let mut obj = Object::new().with("id", entry.id);
    obj.insert_opt("user", entry.user.as_ref().map(named));
    obj.insert("notes", entry.notes.as_deref());
    obj.insert("private_notes", entry.private_notes);
    obj.insert("created_on", timestamp(entry.created_on));

    let details: Vec<Document> = entry
        .details
        .iter()
        .map(|d| {
            Object::new()
                .with("property", d.property.as_str())
                .with("name", d.prop_key.as_str())
                .with("old_value", d.old_value.as_deref())
                .with("new_value", d.value.as_deref())
                .into()
        })
        .collect();
    obj.insert("details", details);

    obj.into()
}

/// Blank means empty or whitespace only.
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn timestamp(t: Option<DateTime<Utc>>) -> Document {
    t.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)).into()
}

fn date(d: Option<NaiveDate>) -> Document {
    d.map(|d| d.format("%Y-%m-%d").to_string()).into()
}
