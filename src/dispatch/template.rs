use serde::Serialize;

use crate::document::Document;

/// Outbound webhook body: `{"msgtype": "markdown", "markdown": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct MarkdownMessage {
    pub msgtype: &'static str,
    pub markdown: Markdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct Markdown {
    pub title: String,
    pub text: String,
}

impl MarkdownMessage {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            msgtype: "markdown",
            markdown: Markdown {
                title: title.into(),
                text: text.into(),
            },
        }
    }
}

/// Build the message for `event` from an `{"issue": ...}` envelope.
/// Missing values render as empty strings.
pub fn render(event: &str, document: &Document, issue_url_base: &str) -> MarkdownMessage {
    MarkdownMessage::new(event, render_text(document, issue_url_base))
}

pub fn render_text(document: &Document, issue_url_base: &str) -> String {
    let field = |path: &[&str]| issue_field(document, path);

    let id = field(&["id"]);
    let link = issue_link(issue_url_base, &id);

    format!(
        "issue: [#{id}]({link})\n> \n\
         > Project: {project}\n> \n\
         > Tracker: {tracker}\n> \n\
         > Subject: {subject}\n> \n\
         > Status: {status}\n> \n\
         > Priority: {priority}\n> \n\
         > Assignee: {assignee}\n> \n\
         > Created: {created}\n> \n\
         > Updated: {updated}\n> \n\
         > ### Description\n> \n\
         >     {description}\n",
        project = field(&["project", "name"]),
        tracker = field(&["tracker", "name"]),
        subject = field(&["subject"]),
        status = field(&["status", "name"]),
        priority = field(&["priority", "name"]),
        assignee = field(&["assigned_to", "name"]),
        created = field(&["created_on"]),
        updated = field(&["updated_on"]),
        description = field(&["description"]),
    )
}

fn issue_field(document: &Document, path: &[&str]) -> String {
    let mut full = Vec::with_capacity(path.len() + 1);
    full.push("issue");
    full.extend_from_slice(path);
    document
        .pointer(&full)
        .map(ToString::to_string)
        .unwrap_or_default()
}

pub fn issue_link(issue_url_base: &str, id: &str) -> String {
    format!("{}/issues/{id}", issue_url_base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Object;

    fn make_event() -> Document {
        let issue = Object::new()
            .with("id", 42u64)
            .with("project", Object::new().with("id", 3u64).with("name", "Ops"))
            .with("tracker", Object::new().with("id", 1u64).with("name", "Bug"))
            .with("status", Object::new().with("id", 1u64).with("name", "Open"))
            .with("priority", Object::new().with("id", 3u64).with("name", "High"))
            .with("subject", "Disk full")
            .with("description", "Root volume at 100%")
            .with("created_on", "2024-05-01T09:30:00Z")
            .with("updated_on", "2024-05-02T10:00:00Z");
        Object::new().with("issue", issue).into()
    }

    #[test]
    fn renders_every_field() {
        let text = render_text(&make_event(), "https://tracker.example.com");
        assert!(text.starts_with("issue: [#42](https://tracker.example.com/issues/42)\n"));
        assert!(text.contains("> Project: Ops\n"));
        assert!(text.contains("> Tracker: Bug\n"));
        assert!(text.contains("> Subject: Disk full\n"));
        assert!(text.contains("> Status: Open\n"));
        assert!(text.contains("> Priority: High\n"));
        assert!(text.contains("> Created: 2024-05-01T09:30:00Z\n"));
        assert!(text.contains("> Updated: 2024-05-02T10:00:00Z\n"));
        assert!(text.contains("> ### Description\n"));
        assert!(text.ends_with(">     Root volume at 100%\n"));
    }

    #[test]
    fn missing_assignee_renders_empty() {
        let text = render_text(&make_event(), "https://tracker.example.com");
        assert!(text.contains("> Assignee: \n"));
    }

    #[test]
    fn null_description_renders_empty() {
        let mut issue = make_event().get("issue").unwrap().as_object().unwrap().clone();
        issue.insert("description", Document::Null);
        let event: Document = Object::new().with("issue", issue).into();
        let text = render_text(&event, "http://localhost:3000");
        assert!(text.ends_with(">     \n"));
    }

    #[test]
    fn link_base_trailing_slash_is_trimmed() {
        assert_eq!(
            issue_link("http://localhost:3000/", "7"),
            "http://localhost:3000/issues/7"
        );
    }

    #[test]
    fn message_wire_shape() {
        let message = render("issue-updated", &make_event(), "http://localhost:3000");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["msgtype"], "markdown");
        assert_eq!(json["markdown"]["title"], "issue-updated");
        assert!(json["markdown"]["text"]
            .as_str()
            .unwrap()
            .contains("[#42](http://localhost:3000/issues/42)"));
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
