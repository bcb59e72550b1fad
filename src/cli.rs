use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use chat_notify::config;
use chat_notify::dispatch::{self, template};
use chat_notify::model::{JournalEntry, WorkItem};
use chat_notify::projector;

/// Arguments shared by `send` and `render`.
#[derive(Debug, PartialEq)]
pub struct EventArgs {
    pub event: String,
    pub issue_path: PathBuf,
    pub journals_path: Option<PathBuf>,
}

/// Load the work item, project it and deliver it. Every delivery outcome is
/// reported, none is an error.
pub async fn handle_send(args: &[String]) -> Result<()> {
    let args = parse_event_args(args)?;
    let (item, journals) = load_inputs(&args)?;

    let config = config::load_config()?;
    let notifier = dispatch::create_notifier(&config).context("Failed to set up notifier")?;

    let outcome =
        dispatch::notify_issue(notifier.as_ref(), &args.event, &item, journals.as_deref()).await;
    println!("#{} {}: {outcome}", item.id, args.event);
    Ok(())
}

/// Print the projected document and the webhook body without sending.
pub fn handle_render(args: &[String]) -> Result<()> {
    let args = parse_event_args(args)?;
    let (item, journals) = load_inputs(&args)?;
    let config = config::load_config()?;

    let document = projector::issue_event(projector::project(&item, journals.as_deref()));
    let message = template::render(&args.event, &document, &config.issue_url_base);

    println!("{}", serde_json::to_string_pretty(&document)?);
    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}

fn load_inputs(args: &EventArgs) -> Result<(WorkItem, Option<Vec<JournalEntry>>)> {
    let item: WorkItem = read_json(&args.issue_path)?;
    let journals = match &args.journals_path {
        Some(path) => Some(read_json::<Vec<JournalEntry>>(path)?),
        None => None,
    };
    Ok((item, journals))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse `<event> <issue.json> [-j <journals.json>]`.
///
/// Supported forms:
///   chat-notify send issue-updated issue.json
///   chat-notify send issue-updated issue.json -j journals.json
///   chat-notify render issue-updated issue.json --journals journals.json
pub fn parse_event_args(args: &[String]) -> Result<EventArgs> {
    if args.is_empty() {
        bail!("Usage: chat-notify send <event> <issue.json> [-j <journals.json>]");
    }

    let mut positional: Vec<String> = Vec::new();
    let mut journals_path: Option<PathBuf> = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-j" | "--journals" => {
                i += 1;
                if i < args.len() {
                    journals_path = Some(PathBuf::from(&args[i]));
                } else {
                    bail!("Missing value for -j/--journals flag");
                }
            }
            _ => {
                positional.push(args[i].clone());
            }
        }
        i += 1;
    }

    match positional.as_slice() {
        [event, issue] => {
            if event.trim().is_empty() {
                bail!("Event name cannot be empty");
            }
            Ok(EventArgs {
                event: event.clone(),
                issue_path: PathBuf::from(issue),
                journals_path,
            })
        }
        [_] => bail!("Missing path to the issue JSON file"),
        _ => bail!("Expected <event> <issue.json>, got {} arguments", positional.len()),
    }
}

pub fn print_help() {
    println!("chat-notify — send work item changes to a chat webhook\n");
    println!("USAGE:");
    println!("  chat-notify send <event> <issue.json>    Project the issue and POST it to the webhook");
    println!("  chat-notify render <event> <issue.json>  Print the document and message without sending");
    println!();
    println!("OPTIONS:");
    println!("  -j, --journals <file>  Include change history from a JSON array of journal entries");
    println!();
    println!("CONFIG (~/.chat-notify/config.toml):");
    println!("  notifications_endpoint = \"https://...\"   Default webhook URL");
    println!("  issue_url_base = \"https://tracker\"       Base for issue links");
    println!("  ssl_verify_none = false                  Accept invalid TLS certificates");
    println!("  timeout_secs = 10                        Request timeout, at least 1");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_event_and_issue() {
        let parsed = parse_event_args(&args(&["issue-updated", "issue.json"])).unwrap();
        assert_eq!(
            parsed,
            EventArgs {
                event: "issue-updated".into(),
                issue_path: PathBuf::from("issue.json"),
                journals_path: None,
            }
        );
    }

    #[test]
    fn parse_journals_short_flag() {
        let parsed =
            parse_event_args(&args(&["issue-updated", "issue.json", "-j", "journals.json"]))
                .unwrap();
        assert_eq!(parsed.journals_path, Some(PathBuf::from("journals.json")));
    }

    #[test]
    fn parse_journals_long_flag_before_positionals() {
        let parsed =
            parse_event_args(&args(&["--journals", "j.json", "issue-created", "i.json"]))
                .unwrap();
        assert_eq!(parsed.event, "issue-created");
        assert_eq!(parsed.issue_path, PathBuf::from("i.json"));
        assert_eq!(parsed.journals_path, Some(PathBuf::from("j.json")));
    }

    #[test]
    fn parse_empty_args_fails() {
        assert!(parse_event_args(&args(&[])).is_err());
    }

    #[test]
    fn parse_missing_issue_path_fails() {
        let err = parse_event_args(&args(&["issue-updated"])).unwrap_err();
        assert!(err.to_string().contains("Missing path"));
    }

    #[test]
    fn parse_missing_journals_value_fails() {
        let err = parse_event_args(&args(&["issue-updated", "issue.json", "-j"])).unwrap_err();
        assert!(err.to_string().contains("Missing value"));
    }

    #[test]
    fn parse_extra_positional_fails() {
        assert!(parse_event_args(&args(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn load_inputs_reads_issue_and_journals() {
        let dir = tempfile::tempdir().unwrap();
        let issue = dir.path().join("issue.json");
        let journals = dir.path().join("journals.json");
        std::fs::write(&issue, r#"{"id": 42, "subject": "Disk full"}"#).unwrap();
        std::fs::write(
            &journals,
            r#"[{"id": 1, "notes": "done", "details": [
                {"property": "attr", "prop_key": "status_id", "old_value": "1", "value": "5"}
            ]}]"#,
        )
        .unwrap();

        let (item, journals) = load_inputs(&EventArgs {
            event: "issue-updated".into(),
            issue_path: issue,
            journals_path: Some(journals),
        })
        .unwrap();
        assert_eq!(item.id, 42);
        assert_eq!(journals.unwrap()[0].details[0].prop_key, "status_id");
    }

    #[test]
    fn load_inputs_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let issue = dir.path().join("issue.json");
        std::fs::write(&issue, "{not json").unwrap();

        let err = load_inputs(&EventArgs {
            event: "issue-updated".into(),
            issue_path: issue,
            journals_path: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
