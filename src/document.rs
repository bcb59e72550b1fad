use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A JSON-shaped tree produced by the projector.
///
/// There is no "absent" variant: an omitted field is a key that was never
/// inserted into its [`Object`]. `Null` only appears where a field is always
/// emitted but the host value is nil.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Object(Object),
    Array(Vec<Document>),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Document {
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Follow a chain of object keys, e.g. `["issue", "project", "name"]`.
    pub fn pointer(&self, path: &[&str]) -> Option<&Document> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Document::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Renders scalars the way they read inside a chat message: strings without
/// quotes, nil as nothing.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::String(s) => f.write_str(s),
            Document::Int(n) => write!(f, "{n}"),
            Document::Float(x) => write!(f, "{x}"),
            Document::Bool(b) => write!(f, "{b}"),
            Document::Null => Ok(()),
            Document::Object(_) | Document::Array(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Insertion-ordered map of document fields. Inserting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    fields: Vec<(String, Document)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Document>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Insert only when `value` is present; `None` leaves the key absent.
    pub fn insert_opt<V: Into<Document>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Document>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Object(obj) => obj.serialize(serializer),
            Document::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::String(s) => serializer.serialize_str(s),
            Document::Int(n) => serializer.serialize_i64(*n),
            Document::Float(x) => serializer.serialize_f64(*x),
            Document::Bool(b) => serializer.serialize_bool(*b),
            Document::Null => serializer.serialize_unit(),
        }
    }
}

impl From<Object> for Document {
    fn from(obj: Object) -> Self {
        Document::Object(obj)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Document::Array(items)
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

impl From<u64> for Document {
    fn from(n: u64) -> Self {
        // Host ids and sizes never get near i64::MAX.
        Document::Int(n.min(i64::MAX as u64) as i64)
    }
}

impl From<u8> for Document {
    fn from(n: u8) -> Self {
        Document::Int(i64::from(n))
    }
}

impl From<f64> for Document {
    fn from(x: f64) -> Self {
        Document::Float(x)
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Document::Bool(b)
    }
}

/// Nil becomes `Null`. Use [`Object::insert_opt`] to omit the key instead.
impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        value.map_or(Document::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_opt_none_leaves_key_absent() {
        let mut obj = Object::new();
        obj.insert_opt::<&str>("assigned_to", None);
        assert!(!obj.contains_key("assigned_to"));
        assert!(obj.is_empty());
    }

    #[test]
    fn insert_none_is_explicit_null() {
        let mut obj = Object::new();
        obj.insert("due_date", None::<String>);
        assert_eq!(obj.get("due_date"), Some(&Document::Null));
        assert_eq!(Document::from(obj).to_json(), serde_json::json!({"due_date": null}));
    }

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let obj = Object::new()
            .with("id", 1u64)
            .with("name", "Ops")
            .with("id", 2u64);
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(obj.get("id").and_then(Document::as_i64), Some(2));
    }

    #[test]
    fn serializes_in_insertion_order() {
        let doc = Document::from(
            Object::new()
                .with("id", 42u64)
                .with("subject", "Disk full")
                .with("tags", vec![Document::from("a"), Document::from(true)]),
        );
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"id":42,"subject":"Disk full","tags":["a",true]}"#);
    }

    #[test]
    fn pointer_walks_nested_objects() {
        let doc = Document::from(Object::new().with(
            "issue",
            Object::new().with("project", Object::new().with("name", "Ops")),
        ));
        assert_eq!(
            doc.pointer(&["issue", "project", "name"]).and_then(Document::as_str),
            Some("Ops")
        );
        assert!(doc.pointer(&["issue", "tracker", "name"]).is_none());
        assert!(doc.pointer(&["issue", "project", "name", "deeper"]).is_none());
    }

    #[test]
    fn display_renders_scalars_bare() {
        assert_eq!(Document::from("Open").to_string(), "Open");
        assert_eq!(Document::Int(42).to_string(), "42");
        assert_eq!(Document::Null.to_string(), "");
    }
}
