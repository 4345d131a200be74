use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use super::ValidationError;

const GENERATED_ID_LENGTH: usize = 20;
const MAX_ID_BYTES: usize = 1500;

/// Key of a document inside a collection.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::new(
                "Document ID cannot be empty".to_string(),
            ));
        }
        if id.len() > MAX_ID_BYTES {
            return Err(ValidationError::new(format!(
                "Max document ID length is {MAX_ID_BYTES} bytes"
            )));
        }
        if id.contains('/') {
            return Err(ValidationError::new(format!(
                "Document ID cannot contain '/': {id}"
            )));
        }
        if id == "." || id == ".." {
            return Err(ValidationError::new(format!(
                "Document ID cannot be '{id}'"
            )));
        }
        if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
            return Err(ValidationError::new(format!(
                "Document ID is reserved: {id}"
            )));
        }
        Ok(Self(id.to_owned()))
    }

    /// Generates a random 20 character alphanumeric id, the same shape the
    /// hosted store uses for auto-ids.
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LENGTH)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single value in a flat document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// Write-only sentinel, replaced by the commit time of the write.
    ServerTimestamp,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    // Cross-type ordering: null < booleans < numbers < timestamps < strings.
    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Double(_) => 2,
            FieldValue::Timestamp(_) | FieldValue::ServerTimestamp => 3,
            FieldValue::String(_) => 4,
        }
    }

    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Double(b)) => cmp_f64(*a as f64, *b),
            (Double(a), Integer(b)) => cmp_f64(*a, *b as f64),
            (Double(a), Double(b)) => cmp_f64(*a, *b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) => FieldValue::String(s),
            None => FieldValue::Null,
        }
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn string(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(FieldValue::as_str)
    }

    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.fields.get(field).and_then(FieldValue::as_timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            direction: Direction::Descending,
        }
    }

    /// Applies the ordering the way the hosted store does: documents without
    /// the field are left out, ties fall back to document id order.
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut documents: Vec<Document> = documents
            .into_iter()
            .filter(|doc| doc.fields.contains_key(&self.field))
            .collect();

        documents.sort_by(|a, b| {
            let ordering = a.fields[&self.field]
                .compare(&b.fields[&self.field])
                .then_with(|| a.id.cmp(&b.id));
            match self.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
        documents
    }
}
