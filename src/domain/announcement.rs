use chrono::{DateTime, Utc};

use super::{
    Document, DocumentId, FieldValue, Fields, OrderBy, Priority, RequiredText,
    ValidationError,
};

const TIMESTAMP: &str = "timestamp";
const ID: &str = "id";
const TITLE: &str = "title";
const MESSAGE: &str = "message";
const PRIORITY: &str = "priority";

#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub id: DocumentId,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    /// Commit time assigned by the store, absent until it has been stamped.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Announcement {
    /// A stored `id` field that is missing, empty or different from the
    /// document key is replaced by the key.
    pub fn from_document(document: &Document) -> Self {
        let stored_id = document.string(ID).unwrap_or_default();
        if stored_id != document.id.as_str() {
            tracing::debug!(
                document_id = %document.id,
                stored_id,
                "Repairing announcement id from document key"
            );
        }

        Self {
            id: document.id.clone(),
            title: document.string(TITLE).unwrap_or_default().to_owned(),
            message: document.string(MESSAGE).unwrap_or_default().to_owned(),
            priority: Priority::from_stored(document.string(PRIORITY)),
            timestamp: document.timestamp(TIMESTAMP),
        }
    }

    /// Store-side ordering of the feed.
    pub fn feed_order() -> OrderBy {
        OrderBy::descending(TIMESTAMP)
    }
}

/// Sorts newest first. Announcements without a timestamp go last, ties keep
/// their incoming order.
pub fn sort_newest_first(announcements: &mut [Announcement]) {
    announcements.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Validated contents of a new announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementDraft {
    pub title: RequiredText,
    pub message: RequiredText,
    pub priority: Priority,
}

impl AnnouncementDraft {
    pub fn parse(
        title: &str,
        message: &str,
        priority: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: RequiredText::parse("Title", title)?,
            message: RequiredText::parse("Message", message)?,
            priority: Priority::parse(priority),
        })
    }

    /// Fields for a document stored under `id`. The timestamp is left to the
    /// store.
    pub fn to_fields(&self, id: &DocumentId) -> Fields {
        let mut fields = Fields::new();
        fields.insert(ID.to_owned(), id.as_str().into());
        fields.insert(TITLE.to_owned(), self.title.as_ref().as_str().into());
        fields
            .insert(MESSAGE.to_owned(), self.message.as_ref().as_str().into());
        fields.insert(PRIORITY.to_owned(), self.priority.as_str().into());
        fields.insert(TIMESTAMP.to_owned(), FieldValue::ServerTimestamp);
        fields
    }
}
