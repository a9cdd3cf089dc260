//! Contract models for course service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::CourseError;

/// Subject a course belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i64,
    pub title: String,
    /// Unique URL slug
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubject {
    pub title: String,
    pub slug: String,
}

/// Course owned by an instructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    /// User that created the course
    pub owner_id: Uuid,
    pub subject_id: i64,
    pub title: String,
    /// Unique URL slug
    pub slug: String,
    pub overview: String,
    /// Creation timestamp, never changes after insert
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub owner_id: Uuid,
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
}

/// Mutable course fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseUpdate {
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
}

/// Ordered module inside a course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    /// Position among the modules of the same course
    pub order: u32,
}

/// Module about to be inserted
///
/// `order` is assigned from the course's existing modules when left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModule {
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub order: Option<u32>,
}

/// Mutable module fields; order is changed through reordering only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleUpdate {
    pub title: String,
    pub description: String,
}

/// Concrete item type a content slot points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    Text,
    Video,
    Image,
    File,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Text,
        ContentKind::Video,
        ContentKind::Image,
        ContentKind::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Video => "video",
            ContentKind::Image => "image",
            ContentKind::File => "file",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = CourseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "text" => Ok(ContentKind::Text),
            "video" => Ok(ContentKind::Video),
            "image" => Ok(ContentKind::Image),
            "file" => Ok(ContentKind::File),
            other => Err(CourseError::InvalidContentType {
                name: other.to_string(),
            }),
        }
    }
}

/// Typed reference to an item record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemRef {
    pub kind: ContentKind,
    pub id: i64,
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Ordered content slot inside a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: i64,
    pub module_id: i64,
    pub kind: ContentKind,
    /// Identifier in the item store selected by `kind`
    pub object_id: i64,
    /// Position among the contents of the same module
    pub order: u32,
}

impl Content {
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            kind: self.kind,
            id: self.object_id,
        }
    }
}

/// Content slot about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub module_id: i64,
    pub item: ItemRef,
    pub order: Option<u32>,
}

/// Item payload; the variant decides which store holds the item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    Text { body: String },
    Video { url: String },
    Image { file: String },
    File { file: String },
}

impl ItemPayload {
    /// Build the payload for `kind` from its raw stored value
    pub fn from_raw(kind: ContentKind, content: String) -> Self {
        match kind {
            ContentKind::Text => ItemPayload::Text { body: content },
            ContentKind::Video => ItemPayload::Video { url: content },
            ContentKind::Image => ItemPayload::Image { file: content },
            ContentKind::File => ItemPayload::File { file: content },
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ItemPayload::Text { .. } => ContentKind::Text,
            ItemPayload::Video { .. } => ContentKind::Video,
            ItemPayload::Image { .. } => ContentKind::Image,
            ItemPayload::File { .. } => ContentKind::File,
        }
    }

    /// Raw stored value: body text, URL or file reference
    pub fn raw(&self) -> &str {
        match self {
            ItemPayload::Text { body } => body,
            ItemPayload::Video { url } => url,
            ItemPayload::Image { file } | ItemPayload::File { file } => file,
        }
    }
}

/// Payload record referenced by a content slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub owner_id: Uuid,
    pub title: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub payload: ItemPayload,
}

impl Item {
    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            kind: self.payload.kind(),
            id: self.id,
        }
    }
}

/// Item about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub owner_id: Uuid,
    pub title: String,
    pub payload: ItemPayload,
}

/// Caller-supplied item fields, interpreted according to the content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub title: String,
    /// Body text, video URL or file reference
    pub content: String,
}

/// Sibling set an order value is unique within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderScope {
    /// Modules of one course
    Course(i64),
    /// Contents of one module
    Module(i64),
}

impl fmt::Display for OrderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderScope::Course(id) => write!(f, "course {}", id),
            OrderScope::Module(id) => write!(f, "module {}", id),
        }
    }
}

/// Result of the item integrity audit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Items no content slot points at
    pub orphaned_items: Vec<ItemRef>,
    /// Content slots whose item no longer exists
    pub dangling_contents: Vec<Content>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_items.is_empty() && self.dangling_contents.is_empty()
    }
}
