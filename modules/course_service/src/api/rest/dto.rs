//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Subject DTOs =====

/// Subject response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubjectDto {
    pub id: i64,

    #[schema(example = "Programming")]
    pub title: String,

    #[schema(example = "programming")]
    pub slug: String,
}

/// Create subject request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSubjectRequest {
    pub title: String,
    pub slug: String,
}

// ===== Course DTOs =====

/// Course response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDto {
    pub id: i64,

    /// User that created the course
    pub owner_id: Uuid,

    pub subject_id: i64,

    #[schema(example = "Rust for Pythonistas")]
    pub title: String,

    #[schema(example = "rust-for-pythonistas")]
    pub slug: String,

    pub overview: String,

    /// Creation timestamp
    pub created: chrono::DateTime<chrono::Utc>,
}

/// Create course request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub owner_id: Uuid,
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub overview: String,
}

/// Update course request; `created` cannot be changed
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub overview: String,
}

// ===== Module DTOs =====

/// Module response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModuleDto {
    pub id: i64,

    pub course_id: i64,

    #[schema(example = "Ownership and borrowing")]
    pub title: String,

    pub description: String,

    /// Position within the course, starting at 0
    pub order: u32,
}

/// Create module request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateModuleRequest {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Explicit position; appended after the last module when omitted
    #[serde(default)]
    pub order: Option<u32>,
}

/// Update module request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateModuleRequest {
    pub title: String,

    #[serde(default)]
    pub description: String,
}

/// One entry of a reorder request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ModuleOrderDto {
    pub module_id: i64,
    pub order: u32,
}

/// Reorder modules request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReorderModulesRequest {
    pub modules: Vec<ModuleOrderDto>,
}

// ===== Content DTOs =====

/// Content slot response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentDto {
    pub id: i64,

    pub module_id: i64,

    /// Item type: text, video, image or file
    #[schema(example = "video")]
    pub content_type: String,

    /// Item identifier within its type
    pub object_id: i64,

    /// Position within the module, starting at 0
    pub order: u32,
}

/// Create content request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateContentRequest {
    /// User creating the item
    pub owner_id: Uuid,

    #[schema(example = "Borrow checker walkthrough")]
    pub title: String,

    /// Body text, video URL or file reference depending on the type
    #[schema(example = "https://videos.example.com/borrowck")]
    pub content: String,
}

/// Update content request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateContentRequest {
    pub title: String,
    pub content: String,
}

/// Resolved item response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemDto {
    pub id: i64,

    #[schema(example = "text")]
    pub content_type: String,

    pub owner_id: Uuid,

    pub title: String,

    /// Body text, video URL or file reference depending on the type
    pub content: String,

    pub created: chrono::DateTime<chrono::Utc>,

    pub updated: chrono::DateTime<chrono::Utc>,
}

// ===== Integrity DTOs =====

/// Typed item reference
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemRefDto {
    pub content_type: String,
    pub object_id: i64,
}

/// Integrity audit result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntegrityReportDto {
    /// Items no content slot points at
    pub orphaned_items: Vec<ItemRefDto>,

    /// Content slots whose item is missing
    pub dangling_contents: Vec<ContentDto>,
}

// ===== List Response DTOs =====

/// List of subjects
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubjectsListResponse {
    pub items: Vec<SubjectDto>,
    pub total: usize,
}

/// List of courses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoursesListResponse {
    pub items: Vec<CourseDto>,
    pub total: usize,
}

/// List of modules, by ascending order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModulesListResponse {
    pub items: Vec<ModuleDto>,
    pub total: usize,
}

/// List of content slots, by ascending order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentsListResponse {
    pub items: Vec<ContentDto>,
    pub total: usize,
}
