//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Content, ContentKind, Course, CourseUpdate, Item, ItemPayload, ItemRef, Module, ModuleUpdate,
    NewContent, NewCourse, NewItem, NewModule, NewSubject, OrderScope, Subject,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Raised by `insert`/`reorder` when the (scope, order) pair is already stored.
///
/// Repositories return it wrapped in `anyhow::Error`; callers recover it with
/// `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("order {order} is already taken in {scope}")]
pub struct OrderTaken {
    pub scope: OrderScope,
    pub order: u32,
}

/// Repository for subjects
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    async fn create(&self, subject: &NewSubject) -> Result<Subject>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Subject>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Subject>>;

    /// List subjects ordered by title
    async fn list_all(&self) -> Result<Vec<Subject>>;
}

/// Repository for courses
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: &NewCourse) -> Result<Course>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>>;

    /// List courses by creation time, newest first
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>>;

    async fn update(&self, id: i64, update: &CourseUpdate) -> Result<Course>;

    /// Delete a course; modules and contents cascade in storage
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Repository for modules
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Insert a module whose order is already assigned
    ///
    /// Fails with [`OrderTaken`] when the course already has a module at that order.
    async fn insert(&self, module: NewModule) -> Result<Module>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Module>>;

    /// Modules of a course by ascending order
    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>>;

    /// Highest order among the modules of a course
    async fn max_order(&self, course_id: i64) -> Result<Option<u32>>;

    async fn update(&self, id: i64, update: &ModuleUpdate) -> Result<Module>;

    /// Delete a module; contents cascade in storage
    async fn delete(&self, id: i64) -> Result<()>;

    /// Apply explicit orders to modules of one course atomically
    ///
    /// Fails with [`OrderTaken`] when the result would hold duplicate orders.
    async fn reorder(&self, course_id: i64, orders: &[(i64, u32)]) -> Result<()>;
}

/// Repository for content slots
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a content slot whose order is already assigned
    ///
    /// Fails with [`OrderTaken`] when the module already has a slot at that order.
    async fn insert(&self, content: NewContent) -> Result<Content>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Content>>;

    /// Contents of a module by ascending order
    async fn list_by_module(&self, module_id: i64) -> Result<Vec<Content>>;

    /// Highest order among the contents of a module
    async fn max_order(&self, module_id: i64) -> Result<Option<u32>>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// Every content slot, for integrity checks
    async fn list_all(&self) -> Result<Vec<Content>>;
}

/// Typed item stores, one per content kind
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert into the store selected by the payload variant
    async fn create(&self, item: &NewItem) -> Result<Item>;

    async fn find(&self, item: ItemRef) -> Result<Option<Item>>;

    /// Replace title and payload, bumping `updated`
    async fn update(&self, item: ItemRef, title: &str, payload: &ItemPayload) -> Result<Item>;

    async fn delete(&self, item: ItemRef) -> Result<()>;

    /// Identifiers of every item in one store
    async fn list_ids(&self, kind: ContentKind) -> Result<Vec<i64>>;
}
