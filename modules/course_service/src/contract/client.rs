//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the course service.
//! NO HTTP - direct function calls for performance.

use super::{
    error::CourseError,
    model::{
        Content, Course, CourseUpdate, IntegrityReport, Item, ItemFields, Module, ModuleUpdate,
        NewCourse, NewModule, NewSubject, Subject,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Course service API for inter-module communication
#[async_trait]
pub trait CoursesApi: Send + Sync {
    // ===== Subject Operations =====

    async fn create_subject(&self, subject: NewSubject) -> Result<Subject, CourseError>;

    /// List subjects ordered by title
    async fn list_subjects(&self) -> Result<Vec<Subject>, CourseError>;

    // ===== Course Operations =====

    async fn create_course(&self, course: NewCourse) -> Result<Course, CourseError>;

    async fn get_course(&self, course_id: i64) -> Result<Course, CourseError>;

    /// List courses, newest first, optionally restricted to one owner
    async fn list_courses(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>, CourseError>;

    async fn update_course(
        &self,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Course, CourseError>;

    /// Delete a course with its modules, contents and items
    async fn delete_course(&self, course_id: i64) -> Result<(), CourseError>;

    // ===== Module Operations =====

    /// Create a module; the order is assigned unless `module.order` is set
    async fn create_module(&self, module: NewModule) -> Result<Module, CourseError>;

    async fn get_module(&self, module_id: i64) -> Result<Module, CourseError>;

    /// List the modules of a course by ascending order
    async fn list_course_modules(&self, course_id: i64) -> Result<Vec<Module>, CourseError>;

    async fn update_module(
        &self,
        module_id: i64,
        update: ModuleUpdate,
    ) -> Result<Module, CourseError>;

    async fn delete_module(&self, module_id: i64) -> Result<(), CourseError>;

    /// Explicitly set module orders within a course
    async fn reorder_module(
        &self,
        course_id: i64,
        orders: Vec<(i64, u32)>,
    ) -> Result<(), CourseError>;

    // ===== Content Operations =====

    /// Create an item of `type_name` and link it at the end of the module
    async fn create_content(
        &self,
        module_id: i64,
        type_name: &str,
        fields: ItemFields,
        owner_id: Uuid,
    ) -> Result<Content, CourseError>;

    /// Update the item behind a content slot; the order is unchanged
    async fn update_content(
        &self,
        content_id: i64,
        type_name: &str,
        fields: ItemFields,
    ) -> Result<Content, CourseError>;

    /// Delete the item, then the content slot
    async fn delete_content(&self, content_id: i64) -> Result<(), CourseError>;

    /// List the contents of a module by ascending order
    async fn list_module_contents(&self, module_id: i64) -> Result<Vec<Content>, CourseError>;

    /// Resolve the item a content slot points at
    async fn get_content_item(&self, content_id: i64) -> Result<Item, CourseError>;

    // ===== Integrity =====

    /// Find orphaned items and dangling content slots
    async fn audit_items(&self) -> Result<IntegrityReport, CourseError>;
}
