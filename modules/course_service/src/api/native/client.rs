//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Content, Course, CourseError, CourseUpdate, CoursesApi, IntegrityReport, Item, ItemFields,
    Module, ModuleUpdate, NewCourse, NewModule, NewSubject, Subject,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// This client is used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CoursesApi for NativeClient {
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject, CourseError> {
        self.service.create_subject(subject).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, CourseError> {
        self.service.list_subjects().await
    }

    async fn create_course(&self, course: NewCourse) -> Result<Course, CourseError> {
        self.service.create_course(course).await
    }

    async fn get_course(&self, course_id: i64) -> Result<Course, CourseError> {
        self.service.get_course(course_id).await
    }

    async fn list_courses(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>, CourseError> {
        self.service.list_courses(owner_id).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Course, CourseError> {
        self.service.update_course(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<(), CourseError> {
        self.service.delete_course(course_id).await
    }

    async fn create_module(&self, module: NewModule) -> Result<Module, CourseError> {
        self.service.create_module(module).await
    }

    async fn get_module(&self, module_id: i64) -> Result<Module, CourseError> {
        self.service.get_module(module_id).await
    }

    async fn list_course_modules(&self, course_id: i64) -> Result<Vec<Module>, CourseError> {
        self.service.list_course_modules(course_id).await
    }

    async fn update_module(
        &self,
        module_id: i64,
        update: ModuleUpdate,
    ) -> Result<Module, CourseError> {
        self.service.update_module(module_id, update).await
    }

    async fn delete_module(&self, module_id: i64) -> Result<(), CourseError> {
        self.service.delete_module(module_id).await
    }

    async fn reorder_module(
        &self,
        course_id: i64,
        orders: Vec<(i64, u32)>,
    ) -> Result<(), CourseError> {
        self.service.reorder_module(course_id, orders).await
    }

    async fn create_content(
        &self,
        module_id: i64,
        type_name: &str,
        fields: ItemFields,
        owner_id: Uuid,
    ) -> Result<Content, CourseError> {
        self.service
            .create_content(module_id, type_name, fields, owner_id)
            .await
    }

    async fn update_content(
        &self,
        content_id: i64,
        type_name: &str,
        fields: ItemFields,
    ) -> Result<Content, CourseError> {
        self.service
            .update_content(content_id, type_name, fields)
            .await
    }

    async fn delete_content(&self, content_id: i64) -> Result<(), CourseError> {
        self.service.delete_content(content_id).await
    }

    async fn list_module_contents(&self, module_id: i64) -> Result<Vec<Content>, CourseError> {
        self.service.list_module_contents(module_id).await
    }

    async fn get_content_item(&self, content_id: i64) -> Result<Item, CourseError> {
        self.service.get_content_item(content_id).await
    }

    async fn audit_items(&self) -> Result<IntegrityReport, CourseError> {
        self.service.audit_items().await
    }
}
