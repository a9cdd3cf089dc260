//! HTTP request handlers - thin layer that delegates to domain service

use super::{dto::*, error::Problem};
use crate::domain::Service;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

type Svc = Extension<Arc<Service>>;

// ===== Subject Handlers =====

/// List all subjects by title
#[utoipa::path(
    get,
    path = "/subjects",
    tag = "subjects",
    responses((status = 200, body = SubjectsListResponse, description = "OK"))
)]
pub async fn list_subjects(
    Extension(service): Svc,
) -> Result<Json<SubjectsListResponse>, Problem> {
    let items: Vec<SubjectDto> = service
        .list_subjects()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(SubjectsListResponse { items, total }))
}

/// Create a subject
#[utoipa::path(
    post,
    path = "/subjects",
    tag = "subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, body = SubjectDto, description = "Created"),
        (status = 400, description = "Invalid title or slug"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_subject(
    Extension(service): Svc,
    Json(req): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectDto>), Problem> {
    let subject = service.create_subject(req.into()).await?;
    Ok((StatusCode::CREATED, Json(subject.into())))
}

// ===== Course Handlers =====

/// Query parameters for listing courses
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCoursesQuery {
    /// Only courses created by this user
    pub owner_id: Option<Uuid>,
}

/// List courses, newest first
#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    params(ListCoursesQuery),
    responses((status = 200, body = CoursesListResponse, description = "OK"))
)]
pub async fn list_courses(
    Extension(service): Svc,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<CoursesListResponse>, Problem> {
    let items: Vec<CourseDto> = service
        .list_courses(query.owner_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(CoursesListResponse { items, total }))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, body = CourseDto, description = "Created"),
        (status = 404, description = "Subject not found"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_course(
    Extension(service): Svc,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseDto>), Problem> {
    let course = service.create_course(req.into()).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// Get a course
#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    tag = "courses",
    params(("course_id" = i64, Path, description = "Course identifier")),
    responses(
        (status = 200, body = CourseDto, description = "OK"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_course(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
) -> Result<Json<CourseDto>, Problem> {
    let course = service.get_course(course_id).await?;
    Ok(Json(course.into()))
}

/// Update a course
#[utoipa::path(
    put,
    path = "/courses/{course_id}",
    tag = "courses",
    params(("course_id" = i64, Path, description = "Course identifier")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, body = CourseDto, description = "OK"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn update_course(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<CourseDto>, Problem> {
    let course = service.update_course(course_id, req.into()).await?;
    Ok(Json(course.into()))
}

/// Delete a course with its modules, contents and items
#[utoipa::path(
    delete,
    path = "/courses/{course_id}",
    tag = "courses",
    params(("course_id" = i64, Path, description = "Course identifier")),
    responses((status = 204, description = "No content"), (status = 404, description = "Not found"))
)]
pub async fn delete_course(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service.delete_course(course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Module Handlers =====

/// List the modules of a course by ascending order
#[utoipa::path(
    get,
    path = "/courses/{course_id}/modules",
    tag = "modules",
    params(("course_id" = i64, Path, description = "Course identifier")),
    responses(
        (status = 200, body = ModulesListResponse, description = "OK"),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_course_modules(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
) -> Result<Json<ModulesListResponse>, Problem> {
    let items: Vec<ModuleDto> = service
        .list_course_modules(course_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(ModulesListResponse { items, total }))
}

/// Create a module, appended after the last one unless an order is given
#[utoipa::path(
    post,
    path = "/courses/{course_id}/modules",
    tag = "modules",
    params(("course_id" = i64, Path, description = "Course identifier")),
    request_body = CreateModuleRequest,
    responses(
        (status = 201, body = ModuleDto, description = "Created"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Order already taken")
    )
)]
pub async fn create_module(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
    Json(req): Json<CreateModuleRequest>,
) -> Result<(StatusCode, Json<ModuleDto>), Problem> {
    let module = service
        .create_module(req.into_new_module(course_id))
        .await?;
    Ok((StatusCode::CREATED, Json(module.into())))
}

/// Assign new orders to modules of a course in one step
#[utoipa::path(
    put,
    path = "/courses/{course_id}/modules/order",
    tag = "modules",
    params(("course_id" = i64, Path, description = "Course identifier")),
    request_body = ReorderModulesRequest,
    responses(
        (status = 204, description = "No content"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Conflict")
    )
)]
pub async fn reorder_modules(
    Extension(service): Svc,
    Path(course_id): Path<i64>,
    Json(req): Json<ReorderModulesRequest>,
) -> Result<StatusCode, Problem> {
    service.reorder_module(course_id, req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a module
#[utoipa::path(
    get,
    path = "/modules/{module_id}",
    tag = "modules",
    params(("module_id" = i64, Path, description = "Module identifier")),
    responses(
        (status = 200, body = ModuleDto, description = "OK"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_module(
    Extension(service): Svc,
    Path(module_id): Path<i64>,
) -> Result<Json<ModuleDto>, Problem> {
    let module = service.get_module(module_id).await?;
    Ok(Json(module.into()))
}

/// Update a module's title and description
#[utoipa::path(
    put,
    path = "/modules/{module_id}",
    tag = "modules",
    params(("module_id" = i64, Path, description = "Module identifier")),
    request_body = UpdateModuleRequest,
    responses(
        (status = 200, body = ModuleDto, description = "OK"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_module(
    Extension(service): Svc,
    Path(module_id): Path<i64>,
    Json(req): Json<UpdateModuleRequest>,
) -> Result<Json<ModuleDto>, Problem> {
    let module = service.update_module(module_id, req.into()).await?;
    Ok(Json(module.into()))
}

/// Delete a module with its contents and items
#[utoipa::path(
    delete,
    path = "/modules/{module_id}",
    tag = "modules",
    params(("module_id" = i64, Path, description = "Module identifier")),
    responses((status = 204, description = "No content"), (status = 404, description = "Not found"))
)]
pub async fn delete_module(
    Extension(service): Svc,
    Path(module_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service.delete_module(module_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Content Handlers =====

/// List the content slots of a module by ascending order
#[utoipa::path(
    get,
    path = "/modules/{module_id}/contents",
    tag = "contents",
    params(("module_id" = i64, Path, description = "Module identifier")),
    responses(
        (status = 200, body = ContentsListResponse, description = "OK"),
        (status = 404, description = "Not found")
    )
)]
pub async fn list_module_contents(
    Extension(service): Svc,
    Path(module_id): Path<i64>,
) -> Result<Json<ContentsListResponse>, Problem> {
    let items: Vec<ContentDto> = service
        .list_module_contents(module_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(ContentsListResponse { items, total }))
}

/// Create an item of the named type and link it at the end of the module
#[utoipa::path(
    post,
    path = "/modules/{module_id}/contents/{type_name}",
    tag = "contents",
    params(
        ("module_id" = i64, Path, description = "Module identifier"),
        ("type_name" = String, Path, description = "text, video, image or file")
    ),
    request_body = CreateContentRequest,
    responses(
        (status = 201, body = ContentDto, description = "Created"),
        (status = 400, description = "Unknown type or invalid fields"),
        (status = 404, description = "Module not found")
    )
)]
pub async fn create_content(
    Extension(service): Svc,
    Path((module_id, type_name)): Path<(i64, String)>,
    Json(req): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentDto>), Problem> {
    let owner_id = req.owner_id;
    let content = service
        .create_content(module_id, &type_name, req.into(), owner_id)
        .await?;
    Ok((StatusCode::CREATED, Json(content.into())))
}

/// Update the item behind a content slot; the slot's order is kept
#[utoipa::path(
    put,
    path = "/contents/{content_id}/{type_name}",
    tag = "contents",
    params(
        ("content_id" = i64, Path, description = "Content identifier"),
        ("type_name" = String, Path, description = "text, video, image or file")
    ),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, body = ContentDto, description = "OK"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_content(
    Extension(service): Svc,
    Path((content_id, type_name)): Path<(i64, String)>,
    Json(req): Json<UpdateContentRequest>,
) -> Result<Json<ContentDto>, Problem> {
    let content = service
        .update_content(content_id, &type_name, req.into())
        .await?;
    Ok(Json(content.into()))
}

/// Delete a content slot together with its item
#[utoipa::path(
    delete,
    path = "/contents/{content_id}",
    tag = "contents",
    params(("content_id" = i64, Path, description = "Content identifier")),
    responses((status = 204, description = "No content"), (status = 404, description = "Not found"))
)]
pub async fn delete_content(
    Extension(service): Svc,
    Path(content_id): Path<i64>,
) -> Result<StatusCode, Problem> {
    service.delete_content(content_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the item a content slot points at
#[utoipa::path(
    get,
    path = "/contents/{content_id}/item",
    tag = "contents",
    params(("content_id" = i64, Path, description = "Content identifier")),
    responses(
        (status = 200, body = ItemDto, description = "OK"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_content_item(
    Extension(service): Svc,
    Path(content_id): Path<i64>,
) -> Result<Json<ItemDto>, Problem> {
    let item = service.get_content_item(content_id).await?;
    Ok(Json(item.into()))
}

// ===== Integrity Handlers =====

/// Report items without a content slot and slots without an item
#[utoipa::path(
    get,
    path = "/integrity/items",
    tag = "integrity",
    responses((status = 200, body = IntegrityReportDto, description = "OK"))
)]
pub async fn audit_items(Extension(service): Svc) -> Result<Json<IntegrityReportDto>, Problem> {
    let report = service.audit_items().await?;
    if !report.is_clean() {
        tracing::warn!(
            orphaned_items = report.orphaned_items.len(),
            dangling_contents = report.dangling_contents.len(),
            "item integrity audit found problems"
        );
    }
    Ok(Json(report.into()))
}
