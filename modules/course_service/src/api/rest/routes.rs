//! Route registration and OpenAPI document

use super::{dto::*, handlers};
use crate::domain::Service;
use axum::{
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Course Service API"),
    paths(
        handlers::list_subjects,
        handlers::create_subject,
        handlers::list_courses,
        handlers::create_course,
        handlers::get_course,
        handlers::update_course,
        handlers::delete_course,
        handlers::list_course_modules,
        handlers::create_module,
        handlers::reorder_modules,
        handlers::get_module,
        handlers::update_module,
        handlers::delete_module,
        handlers::list_module_contents,
        handlers::create_content,
        handlers::update_content,
        handlers::delete_content,
        handlers::get_content_item,
        handlers::audit_items,
    ),
    components(schemas(
        SubjectDto,
        CreateSubjectRequest,
        CourseDto,
        CreateCourseRequest,
        UpdateCourseRequest,
        ModuleDto,
        CreateModuleRequest,
        UpdateModuleRequest,
        ModuleOrderDto,
        ReorderModulesRequest,
        ContentDto,
        CreateContentRequest,
        UpdateContentRequest,
        ItemDto,
        ItemRefDto,
        IntegrityReportDto,
        SubjectsListResponse,
        CoursesListResponse,
        ModulesListResponse,
        ContentsListResponse,
    ))
)]
pub struct ApiDoc;

/// Register all REST routes on the router
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let router = router
        // Subjects
        .route(
            "/subjects",
            get(handlers::list_subjects).post(handlers::create_subject),
        )
        // Courses
        .route(
            "/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/courses/{course_id}",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        // Modules
        .route(
            "/courses/{course_id}/modules",
            get(handlers::list_course_modules).post(handlers::create_module),
        )
        .route(
            "/courses/{course_id}/modules/order",
            put(handlers::reorder_modules),
        )
        .route(
            "/modules/{module_id}",
            get(handlers::get_module)
                .put(handlers::update_module)
                .delete(handlers::delete_module),
        )
        // Contents
        .route(
            "/modules/{module_id}/contents",
            get(handlers::list_module_contents),
        )
        .route(
            "/modules/{module_id}/contents/{type_name}",
            post(handlers::create_content),
        )
        .route(
            "/contents/{content_id}",
            delete(handlers::delete_content),
        )
        .route(
            "/contents/{content_id}/item",
            get(handlers::get_content_item),
        )
        .route(
            "/contents/{content_id}/{type_name}",
            put(handlers::update_content),
        )
        // Integrity
        .route("/integrity/items", get(handlers::audit_items))
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(service));

    Ok(router)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
