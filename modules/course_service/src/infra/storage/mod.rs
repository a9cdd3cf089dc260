//! Storage layer - database entities and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

use crate::domain::Repositories;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Build SeaORM-backed repositories sharing one connection
pub fn sea_orm_repositories(db: Arc<DatabaseConnection>) -> Repositories {
    use repositories::*;

    Repositories {
        subjects: Arc::new(SeaOrmSubjectRepository::new(db.clone())),
        courses: Arc::new(SeaOrmCourseRepository::new(db.clone())),
        modules: Arc::new(SeaOrmModuleRepository::new(db.clone())),
        contents: Arc::new(SeaOrmContentRepository::new(db.clone())),
        items: Arc::new(SeaOrmItemRepository::new(db)),
    }
}
