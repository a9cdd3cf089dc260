//! Domain layer - business logic and services

pub mod ordering;
pub mod repository;
pub mod service;
pub mod validation;

pub use ordering::{OrderAssigner, Ordered};
pub use repository::{
    ContentRepository, CourseRepository, ItemRepository, ModuleRepository, OrderTaken,
    SubjectRepository,
};
pub use service::{Repositories, Service};

use crate::contract::CourseError;

/// Log a storage failure and hide its details from callers
pub(crate) fn storage_error(err: anyhow::Error) -> CourseError {
    tracing::error!(error = ?err, "storage operation failed");
    CourseError::Internal
}
