//! Contract error types for course service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::{ItemRef, OrderScope};

/// Course service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseError {
    /// Content type name outside of text, video, image, file
    #[error("No such content type: {name}")]
    InvalidContentType { name: String },

    /// Referenced record does not exist or is outside the expected scope
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (subject, course, module, content, item)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Another writer holds the order value in this scope
    #[error("Order {order} is already taken in {scope}")]
    OrderConflict { scope: OrderScope, order: u32 },

    /// Item left without an owning content slot
    #[error("Item {item} has no owning content")]
    OrphanedItem { item: ItemRef },

    /// Field-level input error
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Conflict (duplicate slug)
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Internal error")]
    Internal,
}

impl CourseError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
