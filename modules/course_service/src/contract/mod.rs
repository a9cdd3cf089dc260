//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::CoursesApi;
pub use error::CourseError;
pub use model::{
    Content, ContentKind, Course, CourseUpdate, IntegrityReport, Item, ItemFields, ItemPayload,
    ItemRef, Module, ModuleUpdate, NewContent, NewCourse, NewItem, NewModule, NewSubject,
    OrderScope, Subject,
};
