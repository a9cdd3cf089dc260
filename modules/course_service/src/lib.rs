//! Course Service Module
//!
//! Courses split into ordered modules, each holding an ordered list of
//! content slots. A slot points at exactly one item of a closed set of
//! kinds: text, video, image or file.

// Public exports
pub mod contract;
pub use contract::{
    client::CoursesApi, error::CourseError, Content, ContentKind, Course, Item, ItemFields,
    ItemRef, Module, OrderScope, Subject,
};

pub mod module;
pub use module::CourseServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
