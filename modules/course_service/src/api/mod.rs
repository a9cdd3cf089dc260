//! API layer - REST endpoints and the native client

pub mod native;
pub mod rest;
