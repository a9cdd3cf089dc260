//! Native in-process client

pub mod client;

pub use client::NativeClient;
