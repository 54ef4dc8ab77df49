//! Core types and trait definitions for the leavebook leave-management
//! service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod admin;
pub mod error;
pub mod leave;
pub mod notification;
pub mod password;
pub mod report;
pub mod settings;
pub mod staff;
pub mod store;

pub use error::{Error, Result};
