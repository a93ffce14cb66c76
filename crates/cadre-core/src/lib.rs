//! Core types and the hierarchy/salary engine for Cadre.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; storage is reached only through the
//! [`store::StaffStore`] trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod hierarchy;
pub mod rules;
pub mod salary;
pub mod staff;
pub mod store;

pub use error::{Error, Result};
