//! Core types and trait definitions for the Vouch verification service.
//!
//! No HTTP or database dependencies live here. Storage backends,
//! collaborator clients and the HTTP surface all depend on this crate.

// Trait impls use native `async fn`; the `Send` bounds live on the trait
// signatures.
#![allow(async_fn_in_trait)]

pub mod candidate;
pub mod collab;
pub mod decision;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;

pub use error::{Error, ErrorKind, Result};
