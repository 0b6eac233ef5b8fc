//! SQLite backend for the Vouch candidate store.
//!
//! This is the opt-in persistent alternative to
//! [`vouch_core::memory::MemoryStore`]. It wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
