//! SQLite backend for the Soiree guest store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. After every committed write the store
//! publishes a full-collection [`soiree_core::store::StoreSnapshot`] on its
//! watch channel.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
