//! Core types and trait definitions for the Soirée guest list.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the guest model, the attendance report aggregator, the store
//! abstraction, and the shared error type; every other crate builds on it.

pub mod error;
pub mod guest;
pub mod report;
pub mod store;

pub use error::{Error, Result};
