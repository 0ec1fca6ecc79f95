//! Persistence layer: the attendance sheet store and the property store.
//!
//! [`TabularStore`] models an append-only spreadsheet: named sheets with a
//! fixed header row and rows of string cells. [`PropertyStore`] is a small
//! string key/value store. Each has a PostgreSQL implementation backed by
//! `sqlx::PgPool` and an in-memory one used when persistence is disabled
//! and in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::HookError;

pub use memory::{MemoryPropertyStore, MemoryTabularStore};
pub use postgres::{PostgresPropertyStore, PostgresTabularStore};

/// Append-only store of named sheets.
#[async_trait]
pub trait TabularStore: Send + Sync + std::fmt::Debug {
    /// Creates `sheet` with `header` as its first row unless it exists.
    ///
    /// Returns `true` if the sheet was created by this call.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Persistence`] on storage failure.
    async fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<bool, HookError>;

    /// Returns all data rows of `sheet` in append order, header excluded.
    /// A missing sheet has no rows.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Persistence`] on storage failure.
    async fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, HookError>;

    /// Appends one row to `sheet`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Persistence`] if the sheet does not exist or
    /// on storage failure.
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), HookError>;
}

/// String key/value store for small pieces of state.
#[async_trait]
pub trait PropertyStore: Send + Sync + std::fmt::Debug {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Persistence`] on storage failure.
    async fn get(&self, key: &str) -> Result<Option<String>, HookError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Persistence`] on storage failure.
    async fn set(&self, key: &str, value: &str) -> Result<(), HookError>;
}
