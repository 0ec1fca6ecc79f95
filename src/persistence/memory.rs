//! In-memory stores.
//!
//! State lives behind a [`tokio::sync::RwLock`] and is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PropertyStore, TabularStore};
use crate::error::HookError;

#[derive(Debug, Default)]
struct Sheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Sheet store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTabularStore {
    sheets: RwLock<HashMap<String, Sheet>>,
}

impl MemoryTabularStore {
    /// Creates a store with no sheets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the header row of `sheet`, if it exists.
    pub async fn header(&self, sheet: &str) -> Option<Vec<String>> {
        self.sheets.read().await.get(sheet).map(|s| s.header.clone())
    }
}

#[async_trait]
impl TabularStore for MemoryTabularStore {
    async fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<bool, HookError> {
        let mut sheets = self.sheets.write().await;
        if sheets.contains_key(sheet) {
            return Ok(false);
        }
        sheets.insert(
            sheet.to_string(),
            Sheet {
                header: header.iter().map(|cell| (*cell).to_string()).collect(),
                rows: Vec::new(),
            },
        );
        Ok(true)
    }

    async fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, HookError> {
        Ok(self
            .sheets
            .read()
            .await
            .get(sheet)
            .map(|s| s.rows.clone())
            .unwrap_or_default())
    }

    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), HookError> {
        let mut sheets = self.sheets.write().await;
        let target = sheets
            .get_mut(sheet)
            .ok_or_else(|| HookError::Persistence(format!("sheet not found: {sheet}")))?;
        target.rows.push(row);
        Ok(())
    }
}

/// Property store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for MemoryPropertyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, HookError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), HookError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_sheet_is_idempotent() {
        let store = MemoryTabularStore::new();
        assert!(matches!(store.ensure_sheet("s", &["a", "b"]).await, Ok(true)));
        assert!(matches!(store.ensure_sheet("s", &["x"]).await, Ok(false)));
        assert_eq!(
            store.header("s").await,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn append_requires_existing_sheet() {
        let store = MemoryTabularStore::new();
        assert!(store.append_row("missing", vec!["x".into()]).await.is_err());
    }

    #[tokio::test]
    async fn rows_come_back_in_append_order() {
        let store = MemoryTabularStore::new();
        let _ = store.ensure_sheet("s", &["a"]).await;
        let _ = store.append_row("s", vec!["1".into()]).await;
        let _ = store.append_row("s", vec!["2".into()]).await;
        let rows = store.rows("s").await.unwrap_or_default();
        assert_eq!(rows, vec![vec!["1".to_string()], vec!["2".to_string()]]);
        assert!(store.rows("other").await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn properties_overwrite() {
        let store = MemoryPropertyStore::new();
        assert!(matches!(store.get("k").await, Ok(None)));
        let _ = store.set("k", "1").await;
        let _ = store.set("k", "2").await;
        assert_eq!(store.get("k").await.ok().flatten().as_deref(), Some("2"));
    }
}
