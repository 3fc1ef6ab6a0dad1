//! Row-presence lookups backing the `unique` rule

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PresenceError;
use crate::traits::{value_to_string, Data};

/// Row to ignore when counting, usually the record being updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion<'a> {
    pub id_column: &'a str,
    pub id: &'a str,
}

/// Counts rows holding a value, the storage-side half of `unique`
#[async_trait]
pub trait PresenceVerifier: Send + Sync {
    async fn count(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        exclusion: Option<Exclusion<'_>>,
    ) -> Result<u64, PresenceError>;
}

/// Table rows held in memory, for tests and standalone use
///
/// Rows are only ever appended, so a writer that panicked cannot leave a
/// half-written table behind; a poisoned lock is recovered rather than
/// reported.
#[derive(Debug, Default)]
pub struct InMemoryPresenceVerifier {
    tables: RwLock<HashMap<String, Vec<Data>>>,
}

impl InMemoryPresenceVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&self, table: &str, row: Data) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.entry(table.to_string()).or_default().push(row);
    }

    pub fn with_row(self, table: &str, row: Data) -> Self {
        self.insert_row(table, row);
        self
    }
}

#[async_trait]
impl PresenceVerifier for InMemoryPresenceVerifier {
    async fn count(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        exclusion: Option<Exclusion<'_>>,
    ) -> Result<u64, PresenceError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);

        let needle = value_to_string(value);
        let count = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.get(column).map(value_to_string).as_deref() == Some(needle.as_str()))
                    .filter(|row| match exclusion {
                        Some(ex) => {
                            row.get(ex.id_column).map(value_to_string).as_deref() != Some(ex.id)
                        }
                        None => true,
                    })
                    .count() as u64
            })
            .unwrap_or(0);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn row(id: i64, email: &str) -> Data {
        let mut row = Data::new();
        row.insert("id".to_string(), json!(id));
        row.insert("email".to_string(), json!(email));
        row
    }

    #[tokio::test]
    async fn test_count_with_and_without_exclusion() {
        let verifier = InMemoryPresenceVerifier::new()
            .with_row("users", row(7, "taken@example.com"))
            .with_row("users", row(8, "other@example.com"));

        let value = json!("taken@example.com");
        assert_eq!(verifier.count("users", "email", &value, None).await.unwrap(), 1);

        let exclusion = Exclusion { id_column: "id", id: "7" };
        assert_eq!(
            verifier.count("users", "email", &value, Some(exclusion)).await.unwrap(),
            0
        );
        assert_eq!(verifier.count("posts", "email", &value, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_poisoned_lock_keeps_rows_and_counts() {
        let verifier = Arc::new(InMemoryPresenceVerifier::new().with_row("users", row(1, "a@example.com")));

        let writer = Arc::clone(&verifier);
        let panicked = std::thread::spawn(move || {
            let _guard = writer.tables.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(verifier.tables.is_poisoned());

        verifier.insert_row("users", row(2, "b@example.com"));

        let value = json!("b@example.com");
        assert_eq!(verifier.count("users", "email", &value, None).await.unwrap(), 1);
        assert_eq!(
            verifier.count("users", "email", &json!("a@example.com"), None).await.unwrap(),
            1
        );
    }
}
