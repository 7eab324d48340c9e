//! # Card store
//!
//! Session-scoped, in-memory collection of generated [`CardRecord`]s.
//!
//! [`CardStore`] is a cheap-to-clone handle around `Arc<RwLock<Vec<_>>>`; every clone sees the same
//! records. Insertion order is preserved and is the order cards are exported in. The store is
//! append-only except for [`CardStore::clear`], which empties it in one step.
//!
//! Nothing is persisted: records live until the process exits or the store is cleared.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// One generated flashcard triple: the submitted word, an example sentence and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub word: String,
    pub example_sentence: String,
    pub translation: String,
}

impl CardRecord {
    pub fn new(
        word: impl Into<String>,
        example_sentence: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            example_sentence: example_sentence.into(),
            translation: translation.into(),
        }
    }
}

/// Shared, ordered store of [`CardRecord`]s.
///
/// Locks are only held for the duration of a single operation; callers must not await external
/// services while holding data obtained from the store in a way that requires the lock.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    records: Arc<RwLock<Vec<CardRecord>>>,
}

impl CardStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record at the end and returns the new number of records.
    pub async fn append(&self, record: CardRecord) -> usize {
        let mut records = self.records.write().await;
        debug!(word = %record.word, position = records.len(), "Appending card record");
        records.push(record);
        records.len()
    }

    /// Removes every record and returns how many were removed.
    pub async fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.records.write().await);
        debug!(removed = removed.len(), "Cleared card store");
        removed.len()
    }

    /// Current number of records.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Point-in-time copy of all records in insertion order.
    pub async fn snapshot(&self) -> Vec<CardRecord> {
        self.records.read().await.clone()
    }
}
