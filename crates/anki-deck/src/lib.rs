//! # anki-deck
//!
//! Encodes [`CardRecord`]s into an Anki package (`.apkg`): a ZIP archive holding a schema-11
//! `collection.anki2` SQLite database and an empty `media` map.
//!
//! Every record becomes one note of the word-learning model and two cards (forward and reverse).
//! The whole package is produced in memory; the caller decides what to do with the bytes.
//! Output is deterministic: the same records and encoder settings always give the same bytes.

mod collection;
pub mod model;
pub mod note;

use card_store::CardRecord;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::{info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use collection::CollectionLayout;
pub use model::{CardTemplate, NoteModel};

pub const DEFAULT_DECK_ID: i64 = 2059400110;
pub const DEFAULT_MODEL_ID: i64 = 1091735104;
pub const DEFAULT_DECK_NAME: &str = "German Words";
pub const DEFAULT_MODEL_NAME: &str = "German Word Learning";

/// Timestamp written into collection rows unless overridden (2024-01-01T00:00:00Z).
pub const DEFAULT_TIMESTAMP_SECS: i64 = 1_704_067_200;

/// Entry name of the collection database inside the package.
pub const COLLECTION_ENTRY: &str = "collection.anki2";
/// Entry name of the media map inside the package.
pub const MEDIA_ENTRY: &str = "media";

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("No cards to export")]
    Empty,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deck/model configuration used for every export.
#[derive(Debug, Clone)]
pub struct DeckEncoder {
    deck_id: i64,
    deck_name: String,
    model: NoteModel,
    timestamp_secs: i64,
}

impl DeckEncoder {
    /// Encoder for the given deck and model names, using the default ids.
    pub fn new(deck_name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            deck_id: DEFAULT_DECK_ID,
            deck_name: deck_name.into(),
            model: NoteModel::word_learning(DEFAULT_MODEL_ID, model_name),
            timestamp_secs: DEFAULT_TIMESTAMP_SECS,
        }
    }

    pub fn with_deck_id(mut self, deck_id: i64) -> Self {
        self.deck_id = deck_id;
        self
    }

    pub fn with_model_id(mut self, model_id: i64) -> Self {
        self.model.id = model_id;
        self
    }

    /// Overrides the timestamp stamped on the collection, notes and cards.
    pub fn with_timestamp(mut self, timestamp_secs: i64) -> Self {
        self.timestamp_secs = timestamp_secs;
        self
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn model(&self) -> &NoteModel {
        &self.model
    }

    /// Encodes `records` (in order) into `.apkg` bytes. Fails with [`EncodingError::Empty`] when
    /// there is nothing to export.
    #[instrument(skip(self, records), fields(deck = %self.deck_name, records = records.len()))]
    pub fn encode(&self, records: &[CardRecord]) -> Result<Vec<u8>, EncodingError> {
        if records.is_empty() {
            return Err(EncodingError::Empty);
        }

        let layout = CollectionLayout {
            deck_id: self.deck_id,
            deck_name: &self.deck_name,
            model: &self.model,
            timestamp_secs: self.timestamp_secs,
        };
        let database = collection::build(&layout, records)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        zip.start_file(COLLECTION_ENTRY, options)?;
        zip.write_all(&database)?;
        zip.start_file(MEDIA_ENTRY, options)?;
        zip.write_all(b"{}")?;
        let bytes = zip.finish()?.into_inner();

        info!(
            notes = records.len(),
            cards = records.len() * self.model.cards_per_note(),
            size = bytes.len(),
            "Deck package encoded"
        );
        Ok(bytes)
    }
}

impl Default for DeckEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_DECK_NAME, DEFAULT_MODEL_NAME)
    }
}
