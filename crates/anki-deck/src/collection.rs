//! Anki collection (schema 11) written into an in-memory SQLite database.

use card_store::CardRecord;
use rusqlite::{params, Connection, DatabaseName};
use serde_json::{json, Value};
use tracing::debug;

use crate::model::NoteModel;
use crate::note;
use crate::EncodingError;

const SCHEMA: &str = r#"
CREATE TABLE col (
    id      integer primary key,
    crt     integer not null,
    mod     integer not null,
    scm     integer not null,
    ver     integer not null,
    dty     integer not null,
    usn     integer not null,
    ls      integer not null,
    conf    text not null,
    models  text not null,
    decks   text not null,
    dconf   text not null,
    tags    text not null
);
CREATE TABLE notes (
    id      integer primary key,
    guid    text not null,
    mid     integer not null,
    mod     integer not null,
    usn     integer not null,
    tags    text not null,
    flds    text not null,
    sfld    integer not null,
    csum    integer not null,
    flags   integer not null,
    data    text not null
);
CREATE TABLE cards (
    id      integer primary key,
    nid     integer not null,
    did     integer not null,
    ord     integer not null,
    mod     integer not null,
    usn     integer not null,
    type    integer not null,
    queue   integer not null,
    due     integer not null,
    ivl     integer not null,
    factor  integer not null,
    reps    integer not null,
    lapses  integer not null,
    left    integer not null,
    odue    integer not null,
    odid    integer not null,
    flags   integer not null,
    data    text not null
);
CREATE TABLE revlog (
    id      integer primary key,
    cid     integer not null,
    usn     integer not null,
    ease    integer not null,
    ivl     integer not null,
    lastIvl integer not null,
    factor  integer not null,
    time    integer not null,
    type    integer not null
);
CREATE TABLE graves (
    usn     integer not null,
    oid     integer not null,
    type    integer not null
);
CREATE INDEX ix_notes_usn ON notes (usn);
CREATE INDEX ix_cards_usn ON cards (usn);
CREATE INDEX ix_revlog_usn ON revlog (usn);
CREATE INDEX ix_cards_nid ON cards (nid);
CREATE INDEX ix_cards_sched ON cards (did, queue, due);
CREATE INDEX ix_revlog_cid ON revlog (cid);
CREATE INDEX ix_notes_csum ON notes (csum);
"#;

/// Deck and model identity plus the timestamp stamped on every row.
pub(crate) struct CollectionLayout<'a> {
    pub deck_id: i64,
    pub deck_name: &'a str,
    pub model: &'a NoteModel,
    pub timestamp_secs: i64,
}

impl CollectionLayout<'_> {
    fn conf(&self) -> Value {
        json!({
            "activeDecks": [1],
            "addToCur": true,
            "collapseTime": 1200,
            "curDeck": 1,
            "curModel": self.model.id.to_string(),
            "dueCounts": true,
            "estTimes": true,
            "newBury": true,
            "newSpread": 0,
            "nextPos": 1,
            "sortBackwards": false,
            "sortType": "noteFld",
            "timeLim": 0,
        })
    }

    fn deck_json(&self, id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "desc": "",
            "mod": self.timestamp_secs,
            "usn": -1,
            "collapsed": false,
            "conf": 1,
            "dyn": 0,
            "extendNew": 0,
            "extendRev": 50,
            "lrnToday": [0, 0],
            "newToday": [0, 0],
            "revToday": [0, 0],
            "timeToday": [0, 0],
        })
    }

    fn decks(&self) -> Value {
        let mut decks = serde_json::Map::new();
        decks.insert("1".to_string(), self.deck_json(1, "Default"));
        decks.insert(
            self.deck_id.to_string(),
            self.deck_json(self.deck_id, self.deck_name),
        );
        Value::Object(decks)
    }

    fn models(&self) -> Value {
        let mut models = serde_json::Map::new();
        models.insert(
            self.model.id.to_string(),
            self.model.to_json(self.deck_id, self.timestamp_secs),
        );
        Value::Object(models)
    }

    fn deck_options() -> Value {
        json!({
            "1": {
                "id": 1,
                "name": "Default",
                "mod": 0,
                "usn": 0,
                "autoplay": true,
                "replayq": true,
                "timer": 0,
                "maxTaken": 60,
                "new": {
                    "bury": true,
                    "delays": [1, 10],
                    "initialFactor": 2500,
                    "ints": [1, 4, 7],
                    "order": 1,
                    "perDay": 20,
                    "separate": true,
                },
                "rev": {
                    "bury": true,
                    "ease4": 1.3,
                    "fuzz": 0.05,
                    "ivlFct": 1,
                    "maxIvl": 36500,
                    "minSpace": 1,
                    "perDay": 100,
                },
                "lapse": {
                    "delays": [10],
                    "leechAction": 0,
                    "leechFails": 8,
                    "minInt": 1,
                    "mult": 0,
                },
            }
        })
    }
}

/// Builds the collection for `records` and returns the raw SQLite database bytes.
pub(crate) fn build(
    layout: &CollectionLayout<'_>,
    records: &[CardRecord],
) -> Result<Vec<u8>, EncodingError> {
    let mut conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;

    let millis = layout.timestamp_secs * 1000;
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO col VALUES (1, ?1, ?2, ?2, 11, 0, 0, 0, ?3, ?4, ?5, ?6, '{}')",
        params![
            layout.timestamp_secs,
            millis,
            serde_json::to_string(&layout.conf())?,
            serde_json::to_string(&layout.models())?,
            serde_json::to_string(&layout.decks())?,
            serde_json::to_string(&CollectionLayout::deck_options())?,
        ],
    )?;

    let cards_per_note = layout.model.cards_per_note() as i64;
    for (position, record) in records.iter().enumerate() {
        let position = position as i64;
        let note_id = millis + position;
        tx.execute(
            "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
            params![
                note_id,
                note::guid(record),
                layout.model.id,
                layout.timestamp_secs,
                note::joined_fields(record),
                record.word,
                note::checksum(&record.word),
            ],
        )?;

        for ord in 0..cards_per_note {
            tx.execute(
                "INSERT INTO cards VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                params![
                    millis + position * cards_per_note + ord,
                    note_id,
                    layout.deck_id,
                    ord,
                    layout.timestamp_secs,
                    position + 1,
                ],
            )?;
        }
    }
    tx.commit()?;

    debug!(
        notes = records.len(),
        cards = records.len() as i64 * cards_per_note,
        "Collection written"
    );

    let data = conn.serialize(DatabaseName::Main)?;
    Ok(data.to_vec())
}
