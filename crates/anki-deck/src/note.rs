//! Per-note derived values: field string, stable guid and sort-field checksum.

use card_store::CardRecord;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Separator between fields in the `notes.flds` column.
pub const FIELD_SEPARATOR: char = '\x1f';

const BASE91_TABLE: &[u8; 91] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Field values in model order.
pub fn fields(record: &CardRecord) -> [&str; 3] {
    [
        record.word.as_str(),
        record.example_sentence.as_str(),
        record.translation.as_str(),
    ]
}

/// Value of the `flds` column.
pub fn joined_fields(record: &CardRecord) -> String {
    fields(record).join(&FIELD_SEPARATOR.to_string())
}

/// Stable note guid: first 8 bytes of SHA-256 over the fields joined by `__`, base91 encoded.
/// The same record always maps to the same guid, so re-importing a deck updates instead of duplicating.
pub fn guid(record: &CardRecord) -> String {
    let digest = Sha256::digest(fields(record).join("__").as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    base91(u64::from_be_bytes(bytes))
}

/// Anki duplicate-check checksum: first 8 hex digits of SHA-1 of the tag-stripped sort field.
pub fn checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(strip_html(sort_field).as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

fn base91(mut value: u64) -> String {
    let mut reversed = Vec::new();
    while value > 0 {
        reversed.push(BASE91_TABLE[(value % 91) as usize]);
        value /= 91;
    }
    reversed.iter().rev().map(|&b| b as char).collect()
}

fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
