//! Prompt text, response schema and response validation.

use card_store::CardRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::GenerationError;

/// Name under which the schema is sent in `response_format`.
pub const SCHEMA_NAME: &str = "example_response";

/// The structured reply: an everyday German sentence using the word, and its English translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleResponse {
    pub example_sentence: String,
    pub translation: String,
}

pub fn build_prompt(word: &str) -> String {
    format!(
        "Erstelle einen Beispielsatz auf Deutsch mit dem Wort \"{}\". \n\
         Der Satz sollte natürlich und alltäglich sein. \n\
         Dann übersetze diesen Satz ins Englische.",
        word
    )
}

/// JSON schema matching [`ExampleResponse`]; strict mode requires every property to be listed in
/// `required` and `additionalProperties` to be false.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "example_sentence": {
                "type": "string",
                "description": "A natural and everyday example sentence in German"
            },
            "translation": {
                "type": "string",
                "description": "The translation of the example sentence into English"
            }
        },
        "required": ["example_sentence", "translation"],
        "additionalProperties": false
    })
}

/// Validates the raw model reply and builds the record for `word`.
pub fn parse_response(word: &str, raw: &str) -> Result<CardRecord, GenerationError> {
    let parsed: ExampleResponse = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    let example_sentence = parsed.example_sentence.trim();
    let translation = parsed.translation.trim();
    if example_sentence.is_empty() || translation.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "example_sentence and translation must not be empty".to_string(),
        ));
    }

    Ok(CardRecord::new(word, example_sentence, translation))
}
