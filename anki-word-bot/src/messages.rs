//! User-facing texts (German).

use card_store::CardRecord;

use crate::core::HandlerError;

pub const ACCESS_DENIED: &str =
    "❌ Zugriff verweigert.\n\nSie sind nicht autorisiert, diesen Bot zu verwenden.";

pub const GREETING: &str = "Hallo! Ich bin ein German Word Bot.\n\n\
Senden Sie mir ein deutsches Wort, und ich werde:\n\
1. Ein Beispielsatz mit diesem Wort erstellen\n\
2. Eine Übersetzung bereitstellen\n\
3. Eine Anki-Karte hinzufügen\n\n\
Verwenden Sie /export, um alle Karten als .apkg-Datei zu exportieren.\n\
Verwenden Sie /clear, um alle gesammelten Karten zu löschen.";

pub const HELP: &str = "Verfügbare Befehle:\n\
/start - Startet den Bot\n\
/help - Zeigt diese Hilfe\n\
/export - Exportiert alle gesammelten Karten als .apkg-Datei\n\
/clear - Löscht alle gesammelten Karten\n\n\
Senden Sie einfach ein deutsches Wort, um eine Karte zu erstellen!";

pub const EMPTY_INPUT: &str = "Bitte senden Sie ein deutsches Wort.";

pub const NOTHING_TO_EXPORT: &str =
    "Keine Karten zum Exportieren. Erstellen Sie zuerst einige Karten!";

/// Confirmation after a card was added; `total` is the number of records now in the store.
pub fn card_created(record: &CardRecord, total: usize) -> String {
    format!(
        "✅ 2 Karten erstellt!\n\n\
         Wort: {}\n\
         Beispielsatz: {}\n\
         Übersetzung: {}\n\n\
         Kartenpaare gesammelt: {} ({} Karten)\n\
         Verwenden Sie /export, um die .apkg-Datei zu erhalten.",
        record.word,
        record.example_sentence,
        record.translation,
        total,
        total * 2
    )
}

pub fn export_caption(count: usize) -> String {
    format!("✅ {} Karten exportiert!", count)
}

pub fn cleared(count: usize) -> String {
    format!("✅ {} Karten gelöscht.", count)
}

/// Text reported to the user for a failed message.
pub fn error_text(error: &HandlerError) -> String {
    match error {
        HandlerError::AuthorizationDenied => ACCESS_DENIED.to_string(),
        HandlerError::EmptyInput => EMPTY_INPUT.to_string(),
        HandlerError::Generation(e) => format!(
            "Ein Fehler ist aufgetreten: {}\nBitte versuchen Sie es später erneut.",
            e
        ),
        HandlerError::Encoding(anki_deck::EncodingError::Empty) => NOTHING_TO_EXPORT.to_string(),
        HandlerError::Encoding(e) => format!("Fehler beim Exportieren: {}", e),
        HandlerError::Export(e) => format!("Fehler beim Exportieren: {}", e),
    }
}
