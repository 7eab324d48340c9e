//! End-to-end tests of the handler chain: mock Bot and CardGenerator, real store and encoder.

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use anki_word_bot::{messages, process_message, AllowList, HandlerChain, HandlerResponse, Message};

mod common;
use common::{build_chain, message_from, MockBot, MockGenerator, Sent};

const USER: i64 = 4242;

fn haus_generator() -> MockGenerator {
    MockGenerator::new()
        .with_answer("Haus", "Das Haus ist groß.", "The house is big.")
        .with_answer("Baum", "Der Baum ist alt.", "The tree is old.")
        .with_answer("Katze", "Die Katze schläft.", "The cat is sleeping.")
}

/// Opens the collection inside an exported package and returns (note fields, card count).
fn decode_package(bytes: &[u8]) -> (Vec<String>, i64) {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut collection = Vec::new();
    archive
        .by_name("collection.anki2")
        .unwrap()
        .read_to_end(&mut collection)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.anki2");
    std::fs::write(&path, &collection).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    let mut stmt = conn.prepare("SELECT flds FROM notes ORDER BY id").unwrap();
    let fields = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let cards: i64 = conn
        .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
        .unwrap();
    (fields, cards)
}

#[tokio::test]
async fn test_haus_scenario_adds_card_and_exports_deck() {
    let bot = MockBot::new();
    let generator = Arc::new(haus_generator());
    let (chain, components) = build_chain(AllowList::open(), bot.clone(), generator.clone()).await;

    let response = chain.handle(&message_from(USER, "Haus")).await.unwrap();
    assert!(matches!(response, HandlerResponse::Reply(_)));
    assert_eq!(components.store.count().await, 1);
    assert_eq!(generator.calls(), vec!["Haus"]);

    let confirmation = bot.last_text().unwrap();
    assert!(confirmation.contains("Wort: Haus"));
    assert!(confirmation.contains("Das Haus ist groß."));
    assert!(confirmation.contains("Kartenpaare gesammelt: 1 (2 Karten)"));
    assert!(bot.sent().contains(&Sent::Typing { chat_id: USER }));

    let response = chain.handle(&message_from(USER, "/export")).await.unwrap();
    assert_eq!(response, HandlerResponse::Stop);

    let documents = bot.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].file_name, "german_words.apkg");
    assert_eq!(
        documents[0].caption.as_deref(),
        Some(messages::export_caption(1).as_str())
    );

    let (fields, cards) = decode_package(&documents[0].bytes);
    assert_eq!(cards, 2);
    assert_eq!(fields.len(), 1);
    assert!(fields[0].starts_with("Haus\u{1f}"));
    assert!(fields[0].contains("The house is big."));

    // Exporting does not consume the collection.
    assert_eq!(components.store.count().await, 1);
}

#[tokio::test]
async fn test_generation_failure_leaves_store_unchanged() {
    let bot = MockBot::new();
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "Haus")).await.unwrap();
    chain.handle(&message_from(USER, "Schadenfreude")).await.unwrap();

    assert_eq!(components.store.count().await, 1);
    let reply = bot.last_text().unwrap();
    assert!(reply.starts_with("Ein Fehler ist aufgetreten:"));
    assert!(reply.contains("Schadenfreude"));
    assert!(!reply.contains("Karten erstellt"));
}

#[tokio::test]
async fn test_export_with_empty_store_sends_no_document() {
    let bot = MockBot::new();
    let (chain, _components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "/export")).await.unwrap();

    assert!(bot.documents().is_empty());
    assert_eq!(bot.last_text().as_deref(), Some(messages::NOTHING_TO_EXPORT));
}

#[tokio::test]
async fn test_export_contains_every_record_in_order() {
    let bot = MockBot::new();
    let (chain, _components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    for word in ["Haus", "Baum", "Katze"] {
        chain.handle(&message_from(USER, word)).await.unwrap();
    }
    chain
        .handle(&message_from(USER, &format!("/export@{}", common::TEST_BOT_USERNAME)))
        .await
        .unwrap();

    let documents = bot.documents();
    assert_eq!(documents.len(), 1);
    let (fields, cards) = decode_package(&documents[0].bytes);
    assert_eq!(cards, 6);
    let words: Vec<&str> = fields
        .iter()
        .map(|f| f.split('\u{1f}').next().unwrap())
        .collect();
    assert_eq!(words, vec!["Haus", "Baum", "Katze"]);
}

#[tokio::test]
async fn test_clear_empties_store() {
    let bot = MockBot::new();
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "Haus")).await.unwrap();
    chain.handle(&message_from(USER, "Baum")).await.unwrap();
    chain.handle(&message_from(USER, "/clear")).await.unwrap();

    assert_eq!(components.store.count().await, 0);
    assert_eq!(bot.last_text(), Some(messages::cleared(2)));

    chain.handle(&message_from(USER, "/export")).await.unwrap();
    assert!(bot.documents().is_empty());
}

#[tokio::test]
async fn test_unauthorized_user_is_rejected() {
    let bot = MockBot::new();
    let generator = Arc::new(haus_generator());
    let (chain, components) =
        build_chain(AllowList::new([1, 2, 3]), bot.clone(), generator.clone()).await;

    let response = chain.handle(&message_from(99, "Haus")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(bot.texts(), vec![messages::ACCESS_DENIED.to_string()]);
    assert!(generator.calls().is_empty());
    assert_eq!(components.store.count().await, 0);

    chain.handle(&message_from(2, "Haus")).await.unwrap();
    assert_eq!(components.store.count().await, 1);
}

#[tokio::test]
async fn test_start_and_help() {
    let bot = MockBot::new();
    let (chain, _components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "/start")).await.unwrap();
    chain.handle(&message_from(USER, "/help")).await.unwrap();

    assert_eq!(
        bot.texts(),
        vec![messages::GREETING.to_string(), messages::HELP.to_string()]
    );
}

#[tokio::test]
async fn test_blank_input_asks_for_a_word() {
    let bot = MockBot::new();
    let generator = Arc::new(haus_generator());
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), generator.clone()).await;

    chain.handle(&message_from(USER, "   ")).await.unwrap();

    assert_eq!(bot.last_text().as_deref(), Some(messages::EMPTY_INPUT));
    assert!(generator.calls().is_empty());
    assert_eq!(components.store.count().await, 0);
}

#[tokio::test]
async fn test_unknown_command_is_ignored() {
    let bot = MockBot::new();
    let generator = Arc::new(haus_generator());
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), generator.clone()).await;

    chain.handle(&message_from(USER, "/stop")).await.unwrap();
    chain.handle(&message_from(USER, "/export@otherbot")).await.unwrap();

    assert!(bot.sent().is_empty());
    assert!(generator.calls().is_empty());
    assert_eq!(components.store.count().await, 0);
}

#[tokio::test]
async fn test_concurrent_submissions_are_all_kept() {
    let bot = MockBot::new();
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    let mut tasks = Vec::new();
    for i in 0..20 {
        let chain = chain.clone();
        let word = ["Haus", "Baum", "Katze"][i % 3];
        tasks.push(tokio::spawn(async move {
            chain.handle(&message_from(USER + i as i64, word)).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(components.store.count().await, 20);
}

#[tokio::test]
async fn test_failed_upload_reports_export_error() {
    let bot = MockBot::rejecting_documents();
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "Haus")).await.unwrap();
    chain.handle(&message_from(USER, "/export")).await.unwrap();

    assert!(bot.documents().is_empty());
    let reply = bot.last_text().unwrap();
    assert!(reply.starts_with("Fehler beim Exportieren:"));
    assert!(reply.contains("Request Entity Too Large"));
    assert!(!bot.texts().contains(&messages::export_caption(1)));
    assert_eq!(components.store.count().await, 1);
}

#[tokio::test]
async fn test_commands_are_case_insensitive() {
    let bot = MockBot::new();
    let (chain, components) =
        build_chain(AllowList::open(), bot.clone(), Arc::new(haus_generator())).await;

    chain.handle(&message_from(USER, "Haus")).await.unwrap();
    chain.handle(&message_from(USER, "/Export")).await.unwrap();
    assert_eq!(bot.documents().len(), 1);

    chain.handle(&message_from(USER, "/CLEAR")).await.unwrap();
    assert_eq!(components.store.count().await, 0);
    assert_eq!(bot.last_text(), Some(messages::cleared(1)));
}

/// Processes one chat's messages one after another, the way the REPL does per chat.
fn spawn_chat(chain: &HandlerChain, messages: Vec<Message>) -> tokio::task::JoinHandle<()> {
    let chain = chain.clone();
    tokio::spawn(async move {
        for message in &messages {
            process_message(&chain, message).await;
        }
    })
}

#[tokio::test]
async fn test_one_chat_keeps_submission_order() {
    let bot = MockBot::new();
    let generator = haus_generator()
        .with_delay("Haus", Duration::from_millis(200))
        .with_delay("Baum", Duration::from_millis(10));
    let (chain, components) = build_chain(AllowList::open(), bot.clone(), Arc::new(generator)).await;

    let other_user = USER + 1;
    let first = spawn_chat(
        &chain,
        vec![message_from(USER, "Haus"), message_from(USER, "Baum")],
    );
    let second = spawn_chat(&chain, vec![message_from(other_user, "Katze")]);
    first.await.unwrap();
    second.await.unwrap();

    let words: Vec<String> = components
        .store
        .snapshot()
        .await
        .into_iter()
        .map(|record| record.word)
        .collect();
    // The other chat is not held up by the slow word.
    assert_eq!(words, vec!["Katze", "Haus", "Baum"]);
}

#[tokio::test]
async fn test_clear_after_slow_word_sees_it() {
    let bot = MockBot::new();
    let generator = haus_generator().with_delay("Haus", Duration::from_millis(200));
    let (chain, components) = build_chain(AllowList::open(), bot.clone(), Arc::new(generator)).await;

    spawn_chat(
        &chain,
        vec![message_from(USER, "Haus"), message_from(USER, "/clear")],
    )
    .await
    .unwrap();

    assert_eq!(components.store.count().await, 0);
    assert_eq!(bot.last_text(), Some(messages::cleared(1)));
}
