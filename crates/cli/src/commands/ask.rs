//! `youthdesk ask` — One question from the terminal.
//!
//! Uses the same assembler as the gateway, so a terminal turn lands in
//! the same history a later web session (with the printed token) sees.

use std::sync::Arc;

use youthdesk_chat::ConversationAssembler;
use youthdesk_config::AppConfig;
use youthdesk_core::store::HistoryStore;
use youthdesk_store::{InMemoryStore, SqliteStore};

pub async fn run(
    config: AppConfig,
    question: &str,
    token: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn HistoryStore> = match config.store.backend.as_str() {
        "memory" => Arc::new(InMemoryStore::new()),
        _ => Arc::new(SqliteStore::new(&config.store.path).await?),
    };
    let generator = youthdesk_generator::build_from_config(&config);

    let assembler = ConversationAssembler::new(store, generator)
        .with_history_window(config.chat.history_window);

    let outcome = assembler.ask(token, question).await?;

    println!("{}", outcome.answer);
    println!();
    println!("guest token: {} (pass --token to continue)", outcome.guest_token);
    Ok(())
}
