use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use review_collector::adapters::ai::OpenAIGenerationClient;
use review_collector::adapters::profile::PgBusinessProfileLookup;
use review_collector::adapters::storage::InMemorySessionStore;
use review_collector::adapters::telegram::{Renderer, TelegramAdapter};
use review_collector::application::DialogueEngine;
use review_collector::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.logging.init();
    config.validate()?;

    info!(
        model = %config.ai.model,
        generation_timeout_secs = config.dialogue.generation_timeout_secs,
        "Starting review collector"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let lookup = Arc::new(PgBusinessProfileLookup::new(pool.clone()));
    let generator = Arc::new(OpenAIGenerationClient::new(config.ai.openai())?);
    let sessions = Arc::new(InMemorySessionStore::new());
    let engine = Arc::new(DialogueEngine::new(
        lookup,
        generator,
        sessions,
        config.dialogue.engine_config(),
    ));

    let cancel = CancellationToken::new();
    let sweeper = Arc::clone(&engine).spawn_idle_sweeper(
        config.dialogue.sweep_interval(),
        config.dialogue.session_idle_timeout(),
        cancel.clone(),
    );

    let renderer = Renderer::new(&config.dialogue.export_base_url)?;
    let adapter = TelegramAdapter::new(
        &config.telegram.bot_token,
        engine,
        renderer,
        config.telegram.polling_timeout_secs,
    );
    let polling = tokio::spawn(adapter.run(cancel.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
    cancel.cancel();

    if let Err(e) = polling.await {
        error!(error = %e, "Telegram polling task panicked");
    }
    if let Err(e) = sweeper.await {
        error!(error = %e, "Idle sweeper task panicked");
    }
    pool.close().await;

    info!("Review collector stopped");
    Ok(())
}
