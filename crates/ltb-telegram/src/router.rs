use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use ltb_core::{
    backend::{BackendApi, HttpBackend},
    config::Config,
    coordinator::Coordinator,
    messaging::MessagingPort,
    poller::{JobPoller, PollConfig, TokioSleeper},
    session::{InMemorySessionStore, SessionStore},
};

use crate::handlers;
use crate::TelegramMessenger;

pub struct AppState {
    pub cfg: Arc<Config>,
    pub coordinator: Coordinator,
}

/// Build the bot, wire the core behind its ports, and run the long-polling
/// dispatcher until shutdown.
pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        tracing::info!("ltb started: @{}", me.username());
    }
    tracing::info!(api = %cfg.api_base_url, interval = ?cfg.polling_interval, "backend configured");

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let backend: Arc<dyn BackendApi> =
        Arc::new(HttpBackend::new(cfg.api_base_url.clone(), cfg.http_timeout)?);
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let poller = Arc::new(JobPoller::new(
        backend.clone(),
        messenger.clone(),
        Arc::new(TokioSleeper),
        PollConfig {
            interval: cfg.polling_interval,
            max_attempts: cfg.poll_max_attempts,
        },
    ));

    let coordinator = Coordinator::new(
        store,
        backend,
        messenger,
        poller,
        cfg.provider_prefix.clone(),
    );

    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        coordinator,
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
