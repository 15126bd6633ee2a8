use std::path::PathBuf;
use std::sync::Arc;

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;

use promptsmith::bot::{Command, IncomingMessage, PromptSynthesizer, Router, TelegramClient, WhisperTranscriber};
use promptsmith::config::Config;
use promptsmith::openai;
use promptsmith::telegram_log::TelegramLogLayer;

struct BotState {
    router: Arc<Router>,
    bot_username: String,
}

#[tokio::main]
async fn main() {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);

    // Logging needs data_dir from the config, so a config failure is reported
    // through a bare stdout subscriber.
    let config = match Config::load(settings_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(env_filter()).init();
            error!("{e}");
            eprintln!("Ошибка конфигурации: {e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);
    let _log_guard = init_logging(&config, &bot);

    info!("🚀 Starting promptsmith...");
    if let Some(ref path) = settings_path {
        info!("Loaded settings from {}", path.display());
    }
    info!("Chat model: {}, transcription model: {}", config.chat_model, config.transcription_model);

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            info!("Bot user ID: {}, username: @{}", me.id, me.username());
            me.username().to_string()
        }
        Err(e) => {
            warn!("Failed to get bot info: {e}");
            String::new()
        }
    };

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register command menu: {e}");
    }

    let openai = Arc::new(openai::Client::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    ));
    let router = Arc::new(Router::new(
        Arc::new(TelegramClient::new(bot.clone())),
        Arc::new(WhisperTranscriber::new(openai.clone(), config.transcription_model.clone())),
        Arc::new(PromptSynthesizer::new(openai, config.chat_model.clone(), config.max_completion_tokens)),
    ));
    let state = Arc::new(BotState { router, bot_username });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_message));

    info!("Bot started, polling for updates");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|update| async move {
            debug!("Unhandled update: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling update"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    match IncomingMessage::from_telegram(&msg, &state.bot_username) {
        Some(incoming) => state.router.handle_isolated(incoming).await,
        None => debug!("Ignoring message {} in chat {}", msg.id, msg.chat.id),
    }
    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Stdout + file logging, plus Telegram forwarding when a log chat is configured.
fn init_logging(config: &Config, bot: &Bot) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(env_filter());
    let tg_layer = config
        .log_chat_id
        .map(|chat_id| TelegramLogLayer::new(bot.clone(), chat_id));

    let log_dir = config.data_dir.join("logs");
    let log_file = std::fs::create_dir_all(&log_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("promptsmith.log"))
    });

    match log_file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(stdout_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_filter(env_filter()),
                )
                .with(tg_layer)
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(stdout_layer).with(tg_layer).init();
            warn!("Failed to open log file in {}: {e}", log_dir.display());
            None
        }
    }
}
