mod constants;
mod handlers;
mod models;
mod schedule;
mod settings;
mod storage;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::constants::{DEFAULT_SETTINGS_PATH, DEFAULT_STORAGE_PATH, LOG_DIRECTIVE};
use crate::models::{Data, Error};
use crate::settings::Settings;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    initialize_logging();

    let config = load_configuration();

    // The settings document holds the login token, so it is required
    let settings = match Settings::load(&config.settings_path).await {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings file: {}", e);
            std::process::exit(1);
        }
    };

    let token = settings.discord.token.clone();
    let data = Arc::new(Data::new(settings, config.storage_path));

    // A missing or corrupt storage file is non-fatal
    storage::load(&data).await;

    schedule::start_save_scheduler(Arc::clone(&data));

    if let Err(e) = start_bot(token, data).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// File locations resolved from the environment
struct Config {
    settings_path: PathBuf,
    storage_path: PathBuf,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Resolve the settings and storage file paths from environment variables
fn load_configuration() -> Config {
    let settings_path = std::env::var("SETTINGS_PATH")
        .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let storage_path =
        std::env::var("STORAGE_PATH").unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());

    Config {
        settings_path: PathBuf::from(settings_path),
        storage_path: PathBuf::from(storage_path),
    }
}

/// Create and start the Discord client
async fn start_bot(token: String, data: Arc<Data>) -> Result<(), Error> {
    let data_for_setup = Arc::clone(&data);

    let framework: poise::Framework<Arc<Data>, Error> = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, _framework, data: &Arc<Data>| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::Ready { data_about_bot } => {
                            info!(
                                "Connected to Discord as {}. Ready to use",
                                data_about_bot.user.name
                            );
                        }
                        serenity::FullEvent::Message { new_message } => {
                            handlers::handle_message(ctx, new_message, &**data).await;
                        }
                        serenity::FullEvent::ReactionAdd { add_reaction } => {
                            handlers::handle_reaction_add(ctx, add_reaction, &**data).await;
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| Box::pin(async move { Ok(data_for_setup) }))
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    client.start().await?;

    Ok(())
}
