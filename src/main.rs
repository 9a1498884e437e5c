use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use steamlens::application::SteamEngine;
use steamlens::domain::entities::SteamId64;
use steamlens::infrastructure::config::LoadedConfig;
use steamlens::infrastructure::{AppConfig, CliArgs, Command, ConfigLoader, SteamHttpClient};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<LoadedConfig> {
    let mut loaded = match args.config.as_deref() {
        Some(path) => {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            ConfigLoader::with_dir(dir).load(Some(path))?
        }
        None => ConfigLoader::new()?.load(None)?,
    };
    loaded.config.merge_with_args(args);
    Ok(loaded)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(engine: &SteamEngine, config: &AppConfig, command: Command) -> Result<()> {
    match command {
        Command::Resolve { identifier } => {
            let api_key = config.api_key();
            let identity = engine.resolve_identity(&identifier, api_key.as_ref()).await?;
            print_json(&identity)
        }
        Command::Background { profile_url } => {
            let asset = engine.get_background(&profile_url).await?;
            print_json(&asset)
        }
        Command::Game { url } => {
            let name = engine.get_game_name(&url).await?;
            print_json(&name)
        }
        Command::Items { steam_id, market } => {
            let steam64: SteamId64 = steam_id
                .parse()
                .wrap_err_with(|| format!("invalid 64-bit Steam ID {steam_id:?}"))?;
            let mut items = engine
                .list_equipped_items(steam64, &config.language)
                .await?;
            if market {
                items = engine
                    .enrich_with_market_data(items, config.currency)
                    .await;
            }
            print_json(&items)
        }
        Command::AppId { url } => {
            let app_id = SteamEngine::extract_app_id(&url)
                .ok_or_else(|| eyre!("no app ID found in {url:?}"))?;
            println!("{app_id}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let loaded = load_config(&args)?;

    init_logging(&loaded.config)?;

    info!(version = steamlens::VERSION, "Starting Steamlens");
    loaded.report();
    let config = loaded.config;

    let http = Arc::new(SteamHttpClient::with_settings(
        &config.http.user_agent,
        config.http.timeout(),
    )?);
    let engine = SteamEngine::new(http, &config);

    run(&engine, &config, args.command).await
}
