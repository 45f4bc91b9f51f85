mod app;
mod buffer;
mod hit;
mod paths;
mod settings;
mod spinner;
mod terminal;
mod text_field;
mod view;

use std::fs::{self, File};

use log::{info, warn, LevelFilter};
use roster_lib::RosterClient;
use simplelog::{Config, WriteLogger};

use crate::app::AppError;
use crate::settings::{AppSettings, MemoryBackend, SettingsError, SettingsProvider, SqliteBackend};

#[tokio::main]
async fn main() {
    if let Err(e) = start().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn start() -> Result<(), AppError> {
    let (provider, settings_error) = open_settings().await;
    let settings = AppSettings::load(&provider).await?;

    init_logging(settings.level_filter())?;
    if let Some(e) = settings_error {
        warn!("Settings database unavailable, using defaults for this session: {}", e);
    }
    info!("Starting roster-tui");
    info!("Endpoint: {}, timeout: {:?}", settings.endpoint, settings.timeout());

    let client = RosterClient::builder()
        .url(&settings.endpoint)
        .timeout(settings.timeout())
        .connect_timeout(settings.timeout())
        .build()?;

    let result = app::run(client).await;
    info!("Exiting roster-tui");
    result
}

/// Opens the settings database, falling back to in-memory settings.
async fn open_settings() -> (SettingsProvider, Option<SettingsError>) {
    let Some(path) = paths::settings_db() else {
        return (SettingsProvider::new(MemoryBackend::new()), None);
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }

    match SqliteBackend::open(&path).await {
        Ok(backend) => (SettingsProvider::new(backend), None),
        Err(e) => (SettingsProvider::new(MemoryBackend::new()), Some(e)),
    }
}

fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    paths::rotate_logs();

    let log_path = match paths::log_file() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            path
        }
        None => paths::FALLBACK_LOG.into(),
    };

    let log_file = File::create(&log_path)?;
    WriteLogger::init(level, Config::default(), log_file)?;
    Ok(())
}
