use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};
use shift_ledger::app::{build_state, cors};
use shift_ledger::config::{crash_log_path_from_env, AppConfig};
use shift_ledger::error::StartupError;
use shift_ledger::services;
use std::path::Path;

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let state = build_state(&config)?;
    let bind = (config.host.clone(), config.port);

    info!("Server running on {}:{}", bind.0, bind.1);
    info!("Spreadsheet: {}", config.sheets.spreadsheet_id);
    info!("Uploads directory: {}", config.uploads_dir.display());
    match config.telegram.thread_id {
        Some(thread_id) => info!("Telegram chat {} thread {}", config.telegram.chat_id, thread_id),
        None => info!("Telegram chat {} (main thread)", config.telegram.chat_id),
    }

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .app_data(web::Data::new(state.clone()))
            .service(services::shift_data::configure_routes())
            .service(services::health::configure_routes())
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}

fn fail(crash_log: &Path, context: &str, err: &StartupError) -> ! {
    error!("{}: {}", context, err);
    if let Err(e) = shift_ledger::crash::record(crash_log, context, err) {
        warn!("Could not write crash record {}: {}", crash_log.display(), e);
    }
    std::process::exit(1);
}

#[actix_web::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&crash_log_path_from_env(), "Invalid configuration", &e.into()),
    };

    let crash_log = config.crash_log_path.clone();
    if let Err(e) = run(config).await {
        fail(&crash_log, "Server error", &e);
    }
}
