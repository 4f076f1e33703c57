//! Wiring: turns an [`AppConfig`] into the clients and state the server runs on.

use crate::config::{AppConfig, TelegramConfig, ALLOWED_ORIGINS};
use crate::error::StartupError;
use crate::http::build_client;
use crate::ledger::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::ledger::sheets::SheetsClient;
use crate::messenger::telegram::TelegramClient;
use crate::messenger::ChatTarget;
use crate::report_sender::ReportSender;
use crate::state::AppState;
use crate::submission::SubmissionOrchestrator;
use crate::uploads::UploadStore;
use actix_cors::Cors;
use actix_web::http::{header, Method};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

pub fn build_report_sender(
    http: Client,
    telegram: &TelegramConfig,
    uploads_dir: PathBuf,
) -> ReportSender {
    let messenger = TelegramClient::new(http, &telegram.api_base, &telegram.bot_token);
    let target = ChatTarget {
        chat_id: telegram.chat_id.clone(),
        thread_id: telegram.thread_id,
    };
    ReportSender::new(UploadStore::new(uploads_dir), Arc::new(messenger), target)
}

/// Reads the service account key and constructs every client.
pub fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let http = build_client(config.http_timeout)?;

    let key = ServiceAccountKey::from_file(&config.sheets.service_account_key)?;
    let tokens = ServiceAccountAuth::new(http.clone(), key);
    let ledger = SheetsClient::new(
        http.clone(),
        &config.sheets.api_base,
        &config.sheets.spreadsheet_id,
        Arc::new(tokens),
    );

    let sender = build_report_sender(http, &config.telegram, config.uploads_dir.clone());
    Ok(AppState::new(SubmissionOrchestrator::new(
        Arc::new(ledger),
        sender,
    )))
}

/// CORS policy for the local development front ends.
pub fn cors() -> Cors {
    ALLOWED_ORIGINS
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}
