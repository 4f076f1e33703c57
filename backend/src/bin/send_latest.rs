//! Sends the newest screenshot in the uploads directory to the chat once and
//! exits. Useful to flush an image whose forwarding failed earlier.
//!
//! Reads `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, optional
//! `TELEGRAM_THREAD_ID`, `UPLOADS_DIR` and `HTTP_TIMEOUT_SECS`.

use env_logger::Env;
use log::{error, info};
use shift_ledger::app::build_report_sender;
use shift_ledger::config::{http_timeout_from_env, uploads_dir_from_env, TelegramConfig};
use shift_ledger::http::build_client;
use shift_ledger::report_sender::SendOutcome;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let telegram = match TelegramConfig::from_env() {
        Ok(telegram) => telegram,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let timeout = match http_timeout_from_env() {
        Ok(timeout) => timeout,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let http = match build_client(timeout) {
        Ok(http) => http,
        Err(e) => {
            error!("Cannot build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let uploads_dir = uploads_dir_from_env();
    info!("Uploads directory: {}", uploads_dir.display());
    let sender = build_report_sender(http, &telegram, uploads_dir);

    match sender.send_latest_image().await {
        Ok(SendOutcome::NothingToSend) => info!("Nothing to send"),
        Ok(SendOutcome::Sent { file, .. }) => info!("Sent {}", file.display()),
        Err(e) => {
            error!("Sending failed: {}", e);
            std::process::exit(1);
        }
    }
}
