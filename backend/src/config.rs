//! Runtime configuration, read from the process environment.
//!
//! `main.rs` loads a `.env` file (if present) with `dotenvy` and then calls
//! [`AppConfig::from_env`]. Parsing goes through [`AppConfig::from_lookup`] so
//! tests can supply variables without touching the real environment.
//!
//! | variable                      | required | default                           |
//! |-------------------------------|----------|-----------------------------------|
//! | `HOST`                        | no       | `0.0.0.0`                         |
//! | `PORT`                        | no       | `5000`                            |
//! | `GOOGLE_SERVICE_ACCOUNT_KEY`  | yes      |                                   |
//! | `SPREADSHEET_ID`              | yes      |                                   |
//! | `TELEGRAM_BOT_TOKEN`          | yes      |                                   |
//! | `TELEGRAM_CHAT_ID`            | yes      |                                   |
//! | `TELEGRAM_THREAD_ID`          | no       |                                   |
//! | `UPLOADS_DIR`                 | no       | `uploads`                         |
//! | `CRASH_LOG_PATH`              | no       | `server_crash.log`                |
//! | `HTTP_TIMEOUT_SECS`           | no       | `30`                              |
//! | `SHEETS_API_BASE`             | no       | `https://sheets.googleapis.com`   |
//! | `TELEGRAM_API_BASE`           | no       | `https://api.telegram.org`        |

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Development origins allowed to call the API from a browser.
pub const ALLOWED_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3001",
    "http://localhost:2999",
    "http://127.0.0.1:2999",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub crash_log_path: PathBuf,
    pub http_timeout: Duration,
    pub sheets: SheetsConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Path to the service-account JSON key file.
    pub service_account_key: PathBuf,
    pub spreadsheet_id: String,
    pub api_base: String,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Forum topic to post into; `None` posts to the main chat.
    pub thread_id: Option<i64>,
    pub api_base: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("thread_id", &self.thread_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => 5000,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            uploads_dir: uploads_dir(&get),
            crash_log_path: crash_log_path(&get),
            http_timeout: http_timeout(&get)?,
            sheets: SheetsConfig {
                service_account_key: PathBuf::from(require("GOOGLE_SERVICE_ACCOUNT_KEY")?),
                spreadsheet_id: require("SPREADSHEET_ID")?,
                api_base: get("SHEETS_API_BASE")
                    .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
            },
            telegram: TelegramConfig::from_lookup(&get)?,
        })
    }
}

impl TelegramConfig {
    /// Only the chat settings, for tools that never touch the ledger.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_value)
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let thread_id = match get("TELEGRAM_THREAD_ID") {
            Some(raw) => Some(parse_number("TELEGRAM_THREAD_ID", &raw)?),
            None => None,
        };
        Ok(Self {
            bot_token: get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?,
            chat_id: get("TELEGRAM_CHAT_ID").ok_or(ConfigError::Missing("TELEGRAM_CHAT_ID"))?,
            thread_id,
            api_base: get("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
        })
    }
}

/// A trimmed environment value; blank counts as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn uploads_dir(get: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(get("UPLOADS_DIR").unwrap_or_else(|| "uploads".to_string()))
}

fn crash_log_path(get: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(get("CRASH_LOG_PATH").unwrap_or_else(|| "server_crash.log".to_string()))
}

fn http_timeout(get: &dyn Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
    let secs: u64 = match get("HTTP_TIMEOUT_SECS") {
        Some(raw) => parse_number("HTTP_TIMEOUT_SECS", &raw)?,
        None => 30,
    };
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key: "HTTP_TIMEOUT_SECS",
            value: "0".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// `UPLOADS_DIR`, or `uploads` when unset.
pub fn uploads_dir_from_env() -> PathBuf {
    uploads_dir(&env_value)
}

/// `CRASH_LOG_PATH`, or `server_crash.log` when unset. Usable before the rest
/// of the configuration has been validated.
pub fn crash_log_path_from_env() -> PathBuf {
    crash_log_path(&env_value)
}

/// `HTTP_TIMEOUT_SECS`, or 30 seconds when unset. Zero or a non-number is an
/// error, as it is for the server.
pub fn http_timeout_from_env() -> Result<Duration, ConfigError> {
    http_timeout(&env_value)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("GOOGLE_SERVICE_ACCOUNT_KEY", "/etc/shift/key.json"),
        ("SPREADSHEET_ID", "sheet-123"),
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "-1001"),
    ];

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.crash_log_path, PathBuf::from("server_crash.log"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.sheets.spreadsheet_id, "sheet-123");
        assert_eq!(config.sheets.api_base, DEFAULT_SHEETS_API_BASE);
        assert_eq!(config.telegram.thread_id, None);
        assert_eq!(config.telegram.api_base, DEFAULT_TELEGRAM_API_BASE);
    }

    #[test]
    fn reads_optional_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8081"),
            ("TELEGRAM_THREAD_ID", "42"),
            ("UPLOADS_DIR", "/var/lib/shift/uploads"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.telegram.thread_id, Some(42));
        assert_eq!(config.uploads_dir, PathBuf::from("/var/lib/shift/uploads"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_required_value_is_reported_by_name() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "SPREADSHEET_ID")
            .collect();
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("SPREADSHEET_ID")));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs.retain(|(k, _)| *k != "TELEGRAM_CHAT_ID");
        pairs.push(("TELEGRAM_CHAT_ID", "   "));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("TELEGRAM_CHAT_ID")));
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("TELEGRAM_THREAD_ID", "general"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "TELEGRAM_THREAD_ID", .. }));
    }

    #[test]
    fn paths_and_timeout_are_trimmed_and_validated() {
        let get = lookup(&[
            ("UPLOADS_DIR", "  /srv/uploads  "),
            ("CRASH_LOG_PATH", "   "),
            ("HTTP_TIMEOUT_SECS", " 12 "),
        ]);
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        assert_eq!(uploads_dir(&get), PathBuf::from("/srv/uploads"));
        assert_eq!(crash_log_path(&get), PathBuf::from("server_crash.log"));
        assert_eq!(http_timeout(&get).unwrap(), Duration::from_secs(12));

        let bad = lookup(&[("HTTP_TIMEOUT_SECS", "soon")]);
        assert!(matches!(
            http_timeout(&bad),
            Err(ConfigError::Invalid { key: "HTTP_TIMEOUT_SECS", .. })
        ));
        let zero = lookup(&[("HTTP_TIMEOUT_SECS", "0")]);
        assert!(http_timeout(&zero).is_err());
    }

    #[test]
    fn debug_output_hides_bot_token() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let printed = format!("{:?}", config.telegram);

        assert!(!printed.contains("123:abc"));
    }
}
