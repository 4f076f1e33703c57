//! Telegram Bot API implementation of [`Messenger`].

use super::{ChatTarget, Messenger};
use crate::error::TransmissionError;
use crate::http::preview;
use async_trait::async_trait;
use log::debug;
use mime_guess::from_path;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;

/// The subset of a Bot API reply we look at.
#[derive(Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramClient {
    http: Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(http: Client, api_base: impl Into<String>, bot_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_photo(
        &self,
        target: &ChatTarget,
        photo: &Path,
        caption: &str,
    ) -> Result<(), TransmissionError> {
        let bytes = tokio::fs::read(photo)
            .await
            .map_err(|source| TransmissionError::ReadImage {
                path: photo.display().to_string(),
                source,
            })?;
        let file_name = photo
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "report.png".to_string());
        let mime = from_path(photo).first_or_octet_stream();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(|e| TransmissionError::Transport(e.to_string()))?;
        let mut form = Form::new()
            .text("chat_id", target.chat_id.clone())
            .text("caption", caption.to_string())
            .part("photo", part);
        if let Some(thread_id) = target.thread_id {
            form = form.text("message_thread_id", thread_id.to_string());
        }

        // The URL embeds the bot token; keep it out of transport errors.
        let response = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransmissionError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransmissionError::Transport(e.without_url().to_string()))?;
        let reply = serde_json::from_str::<BotReply>(&body).ok();

        match reply {
            Some(BotReply { ok: true, .. }) if status.is_success() => {
                debug!("sendPhoto accepted by chat {}", target.chat_id);
                Ok(())
            }
            Some(BotReply { description, .. }) => Err(TransmissionError::Api {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| preview(&body)),
            }),
            None => Err(TransmissionError::Api {
                status: status.as_u16(),
                description: preview(&body),
            }),
        }
    }
}
