//! Outbound chat messages.

pub mod telegram;

use crate::error::TransmissionError;
use async_trait::async_trait;
use std::path::Path;

/// Where a photo goes: a chat and, optionally, a topic thread inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTarget {
    pub chat_id: String,
    pub thread_id: Option<i64>,
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Uploads the image at `photo` with `caption`. Returns once the chat
    /// service has confirmed the message.
    async fn send_photo(
        &self,
        target: &ChatTarget,
        photo: &Path,
        caption: &str,
    ) -> Result<(), TransmissionError>;
}
