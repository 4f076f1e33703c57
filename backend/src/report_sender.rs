//! Forwards the newest screenshot from the uploads directory to the chat.
//!
//! A file is deleted only after the chat confirmed it. When sending fails the
//! file stays where it is and, still being the newest image, is picked again
//! by the next call. There is no other retry.

use crate::error::TransmissionError;
use crate::messenger::{ChatTarget, Messenger};
use crate::uploads::UploadStore;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// What a successful call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// No image was waiting.
    NothingToSend,
    /// The image was delivered. `removed` is false when the file could not be
    /// deleted afterwards (or was already gone).
    Sent { file: PathBuf, removed: bool },
}

/// Caption attached to every forwarded report, e.g. `📊 Отчет за 19.10.2026`.
pub fn caption_for(date: NaiveDate) -> String {
    format!("📊 Отчет за {}", date.format("%d.%m.%Y"))
}

#[derive(Clone)]
pub struct ReportSender {
    uploads: UploadStore,
    messenger: Arc<dyn Messenger>,
    target: ChatTarget,
}

impl ReportSender {
    pub fn new(uploads: UploadStore, messenger: Arc<dyn Messenger>, target: ChatTarget) -> Self {
        Self {
            uploads,
            messenger,
            target,
        }
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    pub async fn send_latest_image(&self) -> Result<SendOutcome, TransmissionError> {
        let Some(image) = self.uploads.latest_image().await else {
            info!("No images to send in {}", self.uploads.dir().display());
            return Ok(SendOutcome::NothingToSend);
        };

        match self.target.thread_id {
            Some(thread_id) => info!("Sending {} to thread {}", image.display(), thread_id),
            None => info!("Sending {} to the main chat", image.display()),
        }

        let caption = caption_for(Local::now().date_naive());
        if let Err(e) = self
            .messenger
            .send_photo(&self.target, &image, &caption)
            .await
        {
            error!("Sending {} failed, keeping the file: {}", image.display(), e);
            return Err(e);
        }

        let removed = match self.uploads.remove(&image).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Sent {} but could not delete it: {}", image.display(), e);
                false
            }
        };
        if removed {
            info!("Sent and removed {}", image.display());
        }
        Ok(SendOutcome::Sent {
            file: image,
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingMessenger {
        fail: bool,
        sent: Mutex<Vec<(ChatTarget, PathBuf, String)>>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_photo(
            &self,
            target: &ChatTarget,
            photo: &Path,
            caption: &str,
        ) -> Result<(), TransmissionError> {
            self.sent
                .lock()
                .unwrap()
                .push((target.clone(), photo.to_path_buf(), caption.to_string()));
            if self.fail {
                return Err(TransmissionError::Api {
                    status: 400,
                    description: "Bad Request: chat not found".into(),
                });
            }
            Ok(())
        }
    }

    fn target() -> ChatTarget {
        ChatTarget {
            chat_id: "-1001".into(),
            thread_id: Some(7),
        }
    }

    #[test]
    fn caption_uses_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(caption_for(date), "📊 Отчет за 05.01.2024");
    }

    #[tokio::test]
    async fn sends_and_deletes_latest_image() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("1-shot.png");
        std::fs::write(&image, b"img").unwrap();
        let messenger = Arc::new(RecordingMessenger::default());
        let sender = ReportSender::new(UploadStore::new(dir.path()), messenger.clone(), target());

        let outcome = sender.send_latest_image().await.unwrap();

        assert_eq!(
            outcome,
            SendOutcome::Sent {
                file: image.clone(),
                removed: true
            }
        );
        assert!(!image.exists());
        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, target());
        assert!(sent[0].2.starts_with("📊 Отчет за "));
    }

    #[tokio::test]
    async fn keeps_image_when_sending_fails() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("1-shot.jpg");
        std::fs::write(&image, b"img").unwrap();
        let messenger = Arc::new(RecordingMessenger {
            fail: true,
            ..Default::default()
        });
        let sender = ReportSender::new(UploadStore::new(dir.path()), messenger, target());

        let err = sender.send_latest_image().await.unwrap_err();

        assert!(matches!(err, TransmissionError::Api { status: 400, .. }));
        assert!(image.exists());
        // Still the newest image, so the next call retries it.
        assert_eq!(sender.uploads().latest_image().await, Some(image));
    }

    #[tokio::test]
    async fn empty_directory_is_a_no_op() {
        let dir = tempdir().unwrap();
        let messenger = Arc::new(RecordingMessenger::default());
        let sender = ReportSender::new(
            UploadStore::new(dir.path().join("missing")),
            messenger.clone(),
            target(),
        );

        assert_eq!(
            sender.send_latest_image().await.unwrap(),
            SendOutcome::NothingToSend
        );
        assert!(messenger.sent.lock().unwrap().is_empty());
    }
}
