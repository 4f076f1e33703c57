//! The uploads directory: where screenshots wait until they reach the chat.
//!
//! Attachments are written as `<unix-millis>-<original name>` so the newest
//! upload is also the newest file. [`find_latest_image`] is what the report
//! sender uses to pick the file to forward.

use crate::error::StorageError;
use chrono::Utc;
use log::{debug, warn};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;

/// Extensions (lowercase, without the dot) that count as images.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Whether the file name carries one of the image extensions, ignoring case.
pub fn is_image_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Regular image files in `dir` with their modification time.
///
/// A missing directory yields an empty list. Entries whose metadata cannot
/// be read are skipped.
async fn image_entries(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Uploads directory {} not readable: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut images = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Stopped listing {}: {}", dir.display(), e);
                break;
            }
        };
        if !is_image_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if let Ok(modified) = metadata.modified() {
            images.push((entry.path(), modified));
        }
    }
    images
}

/// Returns the most recently modified image in `dir`, or `None` when the
/// directory does not exist or holds no images.
///
/// Files with the same modification time are ordered by name; the lexically
/// greatest one wins.
pub async fn find_latest_image(dir: &Path) -> Option<PathBuf> {
    image_entries(dir)
        .await
        .into_iter()
        .max_by(|(a_path, a_time), (b_path, b_time)| {
            a_time
                .cmp(b_time)
                .then_with(|| a_path.file_name().cmp(&b_path.file_name()))
        })
        .map(|(path, _)| path)
}

/// Number of images currently waiting in `dir`.
pub async fn count_images(dir: &Path) -> usize {
    image_entries(dir).await.len()
}

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}._-]+").expect("static regex"))
}

/// Reduces a client-supplied file name to its last path component and
/// replaces anything outside letters, digits, `.`, `_` and `-` with `_`.
///
/// The extension is kept apart from the stem so that cleaning never eats it:
/// `..png` becomes `screenshot.png`, not `png`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();
    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let cleaned = unsafe_chars().replace_all(stem, "_");
    let cleaned = cleaned.trim_start_matches('.');
    let stem = if cleaned.is_empty() { "screenshot" } else { cleaned };
    match extension {
        Some(ext) => format!("{}.{}", stem, unsafe_chars().replace_all(ext, "_")),
        None => stem.to_string(),
    }
}

/// Handle on the uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an attachment and returns its path.
    ///
    /// The directory is created on first use.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.dir.display().to_string(),
                source,
            })?;

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.display().to_string(),
                source,
            })?;

        debug!("Stored attachment {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    pub async fn latest_image(&self) -> Option<PathBuf> {
        find_latest_image(&self.dir).await
    }

    pub async fn pending_images(&self) -> usize {
        count_images(&self.dir).await
    }

    /// Removes a forwarded file. A file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> std::io::Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} was already removed", path.display());
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str, secs: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs))
            .unwrap();
        path
    }

    #[tokio::test]
    async fn picks_latest_image_and_ignores_other_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.png", 1);
        let b = touch(dir.path(), "b.jpg", 3);
        touch(dir.path(), "c.txt", 5);

        assert_eq!(find_latest_image(dir.path()).await, Some(b));
        assert_eq!(count_images(dir.path()).await, 2);
    }

    #[tokio::test]
    async fn extension_match_ignores_case() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "old.webp", 1);
        let upper = touch(dir.path(), "SHOT.JPEG", 2);

        assert_eq!(find_latest_image(dir.path()).await, Some(upper));
    }

    #[tokio::test]
    async fn ties_go_to_greatest_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "1700-a.png", 7);
        let later_name = touch(dir.path(), "1700-b.png", 7);

        assert_eq!(find_latest_image(dir.path()).await, Some(later_name));
    }

    #[tokio::test]
    async fn missing_or_empty_directory_yields_none() {
        let dir = tempdir().unwrap();
        assert_eq!(find_latest_image(dir.path()).await, None);
        assert_eq!(find_latest_image(&dir.path().join("absent")).await, None);
        assert_eq!(count_images(&dir.path().join("absent")).await, 0);
    }

    #[tokio::test]
    async fn directories_named_like_images_are_skipped() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.png")).unwrap();

        assert_eq!(find_latest_image(dir.path()).await, None);
    }

    #[test]
    fn sanitizes_client_file_names() {
        assert_eq!(sanitize_file_name("report 01.png"), "report_01.png");
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_file_name("C:\\Users\\till\\shot.jpg"), "shot.jpg");
        assert_eq!(sanitize_file_name("смена.png"), "смена.png");
        assert_eq!(sanitize_file_name("shift.01.jpeg"), "shift.01.jpeg");
        assert_eq!(sanitize_file_name(""), "screenshot");
    }

    #[test]
    fn sanitizing_keeps_the_image_extension() {
        for name in ["..png", ".png", "...JPG", "..\\.webp"] {
            let cleaned = sanitize_file_name(name);
            assert!(is_image_file_name(&cleaned), "{} became {}", name, cleaned);
        }
        assert_eq!(sanitize_file_name("..png"), "screenshot.png");
    }

    #[tokio::test]
    async fn dot_prefixed_upload_is_still_found() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let path = store.save("..png", b"png").await.unwrap();

        assert!(path.to_string_lossy().ends_with("-screenshot.png"));
        assert_eq!(store.latest_image().await, Some(path));
        assert_eq!(store.pending_images().await, 1);
    }

    #[tokio::test]
    async fn save_prefixes_timestamp_and_creates_directory() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let path = store.save("till.png", b"png-bytes").await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        let (prefix, rest) = name.split_once('-').unwrap();
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(rest, "till.png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
        assert_eq!(store.latest_image().await, Some(path));
        assert_eq!(store.pending_images().await, 1);
    }

    #[tokio::test]
    async fn removing_twice_is_benign() {
        let dir = tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        let path = touch(dir.path(), "x.png", 1);

        assert!(store.remove(&path).await.unwrap());
        assert!(!store.remove(&path).await.unwrap());
    }
}
