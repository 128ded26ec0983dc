//! Blob storage for uploaded restaurant photos.
//!
//! [`BlobStore`] is the seam between the mutation workflow and wherever the
//! bytes actually live. [`LocalBlobStore`] writes files under a directory that
//! the API serves statically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Fallback stem when a submitted file name has no usable characters.
const FALLBACK_FILE_NAME: &str = "upload";

/// Length of the random token mixed into stored file names.
const TOKEN_LENGTH: usize = 8;

/// An uploaded file as received from a form.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name (untrusted).
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Empty form fields arrive as zero-byte files.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Upload '{0}' is empty")]
    EmptyUpload(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores and removes uploaded files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `upload` and return its public locator.
    ///
    /// Every call yields a distinct locator, even for identical file names.
    async fn store(&self, upload: &Upload) -> Result<String, BlobError>;

    /// Remove the file behind `url`. A file that is already gone is not an
    /// error, nor is a locator this store did not issue.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}

/// Replace whitespace runs with `-` and strip anything that could escape the
/// upload directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut safe = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                safe.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            safe.push(c);
        }
    }

    let safe = safe.trim_start_matches('.').to_string();
    if safe.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        safe
    }
}

/// Build a stored file name: `{unix_millis}-{token}-{sanitized}`.
pub fn unique_file_name(name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{millis}-{}-{}",
        &token[..TOKEN_LENGTH],
        sanitize_file_name(name)
    )
}

/// Stores uploads as files in a single directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    /// `url_prefix` is the public path the directory is served under,
    /// e.g. `/uploads`.
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a locator back to a file path, or `None` if it is not ours.
    fn locate(&self, url: &str) -> Option<PathBuf> {
        let file_name = url
            .strip_prefix(&self.url_prefix)?
            .strip_prefix('/')?;

        let is_plain = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != "..";

        is_plain.then(|| self.root.join(file_name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, upload: &Upload) -> Result<String, BlobError> {
        if upload.is_empty() {
            return Err(BlobError::EmptyUpload(upload.file_name.clone()));
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = unique_file_name(&upload.file_name);
        tokio::fs::write(self.root.join(&file_name), &upload.data).await?;

        tracing::debug!(file_name = %file_name, bytes = upload.data.len(), "Stored upload");
        Ok(format!("{}/{file_name}", self.url_prefix))
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let Some(path) = self.locate(url) else {
            tracing::debug!(url, "Ignoring delete for foreign locator");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_becomes_dashes() {
        assert_eq!(sanitize_file_name("my  cafe photo.jpg"), "my-cafe-photo.jpg");
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\front.png"), "front.png");
        assert_eq!(sanitize_file_name(".."), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
    }

    #[test]
    fn unique_names_differ_for_same_input() {
        let a = unique_file_name("front.jpg");
        let b = unique_file_name("front.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("-front.jpg"));
    }

    #[tokio::test]
    async fn store_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads/");

        let url = store.store(&Upload::new("menu board.png", b"png".to_vec())).await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-menu-board.png"));

        let path = store.locate(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png");

        store.delete(&url).await.unwrap();
        assert!(!path.exists());

        // Already absent.
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn identical_names_get_distinct_locators() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads");
        let upload = Upload::new("same.jpg", vec![1, 2, 3]);

        let first = store.store(&upload).await.unwrap();
        let second = store.store(&upload).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads");

        let err = store.store(&Upload::new("blank.jpg", Vec::new())).await.unwrap_err();
        assert!(matches!(err, BlobError::EmptyUpload(_)));
    }

    #[tokio::test]
    async fn foreign_locators_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "/uploads");

        assert!(store.locate("https://cdn.example.com/a.jpg").is_none());
        assert!(store.locate("/uploads/../secret").is_none());
        assert!(store.locate("/uploads/").is_none());
        store.delete("relative/path.jpg").await.unwrap();
    }
}
