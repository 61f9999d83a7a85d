use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::config::S3Settings;
use crate::store::StoreError;

/// Blob storage for admin uploads. Returns the public URL of the stored object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Streams the file at `source` to `key`.
    async fn put_file(
        &self,
        source: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<String, StoreError>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    settings: S3Settings,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, settings: S3Settings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_file(
        &self,
        source: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StoreError::Object(format!("failed to open upload spool: {e}")))?;

        self.client
            .put_object()
            .bucket(&self.settings.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::Object(format!("S3 upload failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.settings.bucket, key);
        Ok(self.settings.public_url(key))
    }
}

/// Builds a namespaced key `folder/<uuid>.<ext>`, keeping the original
/// extension when it is short and alphanumeric.
pub fn object_key(folder: &str, filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) => format!("{folder}/{}.{ext}", Uuid::new_v4()),
        None => format!("{folder}/{}", Uuid::new_v4()),
    }
}

/// Folder names become the first key segment.
pub fn is_valid_folder(folder: &str) -> bool {
    (1..=64).contains(&folder.len())
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key("images", "Headshot.JPG");
        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".jpg"));
        let id = key
            .trim_start_matches("images/")
            .trim_end_matches(".jpg");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_object_key_drops_suspicious_extension() {
        let key = object_key("docs", "report.tar.gz/../../x");
        assert!(key.starts_with("docs/"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_object_keys_are_unique() {
        assert_ne!(object_key("a", "x.png"), object_key("a", "x.png"));
    }

    #[test]
    fn test_folder_validation() {
        assert!(is_valid_folder("images"));
        assert!(is_valid_folder("podcast_art-2024"));
        assert!(!is_valid_folder(""));
        assert!(!is_valid_folder("a/b"));
        assert!(!is_valid_folder(".."));
    }
}
