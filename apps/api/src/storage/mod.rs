//! Blob storage helper: S3 when configured, local disk otherwise or on failure.

pub mod handlers;

use std::path::{Component, Path, PathBuf};

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    /// `s3://<bucket>/<key>` or a path under the local storage directory.
    pub location: String,
    pub backend: StorageBackend,
}

#[derive(Clone)]
struct S3Target {
    client: S3Client,
    bucket: String,
}

#[derive(Clone)]
pub struct FileStorage {
    s3: Option<S3Target>,
    local_dir: PathBuf,
}

pub fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("html") => "text/html; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Final path component of a client-supplied name.
fn base_name(name: &str) -> Result<&str, StorageError> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| StorageError::InvalidName(name.to_string()))
}

impl FileStorage {
    pub fn new(s3: Option<(S3Client, String)>, local_dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&local_dir)?;
        Ok(Self {
            s3: s3.map(|(client, bucket)| S3Target { client, bucket }),
            local_dir,
        })
    }

    pub fn local_only(local_dir: PathBuf) -> Result<Self, StorageError> {
        Self::new(None, local_dir)
    }

    /// Stores bytes remotely, falling back to local disk on any remote failure.
    pub async fn store_file(
        &self,
        data: Vec<u8>,
        file_name: &str,
        file_type: &str,
    ) -> Result<StoredFile, StorageError> {
        let name = base_name(file_name)?;

        if let Some(s3) = &self.s3 {
            match self.store_remote(s3, data.clone(), name, file_type).await {
                Ok(stored) => return Ok(stored),
                Err(e) => warn!("Error storing file remotely, using local storage: {e}"),
            }
        }

        self.store_local(&data, name).await
    }

    async fn store_remote(
        &self,
        s3: &S3Target,
        data: Vec<u8>,
        name: &str,
        file_type: &str,
    ) -> Result<StoredFile, StorageError> {
        let key = format!("uploads/{}_{}", Uuid::new_v4(), name);
        s3.client
            .put_object()
            .bucket(&s3.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type_for(name))
            .metadata("file-type", file_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload failed: {e}")))?;

        info!("Uploaded file to s3://{}/{}", s3.bucket, key);
        Ok(StoredFile {
            location: format!("s3://{}/{}", s3.bucket, key),
            backend: StorageBackend::S3,
        })
    }

    async fn store_local(&self, data: &[u8], name: &str) -> Result<StoredFile, StorageError> {
        let unique = format!("{}_{}", Local::now().format("%Y%m%d%H%M%S"), name);
        let path = self.local_dir.join(unique);
        tokio::fs::write(&path, data).await?;

        info!("Stored file locally at {}", path.display());
        Ok(StoredFile {
            location: path.to_string_lossy().into_owned(),
            backend: StorageBackend::Local,
        })
    }

    /// Splits `s3://<bucket>/<key>` for the configured bucket.
    fn s3_key<'a>(&self, location: &'a str) -> Option<(&S3Target, &'a str)> {
        let s3 = self.s3.as_ref()?;
        let rest = location.strip_prefix("s3://")?;
        let (bucket, key) = rest.split_once('/')?;
        (bucket == s3.bucket && !key.is_empty()).then_some((s3, key))
    }

    /// Resolves a location to a file directly inside the local storage directory.
    fn local_path(&self, location: &str) -> Option<PathBuf> {
        let path = Path::new(location);
        let relative = path.strip_prefix(&self.local_dir).unwrap_or(path);

        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.local_dir.join(name)),
            _ => None,
        }
    }

    /// File contents, or `None` when the location cannot be read.
    pub async fn get_file(&self, location: &str) -> Option<Vec<u8>> {
        if let Some((s3, key)) = self.s3_key(location) {
            let result = s3.client.get_object().bucket(&s3.bucket).key(key).send().await;
            return match result {
                Ok(output) => match output.body.collect().await {
                    Ok(data) => Some(data.into_bytes().to_vec()),
                    Err(e) => {
                        warn!("Error reading s3 object {key}: {e}");
                        None
                    }
                },
                Err(e) => {
                    warn!("Error retrieving s3 object {key}: {e}");
                    None
                }
            };
        }

        let Some(path) = self.local_path(location) else {
            warn!("Refusing to read outside storage directory: {location}");
            return None;
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Error retrieving file {}: {e}", path.display());
                None
            }
        }
    }

    /// `true` when the file existed and was removed.
    pub async fn delete_file(&self, location: &str) -> bool {
        if let Some((s3, key)) = self.s3_key(location) {
            return match s3.client.delete_object().bucket(&s3.bucket).key(key).send().await {
                Ok(_) => {
                    info!("Deleted s3://{}/{}", s3.bucket, key);
                    true
                }
                Err(e) => {
                    warn!("Error deleting s3 object {key}: {e}");
                    false
                }
            };
        }

        let Some(path) = self.local_path(location) else {
            warn!("Refusing to delete outside storage directory: {location}");
            return false;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {}", path.display());
                true
            }
            Err(e) => {
                warn!("Error deleting local file {}: {e}", path.display());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::local_only(dir.path().join("storage")).unwrap();

        let stored = storage
            .store_file(b"png-bytes".to_vec(), "logo.png", "image")
            .await
            .unwrap();
        assert_eq!(stored.backend, StorageBackend::Local);
        assert!(stored.location.ends_with("_logo.png"));

        assert_eq!(storage.get_file(&stored.location).await.unwrap(), b"png-bytes");
        assert!(storage.delete_file(&stored.location).await);
        assert!(storage.get_file(&stored.location).await.is_none());
        assert!(!storage.delete_file(&stored.location).await);
    }

    #[tokio::test]
    async fn test_client_path_components_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::local_only(dir.path().to_path_buf()).unwrap();

        let stored = storage
            .store_file(b"x".to_vec(), "../../etc/evil.png", "image")
            .await
            .unwrap();
        let path = PathBuf::from(&stored.location);
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(stored.location.ends_with("_evil.png"));
    }

    #[tokio::test]
    async fn test_locations_outside_storage_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, b"secret").unwrap();

        let storage = FileStorage::local_only(dir.path().join("storage")).unwrap();
        assert!(storage.get_file(outside.to_str().unwrap()).await.is_none());
        assert!(storage.get_file("../outside.txt").await.is_none());
        assert!(!storage.delete_file(outside.to_str().unwrap()).await);
        assert!(outside.exists());
    }

    #[test]
    fn test_extension_checks() {
        assert!(has_allowed_extension("photo.JPG"));
        assert!(has_allowed_extension("a.b.jpeg"));
        assert!(!has_allowed_extension("doc.pdf"));
        assert!(!has_allowed_extension("noext"));
        assert_eq!(content_type_for("x.png"), "image/png");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
    }
}
