//! Attachment uploads (bills, receipts, site plans, photos)

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
};

const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "kml", "kmz", "doc", "docx", "xls", "xlsx",
];

/// Where uploaded bytes end up
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, name: &str, bytes: &[u8]) -> AppResult<()>;
}

/// Files written to the configured uploads directory
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Upload(format!("Cannot create upload directory: {}", e)))?;
        tokio::fs::write(self.dir.join(name), bytes)
            .await
            .map_err(|e| AppError::Upload(format!("Cannot store file: {}", e)))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Public URL of the stored file
    pub url: String,
    pub file_name: String,
    pub size: usize,
}

#[derive(Clone)]
pub struct UploadsService {
    store: Arc<dyn FileStore>,
    config: UploadsConfig,
}

fn extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

impl UploadsService {
    pub fn new(config: UploadsConfig) -> Self {
        let store = Arc::new(LocalFileStore::new(config.dir.clone()));
        Self::with_store(store, config)
    }

    pub fn with_store(store: Arc<dyn FileStore>, config: UploadsConfig) -> Self {
        Self { store, config }
    }

    /// Store one file under a generated name and return its public location
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> AppResult<UploadedFile> {
        if bytes.is_empty() {
            return Err(AppError::Upload("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.config.max_size_bytes {
            return Err(AppError::Upload(format!(
                "File exceeds the {} byte limit",
                self.config.max_size_bytes
            )));
        }
        let ext = extension(original_name).ok_or_else(|| {
            AppError::Upload(format!("File type of '{}' is not allowed", original_name))
        })?;

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        self.store.put(&file_name, bytes).await?;

        tracing::info!(original = original_name, stored = %file_name, size = bytes.len(), "file uploaded");

        Ok(UploadedFile {
            url: format!("{}/{}", self.config.public_prefix.trim_end_matches('/'), file_name),
            file_name,
            size: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UploadsConfig {
        UploadsConfig {
            dir: PathBuf::from("/tmp/casfos-test"),
            public_prefix: "/uploads/".to_string(),
            max_size_bytes: 16,
        }
    }

    #[tokio::test]
    async fn test_stores_allowed_file_under_generated_name() {
        let mut store = MockFileStore::new();
        store
            .expect_put()
            .withf(|name, bytes| name.ends_with(".pdf") && bytes == b"bill")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UploadsService::with_store(Arc::new(store), config());
        let uploaded = tokio_test::assert_ok!(service.save("Bill.PDF", b"bill").await);

        assert!(uploaded.url.starts_with("/uploads/"));
        assert!(uploaded.url.ends_with(&uploaded.file_name));
        assert_eq!(uploaded.size, 4);
    }

    #[tokio::test]
    async fn test_rejects_disallowed_and_oversized_files() {
        let mut store = MockFileStore::new();
        store.expect_put().never();
        let service = UploadsService::with_store(Arc::new(store), config());

        assert!(matches!(service.save("run.exe", b"x").await, Err(AppError::Upload(_))));
        assert!(matches!(service.save("noext", b"x").await, Err(AppError::Upload(_))));
        assert!(matches!(service.save("plan.kml", &[0u8; 17]).await, Err(AppError::Upload(_))));
        assert!(matches!(service.save("plan.kml", b"").await, Err(AppError::Upload(_))));
    }
}
