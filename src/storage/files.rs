//! Storage for uploaded resume files

use crate::error::{FeedbackError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if needed
    pub async fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            FeedbackError::Storage(format!(
                "Storage not available at {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    /// Copy `source` into the store under a unique name
    pub async fn upload(&self, source: &Path) -> Result<StoredFile> {
        self.ensure_ready().await?;

        let file_name = source
            .file_name()
            .map(|n| sanitize_file_name(&n.to_string_lossy()))
            .unwrap_or_else(|| "resume.pdf".to_string());
        let target = self.root.join(format!("{}-{}", Uuid::new_v4(), file_name));

        let size = fs::copy(source, &target).await.map_err(|e| {
            FeedbackError::Storage(format!("Failed to upload file: {}", e))
        })?;

        debug!("File uploaded successfully: {}", target.display());
        Ok(StoredFile { path: target, size })
    }

    pub async fn remove(&self, stored: &Path) -> Result<bool> {
        // Only delete files that live inside this store
        if !stored.starts_with(&self.root) {
            return Ok(false);
        }
        match fs::remove_file(stored).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned
    }
}
