// src/infrastructure/content/filesystem.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::content::ContentSource,
};
use crate::domain::post::{SourceDocument, SourceId};

/// Reads every content file under a root directory. Files are ingested in
/// walk order with entries sorted by file name, so ordinals are stable
/// between runs.
#[derive(Debug, Clone)]
pub struct FilesystemContentSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FilesystemContentSource {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    async fn collect_files(&self) -> ApplicationResult<Vec<PathBuf>> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();

        tokio::task::spawn_blocking(move || -> ApplicationResult<Vec<PathBuf>> {
            let mut files = Vec::new();
            for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    ApplicationError::infrastructure(format!("walk {}: {e}", root.display()))
                })?;
                if entry.file_type().is_file() && accepts(&extensions, entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Ok(files)
        })
        .await
        .map_err(|e| ApplicationError::infrastructure(format!("content scan aborted: {e}")))?
    }

    fn origin_of(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[async_trait]
impl ContentSource for FilesystemContentSource {
    async fn load(&self) -> ApplicationResult<Vec<SourceDocument>> {
        let files = self.collect_files().await?;
        let mut documents = Vec::with_capacity(files.len());

        for (ordinal, path) in files.iter().enumerate() {
            let origin = self.origin_of(path);
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ApplicationError::infrastructure(format!("read {}: {e}", path.display()))
            })?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(origin = %origin, "content is not valid UTF-8; decoding lossily");
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            };
            documents.push(SourceDocument::new(SourceId::new(ordinal as u64, origin), text));
        }

        tracing::debug!(root = %self.root.display(), files = documents.len(), "loaded content files");
        Ok(documents)
    }
}

fn accepts(extensions: &[String], path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
