// src/application/ports/content.rs
use crate::application::error::ApplicationResult;
use crate::domain::post::SourceDocument;
use async_trait::async_trait;

/// Yields every content unit of a run. Implementations assign ordinals in
/// ingestion order, starting at zero, and must be deterministic for an
/// unchanged store.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn load(&self) -> ApplicationResult<Vec<SourceDocument>>;
}
