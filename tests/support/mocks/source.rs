use async_trait::async_trait;
use lyceum_press::application::{
    error::{ApplicationError, ApplicationResult},
    ports::content::ContentSource,
};
use lyceum_press::domain::post::SourceDocument;

/// Content source whose store is unreachable.
pub struct FailingSource;

#[async_trait]
impl ContentSource for FailingSource {
    async fn load(&self) -> ApplicationResult<Vec<SourceDocument>> {
        Err(ApplicationError::infrastructure("content store unavailable"))
    }
}
