use crate::application::{error::ApplicationResult, ports::content::ContentSource};
use crate::domain::post::{SourceDocument, SourceId};
use async_trait::async_trait;

/// Serves a fixed list of `(origin, text)` pairs in the order given.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentSource {
    entries: Vec<(String, String)>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, origin: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.push((origin.into(), text.into()));
        self
    }
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn load(&self) -> ApplicationResult<Vec<SourceDocument>> {
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(ordinal, (origin, text))| {
                SourceDocument::new(SourceId::new(ordinal as u64, origin.clone()), text.clone())
            })
            .collect())
    }
}
