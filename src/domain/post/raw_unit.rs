// src/domain/post/raw_unit.rs
use crate::domain::post::value_objects::{
    Category, PostBody, PostSlug, PostStatus, PostTitle, PublishDate, SourceId, Tag,
};
use std::collections::BTreeMap;

/// Unparsed text of one content unit as handed over by a content source.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source_id: SourceId,
    pub text: String,
}

impl SourceDocument {
    pub fn new(source_id: SourceId, text: impl Into<String>) -> Self {
        Self {
            source_id,
            text: text.into(),
        }
    }
}

/// One parsed content unit. Immutable once built; a newer revision of the same
/// article arrives as another `RawUnit`.
#[derive(Debug, Clone)]
pub struct RawUnit {
    pub source_id: SourceId,
    pub title: PostTitle,
    pub publish_date: PublishDate,
    pub modified: Option<PublishDate>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub authors: Vec<String>,
    pub summary: Option<String>,
    pub slug: Option<PostSlug>,
    pub status: PostStatus,
    pub body: PostBody,
    /// Header fields with no dedicated attribute, keyed by lower-cased name.
    pub metadata: BTreeMap<String, String>,
}

impl RawUnit {
    pub fn ordinal(&self) -> u64 {
        self.source_id.ordinal()
    }

    pub fn origin(&self) -> &str {
        self.source_id.origin()
    }
}
