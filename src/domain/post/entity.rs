// src/domain/post/entity.rs
use crate::domain::post::raw_unit::RawUnit;
use crate::domain::post::reference::Reference;
use crate::domain::post::value_objects::{
    Category, PostBody, PostSlug, PostStatus, PostTitle, PublishDate, SourceId, Tag,
};
use std::sync::Arc;

/// The resolved representation of one logical article.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: PostSlug,
    pub title: PostTitle,
    pub publish_date: PublishDate,
    pub modified: Option<PublishDate>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub authors: Vec<String>,
    pub summary: Option<String>,
    pub status: PostStatus,
    pub body: PostBody,
    pub identity_key: String,
    pub canonical_source: SourceId,
    /// Every unit grouped into this post, in ingestion order.
    pub revision_history: Vec<Arc<RawUnit>>,
    pub references: Vec<Reference>,
}

impl Post {
    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }

    /// Hidden posts stay linkable but are left out of listings.
    pub fn is_listed(&self) -> bool {
        self.status != PostStatus::Hidden
    }

    pub fn revision_count(&self) -> usize {
        self.revision_history.len()
    }

    pub fn broken_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.is_broken())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::reference::Reference;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn unit(ordinal: u64) -> Arc<RawUnit> {
        Arc::new(RawUnit {
            source_id: SourceId::new(ordinal, format!("blog/{ordinal}.md")),
            title: PostTitle::new("Variance Swaps").unwrap(),
            publish_date: PublishDate::from_naive(
                NaiveDate::from_ymd_opt(2018, 1, 2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            ),
            modified: None,
            category: None,
            tags: vec![],
            authors: vec![],
            summary: None,
            slug: None,
            status: PostStatus::Published,
            body: PostBody::new("body"),
            metadata: BTreeMap::new(),
        })
    }

    fn sample_post(status: PostStatus) -> Post {
        let first = unit(0);
        let second = unit(1);
        Post {
            slug: PostSlug::new("variance-swaps").unwrap(),
            title: second.title.clone(),
            publish_date: second.publish_date,
            modified: None,
            category: None,
            tags: vec![],
            authors: vec![],
            summary: None,
            status,
            body: second.body.clone(),
            identity_key: "variance swaps".into(),
            canonical_source: second.source_id.clone(),
            revision_history: vec![first, second],
            references: vec![],
        }
    }

    #[test]
    fn hidden_posts_are_not_listed() {
        assert!(sample_post(PostStatus::Published).is_listed());
        assert!(!sample_post(PostStatus::Hidden).is_listed());
    }

    #[test]
    fn with_references_replaces_reference_set() {
        let post = sample_post(PostStatus::Published);
        let from = post.slug.clone();
        let post = post.with_references(vec![
            Reference::broken(from.clone(), "missing-post"),
            Reference::external(from, "https://example.com"),
        ]);
        assert_eq!(post.references.len(), 2);
        assert_eq!(post.broken_references().count(), 1);
        assert_eq!(post.revision_count(), 2);
    }
}
