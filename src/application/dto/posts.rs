use crate::domain::post::{Post, RawUnit, Reference, ReferenceTarget};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDto {
    pub from_slug: String,
    pub raw: String,
    /// Final slug for internal links, the URL for external ones, the raw
    /// target text when broken.
    pub target: String,
    pub kind: String,
    pub status: String,
}

impl From<&Reference> for ReferenceDto {
    fn from(reference: &Reference) -> Self {
        let kind = match &reference.target {
            ReferenceTarget::Post(_) => "internal",
            ReferenceTarget::Url(_) => "external",
            ReferenceTarget::Unresolved(_) => "internal",
        };
        Self {
            from_slug: reference.from_slug.as_str().to_string(),
            raw: reference.raw.clone(),
            target: reference.target.to_string(),
            kind: kind.into(),
            status: reference.status.as_str().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionDto {
    pub ordinal: u64,
    pub origin: String,
    pub title: String,
    pub publish_date: NaiveDateTime,
    pub body_chars: usize,
    pub canonical: bool,
}

impl RevisionDto {
    fn from_unit(unit: &Arc<RawUnit>, post: &Post) -> Self {
        Self {
            ordinal: unit.ordinal(),
            origin: unit.origin().to_string(),
            title: unit.title.as_str().to_string(),
            publish_date: unit.publish_date.as_naive(),
            body_chars: unit.body.char_len(),
            canonical: unit.source_id == post.canonical_source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDto {
    pub slug: String,
    pub title: String,
    pub publish_date: NaiveDateTime,
    #[serde(default)]
    pub modified: Option<NaiveDateTime>,
    #[serde(default)]
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: String,
    pub body: String,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    pub revision_history: Vec<RevisionDto>,
    pub references: Vec<ReferenceDto>,
}

impl From<&Post> for PostDto {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.as_str().to_string(),
            title: post.title.as_str().to_string(),
            publish_date: post.publish_date.as_naive(),
            modified: post.modified.map(|d| d.as_naive()),
            category: post.category.as_ref().map(|c| c.as_str().to_string()),
            tags: post.tags.iter().map(|t| t.as_str().to_string()).collect(),
            authors: post.authors.clone(),
            summary: post.summary.clone(),
            status: post.status.as_str().into(),
            body: post.body.as_str().to_string(),
            previous: None,
            next: None,
            revision_history: post
                .revision_history
                .iter()
                .map(|unit| RevisionDto::from_unit(unit, post))
                .collect(),
            references: post.references.iter().map(Into::into).collect(),
        }
    }
}
