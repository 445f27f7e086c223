use crate::domain::post::value_objects::PostSlug;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceStatus {
    Resolved,
    Broken,
    ExternalUnchecked,
}

impl ReferenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceStatus::Resolved => "resolved",
            ReferenceStatus::Broken => "broken",
            ReferenceStatus::ExternalUnchecked => "external-unchecked",
        }
    }
}

impl fmt::Display for ReferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    Post(PostSlug),
    Url(String),
    Unresolved(String),
}

impl fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTarget::Post(slug) => f.write_str(slug.as_str()),
            ReferenceTarget::Url(url) => f.write_str(url),
            ReferenceTarget::Unresolved(raw) => f.write_str(raw),
        }
    }
}

/// Directed link from one post to another post or to an external resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub from_slug: PostSlug,
    pub raw: String,
    pub target: ReferenceTarget,
    pub status: ReferenceStatus,
}

impl Reference {
    pub fn resolved(from_slug: PostSlug, raw: impl Into<String>, target: PostSlug) -> Self {
        Self {
            from_slug,
            raw: raw.into(),
            target: ReferenceTarget::Post(target),
            status: ReferenceStatus::Resolved,
        }
    }

    pub fn external(from_slug: PostSlug, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            from_slug,
            raw: url.clone(),
            target: ReferenceTarget::Url(url),
            status: ReferenceStatus::ExternalUnchecked,
        }
    }

    pub fn broken(from_slug: PostSlug, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            from_slug,
            raw: raw.clone(),
            target: ReferenceTarget::Unresolved(raw),
            status: ReferenceStatus::Broken,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.status == ReferenceStatus::Broken
    }
}
