// src/domain/publication/entity.rs
use crate::domain::post::{Category, Post, PostSlug, Reference, Tag};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteMetadata {
    pub name: String,
    pub url: String,
    pub author: Option<String>,
    pub timezone: String,
}

/// A canonical post with its position in the publication order.
#[derive(Debug, Clone)]
pub struct PublishedPost {
    pub post: Post,
    /// The entry before this one in the sequence (newer).
    pub previous: Option<PostSlug>,
    /// The entry after this one in the sequence (older).
    pub next: Option<PostSlug>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub number: usize,
    pub slugs: Vec<PostSlug>,
}

/// Year → month → slugs, each list in publication order.
pub type ArchiveIndex = BTreeMap<i32, BTreeMap<u32, Vec<PostSlug>>>;

/// Final, ordered and cross-referenced collection handed to the renderer.
#[derive(Debug, Clone)]
pub struct PublicationSet {
    pub site: SiteMetadata,
    pub posts: Vec<PublishedPost>,
    pub hidden: Vec<Post>,
    pub categories: BTreeMap<Category, Vec<PostSlug>>,
    pub tags: BTreeMap<Tag, Vec<PostSlug>>,
    pub archives: ArchiveIndex,
    pub pages: Vec<IndexPage>,
}

impl PublicationSet {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &PostSlug> {
        self.posts.iter().map(|p| &p.post.slug)
    }

    pub fn get(&self, slug: &str) -> Option<&PublishedPost> {
        self.posts.iter().find(|p| p.post.slug.as_str() == slug)
    }

    /// Every post including hidden ones.
    pub fn all_posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().map(|p| &p.post).chain(self.hidden.iter())
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.all_posts().flat_map(|p| p.references.iter())
    }

    pub fn broken_references(&self) -> impl Iterator<Item = &Reference> {
        self.references().filter(|r| r.is_broken())
    }
}
