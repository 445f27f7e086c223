// src/application/pipeline/builder.rs
use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::Post;
use crate::domain::publication::{
    ArchiveIndex, IndexPage, PublicationSet, PublishedPost, SiteMetadata,
};

pub struct PublicationSetBuilder {
    site: SiteMetadata,
    page_size: usize,
}

impl PublicationSetBuilder {
    pub fn new(site: SiteMetadata, page_size: usize) -> Self {
        Self {
            site,
            page_size: page_size.max(1),
        }
    }

    /// Orders listed posts newest first (ties by slug), links neighbours and
    /// builds the indexes. Hidden posts are carried along unlisted.
    pub fn build(&self, posts: Vec<Post>) -> DomainResult<PublicationSet> {
        let (mut listed, mut hidden): (Vec<Post>, Vec<Post>) =
            posts.into_iter().partition(Post::is_listed);
        if listed.is_empty() {
            return Err(DomainError::EmptyPublicationSet);
        }

        listed.sort_by(|a, b| {
            b.publish_date
                .cmp(&a.publish_date)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        hidden.sort_by(|a, b| a.slug.cmp(&b.slug));

        let slugs: Vec<_> = listed.iter().map(|p| p.slug.clone()).collect();
        let posts: Vec<PublishedPost> = listed
            .into_iter()
            .enumerate()
            .map(|(i, post)| PublishedPost {
                post,
                previous: i.checked_sub(1).map(|j| slugs[j].clone()),
                next: slugs.get(i + 1).cloned(),
            })
            .collect();

        let mut categories = BTreeMap::new();
        let mut tags = BTreeMap::new();
        let mut archives = ArchiveIndex::new();
        for entry in &posts {
            let post = &entry.post;
            if let Some(category) = &post.category {
                categories
                    .entry(category.clone())
                    .or_insert_with(Vec::new)
                    .push(post.slug.clone());
            }
            for tag in &post.tags {
                tags.entry(tag.clone())
                    .or_insert_with(Vec::new)
                    .push(post.slug.clone());
            }
            let date = post.publish_date.as_naive();
            archives
                .entry(date.year())
                .or_default()
                .entry(date.month())
                .or_default()
                .push(post.slug.clone());
        }

        let pages = slugs
            .chunks(self.page_size)
            .enumerate()
            .map(|(i, chunk)| IndexPage {
                number: i + 1,
                slugs: chunk.to_vec(),
            })
            .collect();

        tracing::info!(
            posts = posts.len(),
            hidden = hidden.len(),
            categories = categories.len(),
            tags = tags.len(),
            "publication set built"
        );

        Ok(PublicationSet {
            site: self.site.clone(),
            posts,
            hidden,
            categories,
            tags,
            archives,
            pages,
        })
    }
}
