// src/domain/post/services/mod.rs
use std::collections::BTreeMap;

use crate::application::ports::util::SlugGenerator;
use crate::domain::errors::DomainResult;
use crate::domain::post::value_objects::{PostSlug, PostTitle};

/// What a canonical group asks the registry for.
pub struct SlugRequest<'a> {
    pub explicit: Option<&'a PostSlug>,
    pub title: &'a PostTitle,
    pub ordinal: u64,
}

/// Slug → post position map, built once per run and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SlugRegistry {
    by_slug: BTreeMap<PostSlug, usize>,
}

impl SlugRegistry {
    /// Allocates one unique slug per request, in request order. The n-th
    /// returned slug belongs to the n-th request and maps to position n.
    pub fn allocate<'a>(
        generator: &dyn SlugGenerator,
        requests: impl IntoIterator<Item = SlugRequest<'a>>,
    ) -> DomainResult<(Self, Vec<PostSlug>)> {
        let mut by_slug = BTreeMap::new();
        let mut slugs = Vec::new();

        for (position, request) in requests.into_iter().enumerate() {
            let base = match request.explicit {
                Some(slug) => slug.as_str().to_string(),
                None => generator.slugify(request.title.as_str()),
            };
            let base_slug = if base.is_empty() {
                format!("post-{}", request.ordinal)
            } else {
                base
            };

            let mut candidate = PostSlug::new(base_slug.clone())?;
            let mut counter = 1u64;
            while by_slug.contains_key(&candidate) {
                candidate = PostSlug::new(format!("{base_slug}-{counter}"))?;
                counter += 1;
            }
            if candidate.as_str() != base_slug {
                tracing::warn!(
                    base = %base_slug,
                    slug = %candidate,
                    title = %request.title,
                    "slug collision between distinct posts; suffix appended"
                );
            }

            by_slug.insert(candidate.clone(), position);
            slugs.push(candidate);
        }

        Ok((Self { by_slug }, slugs))
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        let slug = PostSlug::new(slug).ok()?;
        self.by_slug.get(&slug).copied()
    }
}
