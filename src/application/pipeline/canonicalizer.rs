// src/application/pipeline/canonicalizer.rs
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::util::SlugGenerator;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::{
    Category, IdentityKey, Post, PostSlug, RawUnit, SlugRegistry, SlugRequest,
};

/// Canonical posts in group order (first ingestion ordinal), with the slug
/// registry that indexes them.
#[derive(Debug)]
pub struct CanonicalSet {
    pub posts: Vec<Post>,
    pub registry: SlugRegistry,
    pub duplicates_merged: usize,
    pub ambiguous_groups: usize,
}

pub struct Canonicalizer<'a> {
    identity: &'a dyn IdentityKey,
    slugger: &'a dyn SlugGenerator,
    strict: bool,
    default_author: Option<&'a str>,
}

struct Group {
    key: String,
    revisions: Vec<Arc<RawUnit>>,
}

impl<'a> Canonicalizer<'a> {
    pub fn new(identity: &'a dyn IdentityKey, slugger: &'a dyn SlugGenerator) -> Self {
        Self {
            identity,
            slugger,
            strict: false,
            default_author: None,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn default_author(mut self, author: Option<&'a str>) -> Self {
        self.default_author = author;
        self
    }

    pub fn canonicalize(&self, units: &[Arc<RawUnit>]) -> DomainResult<CanonicalSet> {
        let groups = self.group(units);

        let mut ambiguous_groups = 0;
        for group in &groups {
            if let Some(categories) = conflicting_categories(&group.revisions) {
                if self.strict {
                    return Err(DomainError::AmbiguousIdentity {
                        key: group.key.clone(),
                        categories,
                    });
                }
                tracing::warn!(
                    key = %group.key,
                    categories = ?categories,
                    "revisions declare conflicting categories; merging anyway"
                );
                ambiguous_groups += 1;
            }
        }

        let selected: Vec<Arc<RawUnit>> = groups
            .iter()
            .filter_map(|g| select(&g.revisions).cloned())
            .collect();

        let (registry, slugs) = SlugRegistry::allocate(
            self.slugger,
            selected.iter().map(|unit| SlugRequest {
                explicit: unit.slug.as_ref(),
                title: &unit.title,
                ordinal: unit.ordinal(),
            }),
        )?;

        let posts: Vec<Post> = groups
            .into_iter()
            .zip(selected)
            .zip(slugs)
            .map(|((group, canonical), slug)| self.merge(group, canonical, slug))
            .collect();

        let duplicates_merged = units.len() - posts.len();
        if duplicates_merged > 0 {
            tracing::info!(duplicates_merged, "merged duplicate revisions");
        }

        Ok(CanonicalSet {
            posts,
            registry,
            duplicates_merged,
            ambiguous_groups,
        })
    }

    /// Groups keep the order of their first member; members are sorted by
    /// ingestion ordinal.
    fn group(&self, units: &[Arc<RawUnit>]) -> Vec<Group> {
        let mut ordered: Vec<&Arc<RawUnit>> = units.iter().collect();
        ordered.sort_by_key(|u| u.ordinal());

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();
        for unit in ordered {
            let key = self.identity.key(unit);
            match index.get(&key) {
                Some(&position) => groups[position].revisions.push(Arc::clone(unit)),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(Group {
                        key,
                        revisions: vec![Arc::clone(unit)],
                    });
                }
            }
        }
        groups
    }

    fn merge(&self, group: Group, canonical: Arc<RawUnit>, slug: PostSlug) -> Post {
        if group.revisions.len() > 1 {
            tracing::debug!(
                slug = %slug,
                revisions = group.revisions.len(),
                canonical = %canonical.source_id,
                "selected canonical revision"
            );
        }

        // Most recent other revisions first.
        let fallbacks = || {
            group
                .revisions
                .iter()
                .rev()
                .filter(|u| u.source_id != canonical.source_id)
        };

        let category = canonical
            .category
            .clone()
            .or_else(|| fallbacks().find_map(|u| u.category.clone()));
        let summary = canonical
            .summary
            .clone()
            .or_else(|| fallbacks().find_map(|u| u.summary.clone()));
        let modified = canonical
            .modified
            .or_else(|| fallbacks().find_map(|u| u.modified));
        let tags = if canonical.tags.is_empty() {
            fallbacks()
                .find(|u| !u.tags.is_empty())
                .map(|u| u.tags.clone())
                .unwrap_or_default()
        } else {
            canonical.tags.clone()
        };
        let mut authors = if canonical.authors.is_empty() {
            fallbacks()
                .find(|u| !u.authors.is_empty())
                .map(|u| u.authors.clone())
                .unwrap_or_default()
        } else {
            canonical.authors.clone()
        };
        if authors.is_empty() {
            authors.extend(self.default_author.map(str::to_string));
        }

        Post {
            slug,
            title: canonical.title.clone(),
            publish_date: canonical.publish_date,
            modified,
            category,
            tags,
            authors,
            summary,
            status: canonical.status,
            body: canonical.body.clone(),
            identity_key: group.key,
            canonical_source: canonical.source_id.clone(),
            revision_history: group.revisions,
            references: Vec::new(),
        }
    }
}

/// Longest body wins; equal lengths go to the latest ingestion ordinal.
fn select(revisions: &[Arc<RawUnit>]) -> Option<&Arc<RawUnit>> {
    revisions
        .iter()
        .max_by_key(|u| (u.body.char_len(), u.ordinal()))
}

/// Distinct declared categories when at least two disagree.
fn conflicting_categories(revisions: &[Arc<RawUnit>]) -> Option<Vec<String>> {
    let mut distinct: Vec<&Category> = Vec::new();
    for category in revisions.iter().filter_map(|u| u.category.as_ref()) {
        if !distinct.iter().any(|seen| seen.same_as(category)) {
            distinct.push(category);
        }
    }
    (distinct.len() > 1).then(|| distinct.iter().map(|c| c.as_str().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::identity::{LeadParagraphDigestKey, NormalizedTitleKey};
    use crate::domain::post::{PostBody, PostStatus, PostTitle, PublishDate, SourceId, Tag};
    use std::collections::BTreeMap;

    struct Dashes;

    impl SlugGenerator for Dashes {
        fn slugify(&self, input: &str) -> String {
            crate::domain::post::normalize_title(input).replace(' ', "-")
        }
    }

    fn unit(ordinal: u64, title: &str, body: &str) -> RawUnit {
        RawUnit {
            source_id: SourceId::new(ordinal, format!("blog/{ordinal}.md")),
            title: PostTitle::new(title).unwrap(),
            publish_date: PublishDate::parse("2019-05-01").unwrap(),
            modified: None,
            category: None,
            tags: vec![],
            authors: vec![],
            summary: None,
            slug: None,
            status: PostStatus::Published,
            body: PostBody::new(body),
            metadata: BTreeMap::new(),
        }
    }

    fn arcs(units: Vec<RawUnit>) -> Vec<Arc<RawUnit>> {
        units.into_iter().map(Arc::new).collect()
    }

    #[test]
    fn duplicates_collapse_into_one_post_with_full_history() {
        let units = arcs(vec![
            unit(0, "Parsing ITCH Messages in C++", "short draft"),
            unit(1, "Other Post", "x"),
            unit(2, "parsing itch messages in c++!", "a much longer final body"),
        ]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .canonicalize(&units)
            .unwrap();

        assert_eq!(set.posts.len(), 2);
        assert_eq!(set.duplicates_merged, 1);
        let itch = &set.posts[0];
        assert_eq!(itch.revision_count(), 2);
        assert_eq!(itch.canonical_source.ordinal(), 2);
        assert_eq!(itch.body.as_str(), "a much longer final body");
        let history: Vec<_> = itch.revision_history.iter().map(|u| u.ordinal()).collect();
        assert_eq!(history, vec![0, 2]);
        assert_eq!(itch.slug.as_str(), "parsing-itch-messages-in-c");
    }

    #[test]
    fn equal_lengths_prefer_latest_ingestion() {
        let units = arcs(vec![
            unit(3, "Same", "bbbb"),
            unit(1, "Same", "aaaa"),
            unit(2, "Same", "cccc"),
        ]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .canonicalize(&units)
            .unwrap();
        let post = &set.posts[0];
        assert_eq!(post.canonical_source.ordinal(), 3);
        let history: Vec<_> = post.revision_history.iter().map(|u| u.ordinal()).collect();
        assert_eq!(history, vec![1, 2, 3]);
    }

    fn with_category(mut u: RawUnit, category: &str) -> RawUnit {
        u.category = Some(Category::new(category).unwrap());
        u
    }

    #[test]
    fn conflicting_categories_merge_by_default() {
        let units = arcs(vec![
            with_category(unit(0, "Notes", "one"), "Finance"),
            with_category(unit(1, "Notes", "two!"), "Programming"),
        ]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .canonicalize(&units)
            .unwrap();
        assert_eq!(set.posts.len(), 1);
        assert_eq!(set.ambiguous_groups, 1);
        assert_eq!(set.posts[0].category.as_ref().unwrap().as_str(), "Programming");
    }

    #[test]
    fn conflicting_categories_fail_in_strict_mode() {
        let units = arcs(vec![
            with_category(unit(0, "Notes", "one"), "Finance"),
            with_category(unit(1, "Notes", "two"), "Programming"),
        ]);
        let err = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .strict(true)
            .canonicalize(&units)
            .unwrap_err();
        match err {
            DomainError::AmbiguousIdentity { key, categories } => {
                assert_eq!(key, "notes");
                assert_eq!(categories, vec!["Finance".to_string(), "Programming".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn same_category_in_different_case_is_not_a_conflict() {
        let units = arcs(vec![
            with_category(unit(0, "Notes", "one"), "Finance"),
            with_category(unit(1, "Notes", "two"), "finance"),
            unit(2, "Notes", "three"),
        ]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .strict(true)
            .canonicalize(&units)
            .unwrap();
        assert_eq!(set.ambiguous_groups, 0);
    }

    #[test]
    fn missing_optional_fields_are_filled_from_other_revisions() {
        let mut older = with_category(unit(0, "Vol Surface", "old"), "Finance");
        older.tags = vec![Tag::new("volatility").unwrap()];
        older.summary = Some("older summary".into());
        let newer = unit(1, "Vol Surface", "the longer canonical body");
        let units = arcs(vec![older, newer]);

        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .default_author(Some("Site Author"))
            .canonicalize(&units)
            .unwrap();
        let post = &set.posts[0];
        assert_eq!(post.category.as_ref().unwrap().as_str(), "Finance");
        assert_eq!(post.tags[0].as_str(), "volatility");
        assert_eq!(post.summary.as_deref(), Some("older summary"));
        assert_eq!(post.authors, vec!["Site Author".to_string()]);
    }

    #[test]
    fn distinct_titles_with_equal_slugs_get_unique_slugs() {
        let mut explicit = unit(1, "Second", "b");
        explicit.slug = Some(PostSlug::new("first").unwrap());
        let units = arcs(vec![unit(0, "First", "a"), explicit]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .canonicalize(&units)
            .unwrap();
        let slugs: Vec<_> = set.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "first-1"]);
        assert_eq!(set.registry.position("first-1"), Some(1));
    }

    #[test]
    fn empty_slug_uses_the_canonical_revision_ordinal() {
        let units = arcs(vec![
            unit(4, "???", "short"),
            unit(9, "???", "the longer body wins"),
        ]);
        let set = Canonicalizer::new(&NormalizedTitleKey, &Dashes)
            .canonicalize(&units)
            .unwrap();
        assert_eq!(set.posts.len(), 1);
        assert_eq!(set.posts[0].canonical_source.ordinal(), 9);
        assert_eq!(set.posts[0].slug.as_str(), "post-9");
    }

    #[test]
    fn lead_paragraph_strategy_groups_retitled_revisions() {
        let units = arcs(vec![
            unit(0, "Binding C++ with Cython", "Cython wraps C++ classes.\n\nPart one."),
            unit(1, "Wrapping C++ in Cython", "Cython wraps C++ classes.\n\nPart one, revised."),
        ]);
        let set = Canonicalizer::new(&LeadParagraphDigestKey, &Dashes)
            .canonicalize(&units)
            .unwrap();
        assert_eq!(set.posts.len(), 1);
        assert_eq!(set.posts[0].title.as_str(), "Wrapping C++ in Cython");
    }
}
