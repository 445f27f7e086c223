// src/application/pipeline/linker.rs
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::ports::util::SlugGenerator;
use crate::domain::post::{Post, PostSlug, Reference, SlugRegistry, normalize_title};

static INLINE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(!?)\[(?:[^\[\]]|\[[^\]]*\])*\]\(\s*(?:<([^>]+)>|((?:[^()\s]|\([^()\s]*\))+))(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#)
        .expect("valid inline link regex")
});
static AUTOLINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<((?:[a-zA-Z][a-zA-Z0-9+.\-]*://|mailto:)[^>\s]+)>").expect("valid autolink regex")
});
static REFERENCE_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ ]{0,3}\[[^\]^][^\]]*\]:[ \t]*<?([^\s>]+)>?"#).expect("valid reference definition regex")
});
static DISPLAY_MATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$.*?\$\$").expect("valid display math regex"));
static CODE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`\n]*`").expect("valid code span regex"));
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.\-]*://[^\s/?#]+\S*|mailto:\S+@\S+)$").expect("valid url regex")
});

const INTERNAL_PREFIXES: [&str; 4] = ["{filename}", "{link}", "{article}", "|filename|"];
const ASSET_PREFIXES: [&str; 3] = ["{static}", "{attach}", "|static|"];
const PAGE_EXTENSIONS: [&str; 4] = [".md", ".markdown", ".html", ".htm"];

/// Resolves link markers in canonical post bodies against the full set of
/// canonical posts. Unresolvable internal links become broken references;
/// nothing here fails the run.
pub struct ReferenceLinker<'a> {
    registry: &'a SlugRegistry,
    slugger: &'a dyn SlugGenerator,
    slugs: Vec<PostSlug>,
    titles: HashMap<String, PostSlug>,
    stems: HashMap<String, PostSlug>,
}

impl<'a> ReferenceLinker<'a> {
    pub fn new(posts: &[Post], registry: &'a SlugRegistry, slugger: &'a dyn SlugGenerator) -> Self {
        let mut titles = HashMap::new();
        let mut stems = HashMap::new();
        for post in posts {
            titles
                .entry(normalize_title(post.title.as_str()))
                .or_insert_with(|| post.slug.clone());
            for revision in &post.revision_history {
                if let Some(stem) = revision.source_id.stem() {
                    stems
                        .entry(stem.to_lowercase())
                        .or_insert_with(|| post.slug.clone());
                }
            }
        }
        Self {
            registry,
            slugger,
            slugs: posts.iter().map(|p| p.slug.clone()).collect(),
            titles,
            stems,
        }
    }

    pub fn link_all(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .map(|post| {
                let references = self.references_for(&post);
                post.with_references(references)
            })
            .collect()
    }

    pub fn references_for(&self, post: &Post) -> Vec<Reference> {
        let mut references: Vec<Reference> = Vec::new();
        for raw in extract_targets(post.body.as_str()) {
            let Some(reference) = self.classify(&post.slug, &raw) else {
                continue;
            };
            if reference.is_broken() {
                tracing::warn!(from = %post.slug, target = %raw, "broken internal reference");
            }
            let duplicate = references
                .iter()
                .any(|r| r.target == reference.target && r.status == reference.status);
            if !duplicate {
                references.push(reference);
            }
        }
        references
    }

    /// `None` for targets that are not references at all (assets, fragments).
    fn classify(&self, from: &PostSlug, raw: &str) -> Option<Reference> {
        let target = raw.trim();
        if target.is_empty() || target.starts_with('#') {
            return None;
        }
        let lowered = target.to_lowercase();
        if ASSET_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            return None;
        }
        if URL_RE.is_match(target) {
            return Some(Reference::external(from.clone(), target));
        }

        let resolved = reduce_internal(target).and_then(|candidate| self.resolve(candidate));
        Some(match resolved {
            Some(slug) => Reference::resolved(from.clone(), target, slug),
            None => Reference::broken(from.clone(), target),
        })
    }

    fn resolve(&self, candidate: &str) -> Option<PostSlug> {
        let by_slug = |slug: &str| self.registry.position(slug).and_then(|i| self.slugs.get(i).cloned());

        by_slug(candidate)
            .or_else(|| by_slug(&self.slugger.slugify(candidate)))
            .or_else(|| self.titles.get(&normalize_title(candidate)).cloned())
            .or_else(|| self.stems.get(&candidate.to_lowercase()).cloned())
    }
}

/// Strips site-relative prefixes, query, fragment, directories and page
/// extensions. `None` when nothing is left.
fn reduce_internal(target: &str) -> Option<&str> {
    let mut candidate = target;
    for prefix in INTERNAL_PREFIXES {
        if let Some(rest) = candidate.strip_prefix(prefix) {
            candidate = rest;
            break;
        }
    }
    let candidate = candidate
        .split(['?', '#'])
        .next()
        .unwrap_or("")
        .trim_end_matches('/');
    let mut candidate = candidate.rsplit('/').next().unwrap_or("");
    for extension in PAGE_EXTENSIONS {
        if let Some(stem) = candidate.strip_suffix(extension) {
            candidate = stem;
            break;
        }
    }
    let candidate = candidate.trim();
    (!candidate.is_empty()).then_some(candidate)
}

/// Link targets in order of appearance. Fenced code, display math and code
/// spans are opaque; images are not links.
fn extract_targets(body: &str) -> Vec<String> {
    let prose = strip_fenced_blocks(body);
    let prose = CODE_SPAN_RE.replace_all(&prose, " ");
    let prose = DISPLAY_MATH_RE.replace_all(&prose, " ");

    let mut found: Vec<(usize, String)> = Vec::new();
    for caps in INLINE_LINK_RE.captures_iter(&prose) {
        let is_image = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if is_image {
            continue;
        }
        if let Some(target) = caps.get(2).or_else(|| caps.get(3)) {
            found.push((target.start(), target.as_str().to_string()));
        }
    }
    for caps in AUTOLINK_RE.captures_iter(&prose) {
        if let Some(target) = caps.get(1) {
            found.push((target.start(), target.as_str().to_string()));
        }
    }
    for caps in REFERENCE_DEF_RE.captures_iter(&prose) {
        if let Some(target) = caps.get(1) {
            found.push((target.start(), target.as_str().to_string()));
        }
    }
    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, target)| target).collect()
}

fn strip_fenced_blocks(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;
    for line in body.lines() {
        let trimmed = line.trim_start();
        match fence {
            Some(marker) => {
                if trimmed.starts_with(marker) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") {
                    fence = Some("```");
                } else if trimmed.starts_with("~~~") {
                    fence = Some("~~~");
                } else {
                    out.push_str(line);
                }
            }
        }
        out.push('\n');
    }
    out
}
