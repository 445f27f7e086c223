// src/application/pipeline/parser.rs
//! Front-matter parsing. The header is a leading block of `Key: value` lines
//! closed by the first blank line; the body after it is passed through
//! verbatim.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::{
    Category, PostBody, PostSlug, PostStatus, PostTitle, PublishDate, RawUnit, SourceDocument,
    Tag,
};
use crate::domain::publication::DroppedUnit;

const BOM: char = '\u{feff}';

/// Result of parsing a whole batch. Units keep input order.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub units: Vec<Arc<RawUnit>>,
    pub dropped: Vec<DroppedUnit>,
    pub drafts_skipped: usize,
}

pub fn parse_all(documents: &[SourceDocument], parallel: bool, include_drafts: bool) -> ParsedBatch {
    let results: Vec<DomainResult<RawUnit>> = if parallel {
        documents.par_iter().map(parse_document).collect()
    } else {
        documents.iter().map(parse_document).collect()
    };

    let mut batch = ParsedBatch::default();
    for (document, result) in documents.iter().zip(results) {
        match result {
            Ok(unit) if unit.status == PostStatus::Draft && !include_drafts => {
                tracing::info!(origin = %unit.origin(), title = %unit.title, "skipping draft");
                batch.drafts_skipped += 1;
            }
            Ok(unit) => batch.units.push(Arc::new(unit)),
            Err(err) => {
                tracing::warn!(origin = %document.source_id.origin(), error = %err, "dropping unit");
                let reason = match err {
                    DomainError::MalformedHeader { reason, .. } => reason,
                    other => other.to_string(),
                };
                batch.dropped.push(DroppedUnit {
                    origin: document.source_id.origin().to_string(),
                    reason,
                });
            }
        }
    }
    batch
}

pub fn parse_document(document: &SourceDocument) -> DomainResult<RawUnit> {
    let origin = document.source_id.origin();
    let (header, body) = split_header(&document.text);
    let mut fields = collect_fields(header);

    let malformed = |reason: String| DomainError::malformed(origin, reason);

    let title = fields
        .remove("title")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| malformed("missing required field 'Title'".into()))?;
    let title = PostTitle::new(title).map_err(|e| malformed(e.to_string()))?;

    let date = fields
        .remove("date")
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| malformed("missing required field 'Date'".into()))?;
    let publish_date = PublishDate::parse(&date).map_err(|e| malformed(e.to_string()))?;

    let modified = fields
        .remove("modified")
        .filter(|v| !v.trim().is_empty())
        .map(|v| PublishDate::parse(&v))
        .transpose()
        .map_err(|e| malformed(format!("Modified: {e}")))?;

    let category = fields
        .remove("category")
        .and_then(|v| Category::new(v).ok());

    let tags = fields
        .remove("tags")
        .map(|v| split_list(&v).filter_map(|t| Tag::new(t).ok()).collect::<Vec<_>>())
        .map(dedupe)
        .unwrap_or_default();

    let mut authors = Vec::new();
    for key in ["author", "authors"] {
        if let Some(value) = fields.remove(key) {
            authors.extend(split_list(&value).map(str::to_string));
        }
    }
    let authors = dedupe(authors);

    let summary = fields
        .remove("summary")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let slug = fields
        .remove("slug")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PostSlug::new)
        .transpose()
        .map_err(|e| malformed(format!("Slug: {e}")))?;

    let status = fields
        .remove("status")
        .map(|v| v.parse::<PostStatus>())
        .transpose()
        .map_err(|e| malformed(format!("Status: {e}")))?
        .unwrap_or_default();

    Ok(RawUnit {
        source_id: document.source_id.clone(),
        title,
        publish_date,
        modified,
        category,
        tags,
        authors,
        summary,
        slug,
        status,
        body: PostBody::new(body),
        metadata: fields,
    })
}

/// Splits `text` into (header, body). A document that does not open with a
/// header line has an empty header.
fn split_header(text: &str) -> (&str, &str) {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut offset = 0;
    let mut header_start = None;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        match header_start {
            None if content.trim().is_empty() => {}
            None => {
                if parse_field_line(content).is_none() {
                    return ("", &text[offset..]);
                }
                header_start = Some(offset);
            }
            Some(start) => {
                if content.trim().is_empty() {
                    return (&text[start..offset], &text[offset + line.len()..]);
                }
                let continuation = content.starts_with([' ', '\t']);
                if !continuation && parse_field_line(content).is_none() {
                    return (&text[start..offset], &text[offset..]);
                }
            }
        }
        offset += line.len();
    }

    match header_start {
        Some(start) => (&text[start..], ""),
        None => ("", ""),
    }
}

/// Lower-cased keys; indented lines continue the previous value. The first
/// occurrence of a repeated key wins.
fn collect_fields(header: &str) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in header.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some(value) = current.as_ref().and_then(|key| fields.get_mut(key)) {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
            }
            continue;
        }
        let Some((key, value)) = parse_field_line(line) else {
            current = None;
            continue;
        };
        let key = key.to_lowercase();
        if fields.contains_key(&key) {
            tracing::debug!(key = %key, "repeated header field ignored");
            current = None;
            continue;
        }
        fields.insert(key.clone(), value.trim().to_string());
        current = Some(key);
    }
    fields
}

fn parse_field_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then_some((key, value))
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn dedupe<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::SourceId;

    fn doc(ordinal: u64, text: &str) -> SourceDocument {
        SourceDocument::new(SourceId::new(ordinal, format!("blog/{ordinal}.md")), text)
    }

    const HESTON: &str = "Title: Heston Model Simulation\n\
Date: 2017-03-26 10:20\n\
Category: Finance\n\
Tags: heston, monte carlo, heston\n\
Summary: Simulating the Heston model\n\
\n\
The variance follows $$dv_t = \\kappa(\\theta - v_t)dt$$\n\
\n\
```python\nimport numpy as np\n```\n";

    #[test]
    fn parses_header_fields_and_keeps_body_verbatim() {
        let unit = parse_document(&doc(0, HESTON)).unwrap();
        assert_eq!(unit.title.as_str(), "Heston Model Simulation");
        assert_eq!(unit.publish_date.to_string(), "2017-03-26 10:20");
        assert_eq!(unit.category.as_ref().unwrap().as_str(), "Finance");
        let tags: Vec<_> = unit.tags.iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["heston", "monte carlo"]);
        assert_eq!(unit.summary.as_deref(), Some("Simulating the Heston model"));
        assert!(unit.body.as_str().starts_with("The variance follows $$dv_t"));
        assert!(unit.body.as_str().ends_with("```python\nimport numpy as np\n```\n"));
        assert_eq!(unit.status, PostStatus::Published);
    }

    #[test]
    fn missing_date_is_malformed() {
        let err = parse_document(&doc(1, "Title: No Date\n\nbody")).unwrap_err();
        match err {
            DomainError::MalformedHeader { origin, reason } => {
                assert_eq!(origin, "blog/1.md");
                assert!(reason.contains("Date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_title_is_malformed() {
        assert!(matches!(
            parse_document(&doc(2, "Date: 2017-01-01\n\nbody")),
            Err(DomainError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn unparseable_date_is_malformed() {
        assert!(matches!(
            parse_document(&doc(3, "Title: T\nDate: yesterday\n\nbody")),
            Err(DomainError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn document_without_header_is_malformed() {
        assert!(parse_document(&doc(4, "Just some prose.\n\nMore prose.")).is_err());
    }

    #[test]
    fn keys_are_case_insensitive_and_continuations_join() {
        let text = "\u{feff}\ntitle: Local Volatility\nDATE: 2016-11-05\nsummary: Dupire's\n  formula\nSeries: vol\n\nBody";
        let unit = parse_document(&doc(5, text)).unwrap();
        assert_eq!(unit.title.as_str(), "Local Volatility");
        assert_eq!(unit.summary.as_deref(), Some("Dupire's formula"));
        assert_eq!(unit.metadata.get("series").map(String::as_str), Some("vol"));
        assert_eq!(unit.body.as_str(), "Body");
    }

    #[test]
    fn header_ends_at_first_non_field_line() {
        let text = "Title: T\nDate: 2016-11-05\nThis line is prose.\n";
        let unit = parse_document(&doc(6, text)).unwrap();
        assert_eq!(unit.body.as_str(), "This line is prose.\n");
    }

    #[test]
    fn supplemental_fields_are_parsed() {
        let text = "Title: T\nDate: 2016-11-05\nModified: 2016-12-01 08:00\nSlug: custom-slug\nAuthors: Ada, Grace\nStatus: hidden\n\nbody";
        let unit = parse_document(&doc(7, text)).unwrap();
        assert_eq!(unit.slug.as_ref().unwrap().as_str(), "custom-slug");
        assert_eq!(unit.authors, vec!["Ada".to_string(), "Grace".to_string()]);
        assert_eq!(unit.status, PostStatus::Hidden);
        assert!(unit.modified.unwrap() > unit.publish_date);
    }

    #[test]
    fn unknown_status_is_malformed() {
        let text = "Title: T\nDate: 2016-11-05\nStatus: pending\n\nbody";
        assert!(parse_document(&doc(8, text)).is_err());
    }

    #[test]
    fn batch_drops_malformed_and_skips_drafts_in_order() {
        let docs = vec![
            doc(0, HESTON),
            doc(1, "Title: Missing date\n\nbody"),
            doc(2, "Title: Draft\nDate: 2017-01-01\nStatus: draft\n\nbody"),
            doc(3, "Title: Other\nDate: 2017-01-02\n\nbody"),
        ];
        for parallel in [false, true] {
            let batch = parse_all(&docs, parallel, false);
            let origins: Vec<_> = batch.units.iter().map(|u| u.origin().to_string()).collect();
            assert_eq!(origins, vec!["blog/0.md", "blog/3.md"]);
            assert_eq!(batch.dropped.len(), 1);
            assert_eq!(batch.dropped[0].origin, "blog/1.md");
            assert_eq!(batch.drafts_skipped, 1);
        }

        let with_drafts = parse_all(&docs, false, true);
        assert_eq!(with_drafts.units.len(), 3);
        assert_eq!(with_drafts.drafts_skipped, 0);
    }
}
