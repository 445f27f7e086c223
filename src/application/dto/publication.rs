use crate::domain::post::PostSlug;
use crate::domain::publication::{PublicationSet, RunReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::posts::{PostDto, ReferenceDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDto {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPageDto {
    pub number: usize,
    pub slugs: Vec<String>,
}

/// Wire form of a publication set, consumed by the site renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSetDto {
    pub site: SiteDto,
    pub posts: Vec<PostDto>,
    pub hidden: Vec<PostDto>,
    pub categories: BTreeMap<String, Vec<String>>,
    pub tags: BTreeMap<String, Vec<String>>,
    /// "YYYY" → "MM" → slugs.
    pub archives: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub pages: Vec<IndexPageDto>,
}

fn slug_strings(slugs: &[PostSlug]) -> Vec<String> {
    slugs.iter().map(|s| s.as_str().to_string()).collect()
}

impl From<&PublicationSet> for PublicationSetDto {
    fn from(set: &PublicationSet) -> Self {
        let posts = set
            .posts
            .iter()
            .map(|entry| {
                let mut dto = PostDto::from(&entry.post);
                dto.previous = entry.previous.as_ref().map(|s| s.as_str().to_string());
                dto.next = entry.next.as_ref().map(|s| s.as_str().to_string());
                dto
            })
            .collect();

        Self {
            site: SiteDto {
                name: set.site.name.clone(),
                url: set.site.url.clone(),
                author: set.site.author.clone(),
                timezone: set.site.timezone.clone(),
            },
            posts,
            hidden: set.hidden.iter().map(PostDto::from).collect(),
            categories: set
                .categories
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), slug_strings(v)))
                .collect(),
            tags: set
                .tags
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), slug_strings(v)))
                .collect(),
            archives: set
                .archives
                .iter()
                .map(|(year, months)| {
                    let months = months
                        .iter()
                        .map(|(month, slugs)| (format!("{month:02}"), slug_strings(slugs)))
                        .collect();
                    (format!("{year:04}"), months)
                })
                .collect(),
            pages: set
                .pages
                .iter()
                .map(|page| IndexPageDto {
                    number: page.number,
                    slugs: slug_strings(&page.slugs),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedUnitDto {
    pub origin: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReportDto {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub units_ingested: usize,
    pub units_dropped: usize,
    pub drafts_skipped: usize,
    pub duplicates_merged: usize,
    pub ambiguous_groups: usize,
    pub posts_published: usize,
    pub hidden_posts: usize,
    pub references_found: usize,
    pub external_references: usize,
    pub broken_references: usize,
    pub dropped: Vec<DroppedUnitDto>,
    pub broken: Vec<ReferenceDto>,
}

impl From<&RunReport> for RunReportDto {
    fn from(report: &RunReport) -> Self {
        Self {
            started_at: report.started_at,
            finished_at: report.finished_at,
            units_ingested: report.units_ingested,
            units_dropped: report.units_dropped,
            drafts_skipped: report.drafts_skipped,
            duplicates_merged: report.duplicates_merged,
            ambiguous_groups: report.ambiguous_groups,
            posts_published: report.posts_published,
            hidden_posts: report.hidden_posts,
            references_found: report.references_found,
            external_references: report.external_references,
            broken_references: report.broken_references,
            dropped: report
                .dropped
                .iter()
                .map(|d| DroppedUnitDto {
                    origin: d.origin.clone(),
                    reason: d.reason.clone(),
                })
                .collect(),
            broken: report.broken.iter().map(Into::into).collect(),
        }
    }
}
