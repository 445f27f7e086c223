use crate::domain::post::Reference;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedUnit {
    pub origin: String,
    pub reason: String,
}

/// Counts reported by every successful run, even when units were dropped.
#[derive(Debug, Clone)]
pub struct RunReport {
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
    pub dropped: Vec<DroppedUnit>,
    pub broken: Vec<Reference>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            units_ingested: 0,
            units_dropped: 0,
            drafts_skipped: 0,
            duplicates_merged: 0,
            ambiguous_groups: 0,
            posts_published: 0,
            hidden_posts: 0,
            references_found: 0,
            external_references: 0,
            broken_references: 0,
            dropped: Vec::new(),
            broken: Vec::new(),
        }
    }
}
