// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("malformed header in {origin}: {reason}")]
    MalformedHeader { origin: String, reason: String },
    #[error("ambiguous identity '{key}': conflicting categories {categories:?}")]
    AmbiguousIdentity { key: String, categories: Vec<String> },
    #[error("publication set is empty: no canonical posts remain")]
    EmptyPublicationSet,
}

impl DomainError {
    pub fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}
