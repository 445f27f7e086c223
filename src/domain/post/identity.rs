use crate::domain::post::raw_unit::RawUnit;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Derives the identity under which revisions of the same logical post are
/// grouped.
pub trait IdentityKey: Send + Sync {
    fn key(&self, unit: &RawUnit) -> String;
}

/// Lower-cases, strips punctuation and collapses whitespace.
pub fn normalize_title(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizedTitleKey;

impl IdentityKey for NormalizedTitleKey {
    fn key(&self, unit: &RawUnit) -> String {
        normalize_title(unit.title.as_str())
    }
}

/// Groups units whose first body paragraph is the same after normalization.
/// Falls back to the normalized title when the body is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeadParagraphDigestKey;

impl IdentityKey for LeadParagraphDigestKey {
    fn key(&self, unit: &RawUnit) -> String {
        let lead = normalize_title(unit.body.lead_paragraph());
        if lead.is_empty() {
            return normalize_title(unit.title.as_str());
        }
        blake3::hash(lead.as_bytes()).to_hex().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityStrategy {
    #[default]
    NormalizedTitle,
    LeadParagraphDigest,
}

impl IdentityStrategy {
    pub fn key_fn(self) -> Box<dyn IdentityKey> {
        match self {
            IdentityStrategy::NormalizedTitle => Box::new(NormalizedTitleKey),
            IdentityStrategy::LeadParagraphDigest => Box::new(LeadParagraphDigestKey),
        }
    }
}

impl FromStr for IdentityStrategy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "title" | "normalized-title" => Ok(IdentityStrategy::NormalizedTitle),
            "lead-paragraph" | "lead-paragraph-digest" => {
                Ok(IdentityStrategy::LeadParagraphDigest)
            }
            other => Err(DomainError::Validation(format!(
                "unknown identity strategy '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_strips_punctuation_and_case() {
        assert_eq!(
            normalize_title("  Parsing ITCH   Messages in C++! "),
            "parsing itch messages in c"
        );
        assert_eq!(
            normalize_title("Heston Model: Simulation"),
            normalize_title("heston model simulation")
        );
    }

    #[test]
    fn normalize_title_of_only_punctuation_is_empty() {
        assert_eq!(normalize_title("?!..."), "");
    }

    #[test]
    fn strategy_parses_from_config_values() {
        assert_eq!(
            "title".parse::<IdentityStrategy>().unwrap(),
            IdentityStrategy::NormalizedTitle
        );
        assert_eq!(
            "Lead-Paragraph".parse::<IdentityStrategy>().unwrap(),
            IdentityStrategy::LeadParagraphDigest
        );
        assert!("fuzzy".parse::<IdentityStrategy>().is_err());
    }
}
