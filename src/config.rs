// src/config.rs
use std::{env, path::PathBuf};
use thiserror::Error;

use crate::application::pipeline::PipelineOptions;
use crate::domain::post::IdentityStrategy;
use crate::domain::publication::SiteMetadata;

#[derive(Clone, Debug)]
pub struct AppConfig {
    content_dir: PathBuf,
    output_path: PathBuf,
    content_extensions: Vec<String>,
    site_name: String,
    site_url: String,
    site_author: Option<String>,
    site_timezone: String,
    default_pagination: usize,
    identity: IdentityStrategy,
    strict_identity: bool,
    include_drafts: bool,
    parse_parallel: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content/blog")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/publication.json")
}

fn default_content_extensions() -> Vec<String> {
    vec!["md".into(), "markdown".into()]
}

fn default_site_name() -> String {
    "Lost in the Lyceum".into()
}

fn default_timezone() -> String {
    "America/New_York".into()
}

fn default_pagination() -> usize {
    10
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates the rest.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let content_dir = var("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_content_dir);
        let output_path = var("OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_output_path);

        let content_extensions = var("CONTENT_EXTENSIONS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().trim_start_matches('.').to_string())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(default_content_extensions);
        if content_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "CONTENT_EXTENSIONS must name at least one extension".into(),
            ));
        }

        let site_name = var("SITE_NAME").unwrap_or_else(default_site_name);
        let site_url = var("SITE_URL").unwrap_or_default();
        let site_author = var("SITE_AUTHOR");
        let site_timezone = var("SITE_TIMEZONE").unwrap_or_else(default_timezone);

        let default_pagination = match var("DEFAULT_PAGINATION") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "DEFAULT_PAGINATION must be a positive integer, got '{raw}'"
                    ))
                })?,
            None => default_pagination(),
        };

        let identity = match var("IDENTITY_KEY") {
            Some(raw) => raw
                .parse::<IdentityStrategy>()
                .map_err(|e| ConfigError::Invalid(format!("IDENTITY_KEY: {e}")))?,
            None => IdentityStrategy::default(),
        };

        let strict_identity = var("STRICT_IDENTITY").map(|v| parse_flag(&v)).unwrap_or(false);
        let include_drafts = var("INCLUDE_DRAFTS").map(|v| parse_flag(&v)).unwrap_or(false);
        let parse_parallel = var("PARSE_PARALLEL").map(|v| parse_flag(&v)).unwrap_or(true);

        Ok(Self {
            content_dir,
            output_path,
            content_extensions,
            site_name,
            site_url,
            site_author,
            site_timezone,
            default_pagination,
            identity,
            strict_identity,
            include_drafts,
            parse_parallel,
        })
    }

    pub fn content_dir(&self) -> &PathBuf {
        &self.content_dir
    }

    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }

    pub fn content_extensions(&self) -> &[String] {
        &self.content_extensions
    }

    pub fn site(&self) -> SiteMetadata {
        SiteMetadata {
            name: self.site_name.clone(),
            url: self.site_url.clone(),
            author: self.site_author.clone(),
            timezone: self.site_timezone.clone(),
        }
    }

    pub fn default_pagination(&self) -> usize {
        self.default_pagination
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            identity: self.identity,
            strict_identity: self.strict_identity,
            include_drafts: self.include_drafts,
            parallel_parse: self.parse_parallel,
            page_size: self.default_pagination,
            site: self.site(),
        }
    }
}
