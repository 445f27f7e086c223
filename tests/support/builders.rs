// tests/support/builders.rs
use std::sync::Arc;

use lyceum_press::application::pipeline::{PipelineOptions, PublishingService};
use lyceum_press::application::ports::content::ContentSource;
use lyceum_press::infrastructure::{content::InMemoryContentSource, util::DefaultSlugGenerator};

use super::mocks::fixed_clock;

/// Renders a content unit in the header-plus-body format.
pub struct PostTextBuilder {
    title: Option<String>,
    date: Option<String>,
    category: Option<String>,
    tags: Option<String>,
    summary: Option<String>,
    extra: Vec<(String, String)>,
    body: String,
}

impl PostTextBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            date: Some("2017-03-26 10:20".into()),
            category: None,
            tags: None,
            summary: None,
            extra: Vec::new(),
            body: "Body text.".into(),
        }
    }

    pub fn untitled() -> Self {
        let mut builder = Self::new("");
        builder.title = None;
        builder
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn without_date(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        let fields = [
            ("Title", self.title),
            ("Date", self.date),
            ("Category", self.category),
            ("Tags", self.tags),
            ("Summary", self.summary),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                out.push_str(&format!("{key}: {value}\n"));
            }
        }
        for (key, value) in self.extra {
            out.push_str(&format!("{key}: {value}\n"));
        }
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

pub fn memory_source(units: &[(&str, String)]) -> InMemoryContentSource {
    units
        .iter()
        .fold(InMemoryContentSource::new(), |source, (origin, text)| {
            source.with(*origin, text.clone())
        })
}

pub fn service_with(source: impl ContentSource + 'static, options: PipelineOptions) -> PublishingService {
    PublishingService::new(
        Arc::new(source),
        Arc::new(DefaultSlugGenerator),
        Arc::new(fixed_clock()),
        options,
    )
}

pub fn service(source: impl ContentSource + 'static) -> PublishingService {
    service_with(source, PipelineOptions::default())
}
