// src/application/pipeline/service.rs
use std::sync::Arc;

use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{ClockPort, ContentSourcePort, SlugGeneratorPort},
};
use crate::domain::post::{IdentityStrategy, ReferenceStatus, SourceDocument};
use crate::domain::publication::{PipelineStage, PipelineState, PublicationSet, RunReport, SiteMetadata};

use super::{
    builder::PublicationSetBuilder, canonicalizer::Canonicalizer, linker::ReferenceLinker,
    parser::parse_all,
};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub identity: IdentityStrategy,
    pub strict_identity: bool,
    pub include_drafts: bool,
    pub parallel_parse: bool,
    pub page_size: usize,
    pub site: SiteMetadata,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            identity: IdentityStrategy::NormalizedTitle,
            strict_identity: false,
            include_drafts: false,
            parallel_parse: true,
            page_size: 10,
            site: SiteMetadata::default(),
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub publication: PublicationSet,
    pub report: RunReport,
    pub state: PipelineState,
}

pub struct PublishingService {
    source: Arc<ContentSourcePort>,
    slugger: Arc<SlugGeneratorPort>,
    clock: Arc<ClockPort>,
    options: PipelineOptions,
}

/// Tracks the state machine of one run.
struct Run {
    state: PipelineState,
    report: RunReport,
}

impl Run {
    fn stage(&self) -> PipelineStage {
        self.state.stage().unwrap_or(PipelineStage::Building)
    }

    fn advance(&mut self) -> ApplicationResult<()> {
        let current = std::mem::replace(&mut self.state, PipelineState::Published);
        self.state = current.advance()?;
        tracing::debug!(state = ?self.state, "pipeline advanced");
        Ok(())
    }

    fn halt(&mut self, cause: ApplicationError) -> ApplicationError {
        let stage = self.stage();
        let current = std::mem::replace(&mut self.state, PipelineState::Published);
        self.state = current.fail(cause.to_string());
        tracing::error!(stage = %stage, error = %cause, "pipeline failed");
        ApplicationError::stage_failed(stage, cause)
    }
}

impl PublishingService {
    pub fn new(
        source: Arc<ContentSourcePort>,
        slugger: Arc<SlugGeneratorPort>,
        clock: Arc<ClockPort>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            slugger,
            clock,
            options,
        }
    }

    /// Ingests from the content source and runs every stage once.
    pub async fn run(&self) -> ApplicationResult<PipelineOutcome> {
        let mut run = Run {
            state: PipelineState::start(),
            report: RunReport::new(self.clock.now()),
        };

        let documents = match self.source.load().await {
            Ok(documents) => documents,
            Err(err) => return Err(run.halt(err)),
        };
        tracing::info!(units = documents.len(), "content ingested");
        run.advance()?;

        self.process(run, documents)
    }

    /// Runs the stages after ingestion on an already-collected batch.
    pub fn run_documents(&self, documents: Vec<SourceDocument>) -> ApplicationResult<PipelineOutcome> {
        let mut run = Run {
            state: PipelineState::start(),
            report: RunReport::new(self.clock.now()),
        };
        run.advance()?;
        self.process(run, documents)
    }

    fn process(&self, mut run: Run, documents: Vec<SourceDocument>) -> ApplicationResult<PipelineOutcome> {
        let options = &self.options;
        run.report.units_ingested = documents.len();

        // Parsing: per-unit failures are isolated.
        let batch = parse_all(&documents, options.parallel_parse, options.include_drafts);
        run.report.units_dropped = batch.dropped.len();
        run.report.drafts_skipped = batch.drafts_skipped;
        run.report.dropped = batch.dropped;
        run.advance()?;

        // Canonicalizing: first barrier, needs every parsed unit.
        let identity = options.identity.key_fn();
        let canonical = match Canonicalizer::new(identity.as_ref(), self.slugger.as_ref())
            .strict(options.strict_identity)
            .default_author(options.site.author.as_deref())
            .canonicalize(&batch.units)
        {
            Ok(canonical) => canonical,
            Err(err) => return Err(run.halt(err.into())),
        };
        run.report.duplicates_merged = canonical.duplicates_merged;
        run.report.ambiguous_groups = canonical.ambiguous_groups;
        run.advance()?;

        // Linking: second barrier, needs the full canonical set.
        let linker = ReferenceLinker::new(&canonical.posts, &canonical.registry, self.slugger.as_ref());
        let posts = linker.link_all(canonical.posts);
        for reference in posts.iter().flat_map(|p| p.references.iter()) {
            run.report.references_found += 1;
            match reference.status {
                ReferenceStatus::Broken => {
                    run.report.broken_references += 1;
                    run.report.broken.push(reference.clone());
                }
                ReferenceStatus::ExternalUnchecked => run.report.external_references += 1,
                ReferenceStatus::Resolved => {}
            }
        }
        run.advance()?;

        // Building
        let builder = PublicationSetBuilder::new(options.site.clone(), options.page_size);
        let publication = match builder.build(posts) {
            Ok(publication) => publication,
            Err(err) => return Err(run.halt(err.into())),
        };
        run.report.posts_published = publication.len();
        run.report.hidden_posts = publication.hidden.len();
        run.advance()?;

        run.report.finished_at = self.clock.now();
        let report = run.report;
        tracing::info!(
            units_ingested = report.units_ingested,
            units_dropped = report.units_dropped,
            drafts_skipped = report.drafts_skipped,
            duplicates_merged = report.duplicates_merged,
            posts_published = report.posts_published,
            broken_references = report.broken_references,
            "publication run complete"
        );

        Ok(PipelineOutcome {
            publication,
            report,
            state: run.state,
        })
    }
}
