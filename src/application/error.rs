// src/application/error.rs
use crate::domain::{errors::DomainError, publication::PipelineStage};
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),

    #[error("pipeline failed while {stage}: {source}")]
    StageFailed {
        stage: PipelineStage,
        #[source]
        source: Box<ApplicationError>,
    },
}

impl ApplicationError {
    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn stage_failed(stage: PipelineStage, source: ApplicationError) -> Self {
        Self::StageFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// Stage the run halted in, when this is a pipeline failure.
    pub fn failed_stage(&self) -> Option<PipelineStage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost cause, unwrapping stage failures.
    pub fn root_cause(&self) -> &ApplicationError {
        match self {
            Self::StageFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_empty_publication(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Domain(DomainError::EmptyPublicationSet)
        )
    }
}
