use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

/// Non-terminal pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Ingesting,
    Parsing,
    Canonicalizing,
    Linking,
    Building,
}

impl PipelineStage {
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineStage::Ingesting => Some(PipelineStage::Parsing),
            PipelineStage::Parsing => Some(PipelineStage::Canonicalizing),
            PipelineStage::Canonicalizing => Some(PipelineStage::Linking),
            PipelineStage::Linking => Some(PipelineStage::Building),
            PipelineStage::Building => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Ingesting => "ingesting",
            PipelineStage::Parsing => "parsing",
            PipelineStage::Canonicalizing => "canonicalizing",
            PipelineStage::Linking => "linking",
            PipelineStage::Building => "building",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Running(PipelineStage),
    Published,
    Failed { stage: PipelineStage, cause: String },
}

impl PipelineState {
    pub fn start() -> Self {
        PipelineState::Running(PipelineStage::Ingesting)
    }

    /// Moves to the following stage; leaving `Building` publishes.
    pub fn advance(self) -> DomainResult<Self> {
        match self {
            PipelineState::Running(stage) => Ok(stage
                .next()
                .map(PipelineState::Running)
                .unwrap_or(PipelineState::Published)),
            terminal => Err(DomainError::Validation(format!(
                "cannot advance a terminal pipeline state ({terminal:?})"
            ))),
        }
    }

    /// Terminal states are left untouched.
    pub fn fail(self, cause: impl Into<String>) -> Self {
        match self {
            PipelineState::Running(stage) => PipelineState::Failed {
                stage,
                cause: cause.into(),
            },
            terminal => terminal,
        }
    }

    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineState::Running(stage) => Some(*stage),
            PipelineState::Failed { stage, .. } => Some(*stage),
            PipelineState::Published => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineState::Running(_))
    }
}
