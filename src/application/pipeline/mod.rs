// src/application/pipeline/mod.rs
pub mod builder;
pub mod canonicalizer;
pub mod linker;
pub mod parser;
mod service;

pub use builder::PublicationSetBuilder;
pub use canonicalizer::{CanonicalSet, Canonicalizer};
pub use linker::ReferenceLinker;
pub use parser::{ParsedBatch, parse_all, parse_document};
pub use service::{PipelineOptions, PipelineOutcome, PublishingService};
