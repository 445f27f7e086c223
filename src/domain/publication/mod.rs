pub mod entity;
pub mod report;
pub mod stage;

pub use entity::{ArchiveIndex, IndexPage, PublicationSet, PublishedPost, SiteMetadata};
pub use report::{DroppedUnit, RunReport};
pub use stage::{PipelineStage, PipelineState};
