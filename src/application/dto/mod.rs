pub mod posts;
pub mod publication;

pub use posts::{PostDto, ReferenceDto, RevisionDto};
pub use publication::{
    DroppedUnitDto, IndexPageDto, PublicationSetDto, RunReportDto, SiteDto,
};
