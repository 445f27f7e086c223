pub mod entity;
pub mod identity;
pub mod raw_unit;
pub mod reference;
pub mod services;
pub mod value_objects;

pub use entity::Post;
pub use identity::{IdentityKey, IdentityStrategy, normalize_title};
pub use raw_unit::{RawUnit, SourceDocument};
pub use reference::{Reference, ReferenceStatus, ReferenceTarget};
pub use services::{SlugRegistry, SlugRequest};
pub use value_objects::{
    Category, PostBody, PostSlug, PostStatus, PostTitle, PublishDate, SourceId, Tag,
};
