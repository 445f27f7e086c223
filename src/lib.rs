//! Deterministic publication pipeline for Markdown-with-math blog posts.
//!
//! Raw content units are parsed, revisions of the same article are collapsed
//! into one canonical post, cross-references are resolved and the result is
//! ordered into a publication set for an external renderer.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
