//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait that enables easy and flexible pipeline creation.
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod wikidoc;

pub use pipeline::Pipeline;
pub use wikidoc::WikiDoc;
