/*! Script-labeled Wikipedia dataset pipeline.
!*/
mod pipeline;
pub mod types;

pub use pipeline::{load_articles, needs_run, LoadStats, Report, WikiDoc};
pub use types::Article;
