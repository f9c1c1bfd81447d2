/*! Article transformers.

Annotates articles with information derived from their content.
!*/

mod annotate;
mod script_tagger;

pub use annotate::{Annotate, Annotator};
pub use script_tagger::ScriptTagger;
