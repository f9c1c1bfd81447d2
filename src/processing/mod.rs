/*! Dataset processing

Splitting, packaging and statistics of tagged articles.
!*/
pub mod frequency;
pub mod package;
pub mod split;

pub use frequency::{calculate_script_frequencies, FrequencyMode, ScriptFrequencies};
pub use package::DatasetDict;
pub use split::{SplitName, SplitRatios, Splits};
