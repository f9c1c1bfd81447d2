/*! Script identification

Articles are tagged with the writing systems they contain, using fixed Unicode blocks
(see [Script::ranges]).
!*/
mod detector;
mod script;

pub use detector::{detect, detect_scripts, ScriptSet, SCRIPT_SEPARATOR};
pub use script::Script;
