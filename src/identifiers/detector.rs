//! Script detection by Unicode range membership.
//!
//! A script is detected as soon as a single character of the text belongs to it:
//! this is an existence check, not a majority vote.
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use super::script::Script;
use crate::error::Error;

/// Separator used when scripts are joined in a single label.
pub const SCRIPT_SEPARATOR: &str = ", ";

/// Deduplicated set of scripts, iterated in [Script] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSet(BTreeSet<Script>);

impl ScriptSet {
    pub fn insert(&mut self, script: Script) -> bool {
        self.0.insert(script)
    }

    pub fn contains(&self, script: &Script) -> bool {
        self.0.contains(script)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Script> {
        self.0.iter()
    }
}

impl FromIterator<Script> for ScriptSet {
    fn from_iter<I: IntoIterator<Item = Script>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders as the `", "` joined label stored in articles.
impl fmt::Display for ScriptSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(SCRIPT_SEPARATOR))
    }
}

/// Parses a joined label back. The empty string is the empty set.
impl FromStr for ScriptSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(SCRIPT_SEPARATOR)
            .filter(|name| !name.is_empty())
            .map(Script::from_str)
            .collect()
    }
}

/// Get the set of scripts present in `text`.
pub fn detect(text: &str) -> ScriptSet {
    let mut found = ScriptSet::default();
    for script in text.chars().filter_map(Script::of) {
        found.insert(script);

        // nothing left to find
        if found.len() == Script::ALL.len() {
            break;
        }
    }
    found
}

/// Get the scripts present in `text` as a single `", "`-joined label.
///
/// Returns an empty string when no character belongs to a known script.
pub fn detect_scripts(text: &str) -> String {
    detect(text).to_string()
}
