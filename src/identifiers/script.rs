//! Writing systems and the Unicode blocks they are recognised by.
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const DEVANAGARI: &[RangeInclusive<char>] = &['\u{0900}'..='\u{097F}'];
const ROMAN: &[RangeInclusive<char>] = &['A'..='Z', 'a'..='z'];
const KANNADA: &[RangeInclusive<char>] = &['\u{0C80}'..='\u{0CFF}'];
const MALAYALAM: &[RangeInclusive<char>] = &['\u{0D00}'..='\u{0D7F}'];
const PERSO_ARABIC: &[RangeInclusive<char>] = &['\u{0600}'..='\u{06FF}'];
// Goykanadi is historically significant but barely used today.
const GOYKANADI: &[RangeInclusive<char>] = &['\u{A8E0}'..='\u{A8FF}'];

/// A writing system that can be found in Konkani text.
///
/// Ordering follows declaration order, which is also the order
/// used when rendering a set of scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Script {
    Devanagari,
    Roman,
    Kannada,
    Malayalam,
    PersoArabic,
    Goykanadi,
}

impl Script {
    pub const ALL: [Script; 6] = [
        Script::Devanagari,
        Script::Roman,
        Script::Kannada,
        Script::Malayalam,
        Script::PersoArabic,
        Script::Goykanadi,
    ];

    /// Label used in the `script` field of articles.
    pub fn name(&self) -> &'static str {
        match self {
            Script::Devanagari => "devanagari",
            Script::Roman => "roman",
            Script::Kannada => "kannada",
            Script::Malayalam => "malayalam",
            Script::PersoArabic => "perso-arabic",
            Script::Goykanadi => "goykanadi",
        }
    }

    /// Inclusive codepoint ranges reserved for the script.
    pub fn ranges(&self) -> &'static [RangeInclusive<char>] {
        match self {
            Script::Devanagari => DEVANAGARI,
            Script::Roman => ROMAN,
            Script::Kannada => KANNADA,
            Script::Malayalam => MALAYALAM,
            Script::PersoArabic => PERSO_ARABIC,
            Script::Goykanadi => GOYKANADI,
        }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.ranges().iter().any(|range| range.contains(&c))
    }

    /// Get the script a codepoint belongs to, if any.
    ///
    /// Ranges are disjoint so there is at most one.
    #[inline]
    pub fn of(c: char) -> Option<Script> {
        Script::ALL.into_iter().find(|script| script.contains(c))
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Script::ALL
            .into_iter()
            .find(|script| script.name() == s)
            .ok_or_else(|| Error::Custom(format!("unknown script: {:?}", s)))
    }
}
