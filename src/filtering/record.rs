//! Article-level filtering.
use crate::pipelines::wikidoc::types::Article;

use super::Filter;

/// Filters out articles that have too few whitespace-delimited tokens.
///
/// Stubs, redirects and disambiguation leftovers are usually caught by this.
/// An article is kept if it has *strictly more* than [MinTokens::min_tokens] tokens.
pub struct MinTokens {
    min_tokens: usize,
}

impl MinTokens {
    pub fn new(min_tokens: usize) -> Self {
        Self { min_tokens }
    }

    /// Get a reference to the filter's token threshold.
    pub fn min_tokens(&self) -> &usize {
        &self.min_tokens
    }
}

impl Filter<&Article> for MinTokens {
    fn detect(&self, article: &Article) -> bool {
        // avoid counting every token of long articles
        article
            .text()
            .split_whitespace()
            .nth(self.min_tokens)
            .is_some()
    }
}

impl Default for MinTokens {
    /// Articles need at least 11 tokens.
    fn default() -> Self {
        Self { min_tokens: 10 }
    }
}
