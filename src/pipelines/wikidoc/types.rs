//! Article type.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::{ScriptSet, SCRIPT_SEPARATOR};

/// An extracted Wikipedia article.
///
/// `text` is the only field the pipeline reads. Every other field produced by the extractor
/// (`id`, `revid`, `url`, `title`...) is kept in `fields` and written back as is.
/// `script` is empty until the article has been tagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    text: String,
    #[serde(default)]
    script: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Article {
    pub fn new(text: String, fields: Map<String, Value>) -> Self {
        Self {
            text,
            script: String::new(),
            fields,
        }
    }

    /// Get a reference to the article's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the `", "`-joined script label.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Get the script label as a set.
    ///
    /// Fails if the label contains an unknown script name.
    pub fn scripts(&self) -> Result<ScriptSet, crate::error::Error> {
        self.script.parse()
    }

    pub(crate) fn set_script(&mut self, script: String) {
        self.script = script;
    }

    /// Number of whitespace-delimited tokens in the text.
    pub fn nb_tokens(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Get a reference to the pass-through fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }

    /// Whether the article is written in more than one script.
    pub fn is_multiscript(&self) -> bool {
        self.script.contains(SCRIPT_SEPARATOR)
    }
}
