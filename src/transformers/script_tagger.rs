//! Script tagging.
use crate::identifiers::detect_scripts;
use crate::pipelines::wikidoc::types::Article;

use super::Annotate;

/// Sets the `script` field of articles to the scripts detected in their text.
#[derive(Default)]
pub struct ScriptTagger;

impl Annotate<Article> for ScriptTagger {
    fn annotate(&self, doc: &mut Article) {
        let script = detect_scripts(doc.text());
        doc.set_script(script);
    }
}
