//! Annotate trait
use crate::pipelines::wikidoc::types::Article;

/// Annotations provide contextual information about content.
pub trait Annotate<T = Article> {
    fn annotate(&self, doc: &mut T);
}

/// Annotator enables annotation chaining, adding multiple annotators and
/// doing the annotation process in one step.
pub struct Annotator<T>(Vec<Box<dyn Annotate<T>>>);

impl<T> Annotator<T> {
    pub fn add(&mut self, annotator: Box<dyn Annotate<T>>) -> &mut Annotator<T> {
        self.0.push(annotator);
        self
    }
}

impl<T> Annotate<T> for Annotator<T> {
    fn annotate(&self, doc: &mut T) {
        for annotator in &self.0 {
            annotator.annotate(doc);
        }
    }
}

impl<T> Default for Annotator<T> {
    fn default() -> Self {
        Self(vec![])
    }
}
