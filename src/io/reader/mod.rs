/*! Article reading utilities
!*/
pub mod corpus;
pub mod docreader;

pub use corpus::Corpus;
pub use docreader::DocReader;
