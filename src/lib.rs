pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod filtering;
pub mod identifiers;
pub mod io;
pub mod pipelines;
pub mod processing;
pub mod publish;
pub mod transformers;

#[cfg(test)]
pub(crate) mod testing;
