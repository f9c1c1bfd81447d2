/*! Filtering utilities

Filters operate on article level and implement [Filter].
! */
mod filter;
mod record;

pub use filter::Filter;
pub use record::MinTokens;
