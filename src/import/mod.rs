//! Bulk word import.
//!
//! Raw text is split into terms, then each term of the batch is sent to the
//! content provider one after another.

pub mod parse;
pub mod pipeline;

pub use parse::parse_terms;
pub use pipeline::{ImportPipeline, ImportProgress, ImportReport};
