//! Tokenizer for escaped CSS
//!
//! The tokenizer is the front end of the optimizer pipeline. It takes CSS in which comments,
//! strings and urls have been replaced by placeholders, and produces a tree of selectors,
//! at-rules, blocks and declarations, optionally annotated with the position every token had in
//! the original sources.
//!
use cssfront_shared::config::Options;
use cssfront_shared::warnings::Warnings;
use cssfront_sourcemap::{InputSourceMapTracker, SourceTracker};

pub mod at_rule;
pub mod extract;
pub mod location;
pub mod tokenizer;
pub mod tokens;
pub mod walker;

pub use tokenizer::Tokenizer;
pub use tokens::{Metadata, SelectorPart, Token};

/// The objects a tokenizer works with. One set of collaborators belongs to a single job.
#[derive(Clone, Debug, Default)]
pub struct Collaborators {
    /// Required. Maps offsets in the input back to the stored files.
    pub source_tracker: Option<SourceTracker>,
    /// Required when positions are tracked
    pub input_source_map_tracker: Option<InputSourceMapTracker>,
    pub options: Options,
    /// Receives every warning of the job
    pub warnings: Warnings,
}
