//! Shared functionality
//!
//! This crate supplies the pieces that the source trackers and the tokenizer both need: the
//! options, the errors, the placeholder grammar written by the escaping pass, positions and the
//! warnings collector.
//!

pub mod config;
pub mod errors;
pub mod placeholder;
pub mod position;
pub mod warnings;
