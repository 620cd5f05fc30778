//! A perfect hash function generated by `build.rs`, for testing codegen end to end.

mod words;

pub use words::{word, COUNT};

/// Maps each of the [`COUNT`] words to a distinct index.
pub static WORDS: chd::Phf = include!(concat!(env!("OUT_DIR"), "/words.rs"));
