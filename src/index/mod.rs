//! In-memory bidirectional token index.

mod token_index;

pub use token_index::TokenIndex;
