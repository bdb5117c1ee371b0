//! Text tokenization shared by the indexing and query paths.

mod tokenizer;

pub use tokenizer::Tokenizer;
