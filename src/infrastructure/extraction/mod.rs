//! Extraction infrastructure module

mod openai;

pub use openai::{build_instruction, OpenAiExtractor};
