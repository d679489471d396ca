//! Channel layer: output buffering, ANSI stripping, and prompt matching.

mod buffer;
mod patterns;

pub use buffer::PatternBuffer;
pub use patterns::{PromptPattern, last_line};
