//! Prompt pattern helpers.

use memchr::memrchr;
use regex::bytes::Regex;

use crate::error::{ChannelError, Result};

/// One regex matching the prompt of every privilege level of a platform.
#[derive(Debug, Clone)]
pub struct PromptPattern {
    regex: Regex,
}

impl PromptPattern {
    /// Join per-level prompt patterns into a single alternation.
    pub fn combine<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let joined = patterns
            .into_iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&joined).map_err(ChannelError::InvalidPattern)?;
        Ok(Self { regex })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The prompt text at the end of `data`, if the output ends in one.
    pub fn trailing_prompt(&self, data: &[u8]) -> Option<String> {
        let line = last_line(data);
        self.regex
            .is_match(line)
            .then(|| String::from_utf8_lossy(line).trim().to_string())
    }
}

/// Last non-empty line of `data`, without line terminators.
pub fn last_line(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end > 0 && matches!(data[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let trimmed = &data[..end];
    match memrchr(b'\n', trimmed) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}
