//! Response type for command execution results.

use std::time::Duration;

use crate::error::{DriverError, Result};

/// Response from a command execution.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// Output with the command echo and trailing prompt removed.
    pub result: String,

    /// Output as received.
    pub raw_result: String,

    /// Prompt matched at the end of the output.
    pub prompt: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,

    /// Failure marker found in the output, if any.
    pub failure_message: Option<String>,
}

impl Response {
    /// Create a new successful response.
    pub fn new(
        command: impl Into<String>,
        result: impl Into<String>,
        raw_result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
            raw_result: raw_result.into(),
            prompt: prompt.into(),
            elapsed,
            failure_message: None,
        }
    }

    /// Mark the response as failed.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.failure_message.is_none()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }

    /// The output, or `CommandFailed` if the device rejected the command.
    pub fn into_result(self) -> Result<String> {
        match self.failure_message {
            None => Ok(self.result),
            Some(message) => Err(DriverError::CommandFailed {
                command: self.command,
                message,
            }
            .into()),
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        let ok = Response::new("show clock", "10:00", "", "sw#", Duration::ZERO);
        assert!(ok.is_success());
        assert_eq!(ok.into_result().unwrap(), "10:00");

        let failed = Response::new("shw clock", "% Invalid input", "", "sw#", Duration::ZERO)
            .with_failure("% Invalid input");
        let err = failed.into_result().unwrap_err();
        assert!(err.to_string().contains("shw clock"));
    }
}
