//! Platform definition for a device family.

use indexmap::IndexMap;
use memchr::memchr;

use super::privilege_level::PrivilegeLevel;

/// Prompts, modes, and error markers of one device family.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g. "cisco_iosxe").
    pub name: String,

    /// Privilege levels in detection order.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Level the driver settles in after login.
    pub default_privilege: String,

    /// Level used for configuration batches.
    pub config_privilege: String,

    /// Output substrings that mark a command as failed.
    pub failed_when_contains: Vec<String>,

    /// Commands run right after login.
    pub on_open_commands: Vec<String>,

    /// PTY width.
    pub terminal_width: u32,

    /// PTY height.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            config_privilege: String::new(),
            failed_when_contains: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    pub fn with_default_privilege(mut self, name: impl Into<String>) -> Self {
        self.default_privilege = name.into();
        self
    }

    pub fn with_config_privilege(mut self, name: impl Into<String>) -> Self {
        self.config_privilege = name.into();
        self
    }

    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    pub fn get_privilege(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(name)
    }

    /// First failure marker contained in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|marker| output.contains(marker.as_str()))
            .map(String::as_str)
    }

    /// Strip the echoed command and the trailing prompt line from raw output.
    pub fn normalize_output(&self, raw: &str, command: &str) -> String {
        let text = raw.replace("\r\n", "\n").replace('\r', "");

        // The echo is the first line and ends with the command text.
        let body = match memchr(b'\n', text.as_bytes()) {
            Some(pos) if !command.is_empty() && text[..pos].trim_end().ends_with(command) => {
                &text[pos + 1..]
            }
            _ => text.as_str(),
        };

        let body = body.trim_end_matches('\n');
        match body.rfind('\n') {
            Some(pos) => body[..pos].to_string(),
            // Only the prompt came back.
            None => String::new(),
        }
    }
}
