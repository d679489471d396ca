//! CLI modes and how the driver moves between them.

use regex::bytes::Regex;

/// The way into a mode from its parent, and back out.
#[derive(Debug, Clone)]
pub struct ModeEntry {
    pub parent: String,
    /// `enable`, `configure terminal`.
    pub enter: String,
    /// `disable`, `end`.
    pub leave: String,
    /// Password prompt `enter` may raise.
    pub password_prompt: Option<Regex>,
}

/// One CLI mode, recognized by its prompt.
///
/// The mode a login lands in has no [`ModeEntry`]; every other mode hangs
/// off a parent, which makes the modes a tree.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    pub name: String,
    pub pattern: Regex,
    pub entry: Option<ModeEntry>,
    /// Prompts containing this belong to a deeper mode (`(conf` under `#`).
    pub excludes: Option<String>,
}

impl PrivilegeLevel {
    /// The login mode.
    pub fn root(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            entry: None,
            excludes: None,
        })
    }

    /// A mode reached from `parent` with `enter` and left with `leave`.
    pub fn child(
        name: impl Into<String>,
        pattern: &str,
        parent: impl Into<String>,
        enter: impl Into<String>,
        leave: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            entry: Some(ModeEntry {
                parent: parent.into(),
                enter: enter.into(),
                leave: leave.into(),
                password_prompt: None,
            }),
            ..Self::root(name, pattern)?
        })
    }

    /// Entering this mode may ask for a password. No-op on the login mode.
    pub fn with_password_prompt(mut self, pattern: &str) -> Result<Self, regex::Error> {
        if let Some(entry) = &mut self.entry {
            entry.password_prompt = Some(Regex::new(pattern)?);
        }
        Ok(self)
    }

    pub fn excluding(mut self, marker: impl Into<String>) -> Self {
        self.excludes = Some(marker.into());
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.entry.as_ref().map(|entry| entry.parent.as_str())
    }

    /// Check if a prompt belongs to this mode.
    pub fn matches(&self, prompt: &str) -> bool {
        if self.excludes.as_deref().is_some_and(|marker| prompt.contains(marker)) {
            return false;
        }
        self.pattern.is_match(prompt.as_bytes())
    }
}
