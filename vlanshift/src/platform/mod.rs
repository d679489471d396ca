//! Platform definitions.
//!
//! A platform describes how a device family prompts, which modes it has,
//! and which output means a command was rejected.

pub mod cisco_ios;
mod definition;
mod privilege_level;

pub use definition::PlatformDefinition;
pub use privilege_level::{ModeEntry, PrivilegeLevel};

use std::fmt;
use std::str::FromStr;

use crate::error::{PlatformError, Result};

/// Built-in platforms, selected by the testbed `os` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Cisco IOS and IOS-XE.
    CiscoIos,
}

impl Platform {
    /// Build the platform definition.
    pub fn definition(self) -> Result<PlatformDefinition> {
        match self {
            Platform::CiscoIos => cisco_ios::platform(),
        }
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(os: &str) -> std::result::Result<Self, Self::Err> {
        match os.to_ascii_lowercase().as_str() {
            "ios" | "iosxe" | "cisco_ios" | "cisco_iosxe" => Ok(Platform::CiscoIos),
            _ => Err(PlatformError::Unsupported {
                name: os.to_string(),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::CiscoIos => write!(f, "cisco_iosxe"),
        }
    }
}
