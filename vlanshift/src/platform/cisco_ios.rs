//! Cisco IOS / IOS-XE platform definition.
//!
//! ```text
//! switch>                  exec
//! switch#                  privilege_exec
//! switch(config)#          configuration
//! switch(config-if)#       configuration (sub-mode)
//! ```
//!
//! ```text
//! exec --enable--> privilege_exec --configure terminal--> configuration
//!      <-disable--                <--------end-----------
//! ```

use super::{PlatformDefinition, PrivilegeLevel};
use crate::error::{ChannelError, Result};

/// Build the IOS platform definition.
pub fn platform() -> Result<PlatformDefinition> {
    let exec = PrivilegeLevel::root("exec", r"(?mi)^[\w.\-@/:]{1,63}>\s?$")
        .map_err(ChannelError::InvalidPattern)?;

    let privilege_exec = PrivilegeLevel::child(
        "privilege_exec",
        r"(?mi)^[\w.\-@/:]{1,63}#\s?$",
        "exec",
        "enable",
        "disable",
    )
    .and_then(|level| level.with_password_prompt(r"(?mi)^(?:enable\s)?password:\s?$"))
    .map_err(ChannelError::InvalidPattern)?
    .excluding("(conf");

    let configuration = PrivilegeLevel::child(
        "configuration",
        r"(?mi)^[\w.\-@/:]{1,63}\(conf[\w.\-@/:+]{0,32}\)#\s?$",
        "privilege_exec",
        "configure terminal",
        "end",
    )
    .map_err(ChannelError::InvalidPattern)?;

    Ok(PlatformDefinition::new("cisco_iosxe")
        .with_privilege(exec)
        .with_privilege(privilege_exec)
        .with_privilege(configuration)
        .with_default_privilege("privilege_exec")
        .with_config_privilege("configuration")
        .with_failure_pattern("% Invalid input")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Unknown command")
        .with_failure_pattern("% Error")
        .with_on_open_command("terminal length 0")
        .with_on_open_command("terminal width 511")
        .with_terminal_size(511, 24))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let platform = platform().unwrap();
        assert_eq!(platform.name, "cisco_iosxe");
        let names: Vec<_> = platform.privilege_levels.keys().cloned().collect();
        assert_eq!(names, vec!["exec", "privilege_exec", "configuration"]);
        assert_eq!(platform.default_privilege, "privilege_exec");
        assert_eq!(platform.config_privilege, "configuration");
    }

    #[test]
    fn test_prompt_matching() {
        let platform = platform().unwrap();
        let exec = platform.get_privilege("exec").unwrap();
        let privileged = platform.get_privilege("privilege_exec").unwrap();
        let config = platform.get_privilege("configuration").unwrap();

        assert!(exec.matches("access-sw01>"));
        assert!(!exec.matches("access-sw01#"));

        assert!(privileged.matches("access-sw01#"));
        assert!(privileged.matches("core.lab#"));
        assert!(!privileged.matches("access-sw01(config)#"));

        assert!(config.matches("access-sw01(config)#"));
        assert!(config.matches("access-sw01(config-if)#"));
        assert!(config.matches("access-sw01(config-subif)#"));
        assert!(!config.matches("access-sw01#"));
    }

    #[test]
    fn test_enable_requires_password() {
        let platform = platform().unwrap();
        let privileged = platform.get_privilege("privilege_exec").unwrap();
        let prompt = privileged
            .entry
            .as_ref()
            .and_then(|entry| entry.password_prompt.as_ref())
            .unwrap();
        assert!(prompt.is_match(b"Password: "));
        assert!(prompt.is_match(b"enable password:"));
    }

    #[test]
    fn test_on_open_commands() {
        let platform = platform().unwrap();
        assert_eq!(
            platform.on_open_commands,
            vec!["terminal length 0", "terminal width 511"]
        );
        assert!(platform.detect_failure("% Invalid input detected").is_some());
    }
}
