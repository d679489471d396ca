//! What the SSH layer needs to reach one inventory device.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Handling of host keys that are new or have changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HostKeyPolicy {
    /// Only hosts already in known_hosts.
    Strict,

    /// Record first-seen keys, refuse changed ones.
    #[default]
    AcceptNew,

    /// Accept any key. Lab devices that get rebuilt.
    Off,
}

/// Session settings shared by every device in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Connect and per-command timeout.
    pub timeout: Duration,
    pub host_keys: HostKeyPolicy,
    /// `~/.ssh/known_hosts` when unset.
    pub known_hosts: Option<PathBuf>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            host_keys: HostKeyPolicy::default(),
            known_hosts: None,
        }
    }
}

/// SSH endpoint and login of one device.
///
/// Testbeds carry passwords only; without one the `none` method is tried.
#[derive(Debug)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<SecretString>,
    pub options: ConnectOptions,
    /// PTY columns and rows.
    pub terminal: (u32, u32),
    /// Bytes from the end of the output searched for prompts.
    pub search_depth: usize,
}

impl SshConfig {
    /// `host:port`, for logging.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        self.options.timeout
    }
}
