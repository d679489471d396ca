//! Error types for vlanshift.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for vlanshift operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Testbed / inventory errors
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// CLI output that could not be turned into structured data
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// One or more devices stopped on an error during a run
    #[error("Run failed on {}", .devices.join(", "))]
    RunFailed { devices: Vec<String> },
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// The host is not in known_hosts and strict checking is enabled
    #[error("Host key for {host}:{port} is not known")]
    HostKeyUnknown { host: String, port: u16 },

    /// The host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (pattern matching, PTY operations).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Pattern matching timed out
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (command execution, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Driver not connected
    #[error("Driver not connected - call open() first")]
    NotConnected,

    /// Driver already connected
    #[error("Driver already connected")]
    AlreadyConnected,

    /// The device reported an error for a command
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// Platform definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// No built-in platform for this OS name
    #[error("Unsupported platform '{name}'")]
    Unsupported { name: String },
}

/// Testbed loading and lookup errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Testbed or plan file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Testbed or plan YAML is malformed
    #[error("Malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A device has no usable connection
    #[error("Device '{device}' has no connection with an address")]
    NoConnection { device: String },

    /// Neither the device nor the testbed defines credentials
    #[error("Device '{device}' has no credentials")]
    NoCredentials { device: String },

    /// The device OS has no platform definition
    #[error("Device '{device}' uses unsupported os '{os}'")]
    UnsupportedPlatform { device: String, os: String },
}

/// Structured parsing errors.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Expected content was missing from the output
    #[error("'{command}' output has no {what}")]
    Missing { command: String, what: String },

    /// A numeric field did not parse
    #[error("Invalid number '{value}' in '{command}' output")]
    InvalidNumber { command: String, value: String },

    /// The TextFSM template could not be compiled or run
    #[error("Template for '{command}' failed: {message}")]
    Template { command: String, message: String },
}

/// Result type alias using vlanshift's Error.
pub type Result<T> = std::result::Result<T, Error>;
