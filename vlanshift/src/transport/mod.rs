//! SSH transport layer wrapping russh.
//!
//! Connection setup, authentication, the interactive PTY shell, and
//! pattern-driven reads from it.

pub mod config;
mod ssh;

pub use config::{ConnectOptions, HostKeyPolicy, SshConfig};
pub use ssh::SshTransport;
