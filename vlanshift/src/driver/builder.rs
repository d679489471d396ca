//! Builder for creating device drivers.

use std::time::Duration;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::error::{DriverError, Result};
use crate::platform::{Platform, PlatformDefinition};
use crate::transport::{ConnectOptions, SshConfig};

/// Builder for constructing device drivers.
///
/// ```rust,no_run
/// use vlanshift::driver::{Driver, DriverBuilder};
/// use vlanshift::platform::Platform;
///
/// # async fn example() -> Result<(), vlanshift::Error> {
/// let mut driver = DriverBuilder::new("10.0.0.2")
///     .username("admin")
///     .password("secret")
///     .platform(Platform::CiscoIos)
///     .build()?;
/// driver.open().await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<SecretString>,
    enable_secret: Option<SecretString>,
    platform: Option<PlatformDefinition>,
    platform_kind: Option<Platform>,
    options: ConnectOptions,
    search_depth: usize,
}

impl DriverBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            enable_secret: None,
            platform: None,
            platform_kind: None,
            options: ConnectOptions::default(),
            search_depth: 1000,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Use an already-wrapped password.
    pub fn password_secret(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Secret for `enable`. Defaults to the login password.
    pub fn enable_secret(mut self, secret: SecretString) -> Self {
        self.enable_secret = Some(secret);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform_kind = Some(platform);
        self
    }

    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Timeout and host key handling.
    pub fn options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Connect and per-command timeout (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Bytes from the end of the output searched for prompts (default: 1000).
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Build the driver without connecting.
    pub fn build(self) -> Result<GenericDriver> {
        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "username is required".to_string(),
        })?;

        let platform = match (self.platform, self.platform_kind) {
            (Some(custom), _) => custom,
            (None, Some(kind)) => kind.definition()?,
            (None, None) => {
                return Err(DriverError::InvalidConfig {
                    message: "platform must be specified".to_string(),
                }
                .into());
            }
        };

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            password: self.password,
            options: self.options,
            terminal: (platform.terminal_width, platform.terminal_height),
            search_depth: self.search_depth,
        };

        GenericDriver::new(ssh_config, platform, self.enable_secret)
    }
}
