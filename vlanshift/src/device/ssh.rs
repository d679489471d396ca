//! SSH-backed device.

use std::time::Duration;

use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};

use super::DeviceSession;
use crate::driver::{Dialog, Driver, DriverBuilder, GenericDriver};
use crate::error::{DriverError, Result};
use crate::inventory::DeviceSpec;
use crate::transport::ConnectOptions;

/// A device from the inventory, connected on first use.
///
/// The driver is created by the first [`DeviceSession::connect`] and kept
/// for the rest of the process; every later call runs on the same shell.
pub struct Device {
    spec: DeviceSpec,
    options: ConnectOptions,
    driver: Option<GenericDriver>,
}

impl Device {
    pub fn new(spec: DeviceSpec) -> Self {
        Self {
            spec,
            options: ConnectOptions::default(),
            driver: None,
        }
    }

    /// Timeout and host key handling for the session.
    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self
    }

    /// Connect and per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.options.timeout
    }

    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }

    pub fn role(&self) -> &str {
        &self.spec.role
    }

    /// Management address used for SSH.
    pub fn address(&self) -> &str {
        &self.spec.connection.address
    }

    pub fn is_connected(&self) -> bool {
        self.driver.as_ref().is_some_and(Driver::is_open)
    }

    /// Close the session if one is open.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut driver) = self.driver.take() {
            driver.close().await?;
        }
        Ok(())
    }

    fn build_driver(&self) -> Result<GenericDriver> {
        let credentials = &self.spec.credentials;
        let mut builder = DriverBuilder::new(&self.spec.connection.address)
            .port(self.spec.connection.port)
            .username(&credentials.username)
            .platform(self.spec.platform)
            .options(self.options.clone());
        if let Some(password) = &credentials.password {
            builder = builder.password_secret(copy_secret(password));
        }
        if let Some(enable) = &credentials.enable {
            builder = builder.enable_secret(copy_secret(enable));
        }
        builder.build()
    }

    fn driver_mut(&mut self) -> Result<&mut GenericDriver> {
        self.driver
            .as_mut()
            .ok_or_else(|| DriverError::NotConnected.into())
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

fn rejected(command: &str, message: String) -> crate::Error {
    DriverError::CommandFailed {
        command: command.to_string(),
        message,
    }
    .into()
}

impl DeviceSession for Device {
    fn name(&self) -> &str {
        &self.spec.name
    }

    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        let mut driver = self.build_driver()?;
        driver.open().await?;
        info!("{}: session open", self.spec.name);
        self.driver = Some(driver);
        Ok(())
    }

    async fn execute(&mut self, command: &str) -> Result<String> {
        self.connect().await?;
        debug!("{}: {}", self.spec.name, command);
        self.driver_mut()?.send_command(command).await?.into_result()
    }

    async fn execute_dialog(&mut self, command: &str, dialog: &Dialog) -> Result<String> {
        self.connect().await?;
        debug!("{}: {} (dialog)", self.spec.name, command);
        let result = self.driver_mut()?.send_dialog(command, dialog).await?;
        match result.failure_message {
            Some(message) => Err(rejected(command, message)),
            None => Ok(result.output),
        }
    }

    async fn configure(&mut self, commands: &[String]) -> Result<String> {
        self.connect().await?;
        debug!("{}: configuring {} lines", self.spec.name, commands.len());
        let responses = self.driver_mut()?.send_config(commands).await?;

        let mut output = Vec::with_capacity(responses.len());
        for response in responses {
            if let Some(message) = response.failure_message {
                return Err(rejected(&response.command, message));
            }
            if !response.result.is_empty() {
                output.push(response.result);
            }
        }
        Ok(output.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Testbed;

    const TESTBED: &str = "
testbed:
  credentials:
    default: { username: admin, password: secret }
devices:
  sw1:
    os: iosxe
    role: switch
    connections:
      ssh: { protocol: ssh, ip: 10.0.0.2, port: 2222 }
";

    fn device() -> Device {
        let testbed = Testbed::from_yaml_str(TESTBED).unwrap();
        let spec = testbed.device_specs().unwrap().remove(0);
        Device::new(spec)
    }

    #[test]
    fn test_descriptor_accessors() {
        let device = device();
        assert_eq!(device.name(), "sw1");
        assert_eq!(device.role(), "switch");
        assert_eq!(device.address(), "10.0.0.2");
        assert!(!device.is_connected());
    }

    #[test]
    fn test_driver_built_from_descriptor() {
        let driver = device().build_driver().unwrap();
        assert!(!driver.is_open());
        assert_eq!(driver.platform().name, "cisco_iosxe");
    }

    #[test]
    fn test_timeout_reaches_driver() {
        let device = device();
        assert_eq!(device.timeout(), ConnectOptions::default().timeout);

        let device = device.with_timeout(Duration::from_secs(5));
        let driver = device.build_driver().unwrap();
        assert_eq!(driver.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_disconnect_without_session() {
        let mut device = device();
        tokio_test::block_on(device.disconnect()).unwrap();
        assert!(!device.is_connected());
    }
}
