//! Device driver: commands, configuration batches, and dialogs over SSH.

mod builder;
mod dialog;
mod generic;
mod privilege;
mod response;

pub use builder::DriverBuilder;
pub use dialog::{Dialog, DialogResult, DialogStep, Statement, StatementAction, StatementMatch};
pub use generic::GenericDriver;
pub use privilege::{PrivilegeManager, Transition};
pub use response::Response;

use std::future::Future;

use crate::error::Result;

/// Trait for device drivers.
pub trait Driver: Send {
    /// Open the connection and settle in the platform's default privilege.
    fn open(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Send a command and wait for the prompt.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Send commands in configuration mode.
    ///
    /// Enters the configuration privilege, sends each line, and returns to
    /// the privilege level the driver was in. Stops at the first line the
    /// device rejects; nothing already applied is undone.
    ///
    /// ```rust,no_run
    /// use vlanshift::driver::Driver;
    ///
    /// # async fn example(driver: &mut impl Driver) -> Result<(), vlanshift::Error> {
    /// let responses = driver
    ///     .send_config(&[
    ///         "interface Vlan128".to_string(),
    ///         "description Management".to_string(),
    ///     ])
    ///     .await?;
    /// assert!(responses.iter().all(|r| r.is_success()));
    /// # Ok(())
    /// # }
    /// ```
    fn send_config(
        &mut self,
        commands: &[String],
    ) -> impl Future<Output = Result<Vec<Response>>> + Send;

    /// Send a command that may ask questions, answering them with `dialog`.
    fn send_dialog(
        &mut self,
        command: &str,
        dialog: &Dialog,
    ) -> impl Future<Output = Result<DialogResult>> + Send;

    /// Move to the named privilege level.
    fn acquire_privilege(&mut self, privilege: &str) -> impl Future<Output = Result<()>> + Send;

    /// Whether `open()` succeeded and `close()` has not been called.
    fn is_open(&self) -> bool;

    /// Whether the SSH session is still running.
    fn is_alive(&self) -> bool;

    /// Name of the current privilege level.
    fn current_privilege(&self) -> Option<&str>;
}
