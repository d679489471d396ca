//! Device sessions.
//!
//! [`DeviceSession`] is the surface the migration tasks are written
//! against: connect, run a show command, run a command that asks
//! questions, and push a configuration batch. [`Device`] implements it
//! over SSH; tests implement it with scripted output.

mod ssh;

pub use ssh::Device;

use std::future::Future;

use crate::driver::Dialog;
use crate::error::Result;

/// A device that tasks can inspect and configure.
pub trait DeviceSession: Send {
    /// Inventory name of the device.
    fn name(&self) -> &str;

    /// Establish the session. Later calls reuse it.
    fn connect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Run an exec command and return its output.
    ///
    /// Output that contains one of the platform's error markers is an error.
    fn execute(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send;

    /// Run an exec command, answering prompts with `dialog`.
    fn execute_dialog(
        &mut self,
        command: &str,
        dialog: &Dialog,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Apply a batch of configuration lines.
    ///
    /// The first rejected line fails the batch. Lines before it stay applied.
    fn configure(&mut self, commands: &[String]) -> impl Future<Output = Result<String>> + Send;
}
