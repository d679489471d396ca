//! # vlanshift
//!
//! VLAN and SVI migrations for Cisco IOS switches and routers over SSH.
//!
//! vlanshift reads a testbed file, picks devices by role, and runs a plan
//! of migration tasks against each one in turn: moving access ports and
//! sub-interfaces to a new VLAN, fixing trunk allowed lists, replacing
//! global configuration lines, snapshotting the running config to flash,
//! and moving an SVI's configuration to a new VLAN interface.
//!
//! ## Layers
//!
//! - [`transport`]: russh session with a PTY shell
//! - [`channel`]: prompt search over the tail of the output
//! - [`platform`] and [`driver`]: prompts, privilege levels, configuration
//!   mode, and interactive dialogs
//! - [`device`]: the [`DeviceSession`] the tasks run against
//! - [`parsers`]: structured IOS show command output
//! - [`tasks`] and [`orchestrator`]: the migrations and the runner
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vlanshift::{Inventory, Orchestrator, Plan, RunContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vlanshift::Error> {
//!     let mut inventory = Inventory::load("./res/testbeds/testbed.yaml")?;
//!     let orchestrator = Orchestrator::new(Plan::default(), RunContext::today());
//!
//!     let report = orchestrator.run(&mut inventory).await;
//!     for device in &report.devices {
//!         for (task, outcome) in &device.outcomes {
//!             println!("{}: {}: {}", device.device, task, outcome);
//!         }
//!     }
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod device;
pub mod driver;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod parsers;
pub mod platform;
pub mod tasks;
pub mod transport;
pub mod vlan;

// Re-export main types for convenience
pub use device::{Device, DeviceSession};
pub use driver::{Dialog, Driver, DriverBuilder, GenericDriver, Response, Statement};
pub use error::{Error, Result};
pub use inventory::{DeviceSpec, Inventory, Testbed};
pub use orchestrator::{Orchestrator, Plan, RunContext, RunReport, Task, TaskOutcome};
pub use platform::{Platform, PlatformDefinition, PrivilegeLevel};
pub use transport::{ConnectOptions, HostKeyPolicy, SshConfig};
pub use vlan::VlanSet;
