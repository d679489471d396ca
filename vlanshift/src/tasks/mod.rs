//! VLAN migration tasks.
//!
//! Every task is a pure planning function that turns parsed device state
//! into configuration lines, plus an async procedure that reads the state
//! from a [`DeviceSession`](crate::device::DeviceSession) and applies the
//! plan. Procedures take `Option<&mut D>`; `None` does nothing.

pub mod access;
pub mod encapsulation;
pub mod running_config;
pub mod search_replace;
pub mod snapshot;
pub mod svi;
pub mod trunk;

pub use svi::SviOutcome;
pub use trunk::TrunkPolicy;
