//! Structured parsers for IOS show commands.
//!
//! Each parser takes the normalized command output (no echo, no prompt)
//! and returns owned records. The show command parsers run TextFSM
//! templates from `res/templates/` and map the rows into typed records;
//! lines the templates do not match are ignored.

pub mod interface;
pub mod ip_interface_brief;
mod naming;
pub mod running_config;
pub mod switchport;
mod template;

pub use interface::{Encapsulation, InterfaceDetail};
pub use ip_interface_brief::IpInterfaceBrief;
pub use naming::expand_interface_name;
pub use running_config::ConfigTree;
pub use switchport::SwitchportRecord;
