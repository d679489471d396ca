//! `show interfaces switchport`.
//!
//! ```text
//! Name: Gi1/0/1
//! Switchport: Enabled
//! Administrative Mode: trunk
//! Operational Mode: trunk
//! Access Mode VLAN: 1 (default)
//! Trunking Native Mode VLAN: 1 (default)
//! Trunking VLANs Enabled: 800-900,128
//! ```

use indexmap::IndexMap;

use super::naming::expand_interface_name;
use super::template::{self, field};
use crate::error::{ParseError, Result};
use crate::vlan::VlanSet;

pub const COMMAND: &str = "show interfaces switchport";

/// Layer-2 state of one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchportRecord {
    /// `Switchport: Enabled`.
    pub switchport_enabled: bool,

    /// Administrative mode, lower-cased (`trunk`, `static access`, `dynamic auto`).
    pub switchport_mode: String,

    /// Operational mode, lower-cased (`trunk`, `static access`, `down`).
    pub operational_mode: String,

    /// Access VLAN.
    pub access_vlan: Option<u16>,

    /// Native VLAN of the trunk.
    pub native_vlan: Option<u16>,

    /// Allowed trunk VLANs as printed, e.g. `800-900,128` or `all`.
    pub trunk_vlans: String,
}

impl SwitchportRecord {
    /// Both administratively and operationally a trunk.
    pub fn is_trunk(&self) -> bool {
        self.operational_mode == "trunk" && self.switchport_mode == "trunk"
    }

    /// Configured as an access port that is either up in access mode or down.
    pub fn is_access(&self) -> bool {
        self.switchport_mode == "static access"
            && matches!(self.operational_mode.as_str(), "static access" | "down")
    }

    /// Expanded allowed trunk VLANs.
    pub fn trunk_vlan_set(&self) -> Result<VlanSet> {
        VlanSet::parse(&self.trunk_vlans)
    }
}

/// Parse the output into records keyed by full interface name.
pub fn parse(output: &str) -> Result<IndexMap<String, SwitchportRecord>> {
    let unwrapped = join_wrapped_vlan_lists(output);
    let rows = template::records(COMMAND, template::SHOW_INTERFACES_SWITCHPORT, &unwrapped)?;

    let mut records = IndexMap::new();
    for row in &rows {
        let Some(name) = field(row, "interface") else {
            continue;
        };
        let record = SwitchportRecord {
            switchport_enabled: field(row, "switchport")
                .is_some_and(|v| v.eq_ignore_ascii_case("enabled")),
            switchport_mode: field(row, "switchport_mode").map(mode).unwrap_or_default(),
            operational_mode: field(row, "operational_mode").map(mode).unwrap_or_default(),
            access_vlan: leading_vlan(field(row, "access_vlan").unwrap_or_default())?,
            native_vlan: leading_vlan(field(row, "native_vlan").unwrap_or_default())?,
            trunk_vlans: field(row, "trunk_vlans")
                .unwrap_or_default()
                .to_ascii_lowercase(),
        };
        records.insert(expand_interface_name(name), record);
    }
    Ok(records)
}

/// Long allowed lists wrap onto bare continuation lines; fold them back
/// onto their `Trunking VLANs` line so the template sees one value.
fn join_wrapped_vlan_lists(output: &str) -> String {
    let mut joined = String::with_capacity(output.len());
    let mut in_trunk_list = false;
    for line in output.lines() {
        let line = line.trim_end();
        if in_trunk_list && is_vlan_list(line) {
            joined.push_str(line.trim());
            continue;
        }
        in_trunk_list = line.starts_with("Trunking VLANs");
        if !joined.is_empty() {
            joined.push('\n');
        }
        joined.push_str(line);
    }
    joined.push('\n');
    joined
}

/// `trunk (member of bundle Po1)` → `trunk`.
fn mode(value: &str) -> String {
    value
        .split(" (")
        .next()
        .unwrap_or(value)
        .trim()
        .to_ascii_lowercase()
}

/// `1 (default)` → `Some(1)`; `none` → `None`.
fn leading_vlan(value: &str) -> Result<Option<u16>> {
    let Some(token) = value.split_whitespace().next() else {
        return Ok(None);
    };
    if !token.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }
    token.parse().map(Some).map_err(|_| {
        ParseError::InvalidNumber {
            command: COMMAND.to_string(),
            value: token.to_string(),
        }
        .into()
    })
}

fn is_vlan_list(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '-')
}
