//! Access VLAN migration.

use log::info;

use crate::device::DeviceSession;
use crate::error::Result;
use crate::parsers::{SwitchportRecord, switchport};

/// Move an access port from VLAN `from` to `to`.
///
/// Applies to ports configured as static access that are up in access
/// mode or down. The dead-server reinitialize VLAN follows the access VLAN.
pub fn plan(interface: &str, record: &SwitchportRecord, from: u16, to: u16) -> Option<Vec<String>> {
    if !record.is_access() || record.access_vlan != Some(from) {
        return None;
    }
    Some(vec![
        format!("interface {interface}"),
        format!("switchport access vlan {to}"),
        format!("authentication event server dead action reinitialize vlan {to}"),
    ])
}

/// Migrate every matching access port. Returns the interfaces changed.
pub async fn migrate<D: DeviceSession>(device: Option<&mut D>, from: u16, to: u16) -> Result<Vec<String>> {
    let Some(device) = device else {
        return Ok(Vec::new());
    };
    device.connect().await?;
    let records = switchport::parse(&device.execute(switchport::COMMAND).await?)?;

    let mut changed = Vec::new();
    for (interface, record) in &records {
        let Some(commands) = plan(interface, record, from, to) else {
            continue;
        };
        info!("{}: {} vlan {} -> {}", device.name(), interface, from, to);
        device.configure(&commands).await?;
        changed.push(interface.clone());
    }
    Ok(changed)
}
