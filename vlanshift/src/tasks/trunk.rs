//! Trunk allowed-VLAN normalization.

use log::{debug, info};

use crate::device::DeviceSession;
use crate::error::Result;
use crate::parsers::{SwitchportRecord, switchport};

/// What every trunk should carry and what it must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrunkPolicy {
    /// Added to the allowed list when missing.
    pub required_vlan: u16,

    /// Removed from the allowed list when present.
    pub pruned_vlan: u16,
}

impl Default for TrunkPolicy {
    fn default() -> Self {
        Self {
            required_vlan: 128,
            pruned_vlan: 1,
        }
    }
}

/// Configuration for one interface, or `None` if it needs nothing.
///
/// Only ports that are trunks both administratively and operationally are
/// considered. An allowed list of `all` has no explicit members, so it gets
/// the required VLAN added and nothing removed.
pub fn plan(
    interface: &str,
    record: &SwitchportRecord,
    policy: &TrunkPolicy,
) -> Result<Option<Vec<String>>> {
    if !record.is_trunk() {
        return Ok(None);
    }
    let allowed = record.trunk_vlan_set()?;
    debug!("{} allowed vlans: {}", interface, allowed);

    let mut commands = vec![format!("interface {interface}")];
    if !allowed.contains(policy.required_vlan) {
        commands.push(format!(
            "switchport trunk allowed vlan add {}",
            policy.required_vlan
        ));
    }
    if allowed.contains(policy.pruned_vlan) {
        commands.push(format!(
            "switchport trunk allowed vlan remove {}",
            policy.pruned_vlan
        ));
    }
    Ok((commands.len() > 1).then_some(commands))
}

/// Apply `policy` to every trunk. Returns the interfaces changed.
pub async fn normalize<D: DeviceSession>(
    device: Option<&mut D>,
    policy: &TrunkPolicy,
) -> Result<Vec<String>> {
    let Some(device) = device else {
        return Ok(Vec::new());
    };
    device.connect().await?;
    let records = switchport::parse(&device.execute(switchport::COMMAND).await?)?;

    let mut changed = Vec::new();
    for (interface, record) in &records {
        let Some(commands) = plan(interface, record, policy)? else {
            continue;
        };
        info!("{}: {:?}", device.name(), commands);
        device.configure(&commands).await?;
        changed.push(interface.clone());
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::mock::ScriptedDevice;

    fn trunk(vlans: &str) -> SwitchportRecord {
        SwitchportRecord {
            switchport_enabled: true,
            switchport_mode: "trunk".to_string(),
            operational_mode: "trunk".to_string(),
            access_vlan: Some(1),
            native_vlan: Some(1),
            trunk_vlans: vlans.to_string(),
        }
    }

    #[test]
    fn test_add_then_remove() {
        let commands = plan("GigabitEthernet1/0/1", &trunk("1,800-900"), &TrunkPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            commands,
            vec![
                "interface GigabitEthernet1/0/1",
                "switchport trunk allowed vlan add 128",
                "switchport trunk allowed vlan remove 1",
            ]
        );
    }

    #[test]
    fn test_compliant_trunk_needs_nothing() {
        let plan = plan("Gi1", &trunk("800-900,128"), &TrunkPolicy::default()).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn test_all_only_adds() {
        let commands = plan("Gi1", &trunk("all"), &TrunkPolicy::default())
            .unwrap()
            .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], "switchport trunk allowed vlan add 128");
    }

    #[test]
    fn test_requires_both_modes() {
        let mut record = trunk("1");
        record.operational_mode = "down".to_string();
        assert_eq!(plan("Gi1", &record, &TrunkPolicy::default()).unwrap(), None);

        let mut record = trunk("1");
        record.switchport_mode = "dynamic auto".to_string();
        assert_eq!(plan("Gi1", &record, &TrunkPolicy::default()).unwrap(), None);
    }

    #[test]
    fn test_custom_policy() {
        let policy = TrunkPolicy {
            required_vlan: 200,
            pruned_vlan: 999,
        };
        let commands = plan("Gi1", &trunk("1,200"), &policy).unwrap();
        assert_eq!(commands, None);
    }

    #[tokio::test]
    async fn test_normalize_device() {
        let output = "\
Name: Gi1/0/1
Switchport: Enabled
Administrative Mode: trunk
Operational Mode: trunk
Trunking VLANs Enabled: 1,800-900

Name: Gi1/0/2
Switchport: Enabled
Administrative Mode: trunk
Operational Mode: trunk
Trunking VLANs Enabled: 128

Name: Gi1/0/3
Switchport: Enabled
Administrative Mode: static access
Operational Mode: static access
Access Mode VLAN: 1 (default)
";
        let mut device = ScriptedDevice::new("sw1").with_output("show interfaces switchport", output);
        let changed = normalize(Some(&mut device), &TrunkPolicy::default()).await.unwrap();
        assert_eq!(changed, vec!["GigabitEthernet1/0/1"]);
        assert_eq!(device.batches.len(), 1);
        assert_eq!(device.batches[0][0], "interface GigabitEthernet1/0/1");
    }
}
