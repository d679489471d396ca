//! Sub-interface dot1Q VLAN migration.

use log::{debug, info};

use crate::device::DeviceSession;
use crate::error::Result;
use crate::parsers::{InterfaceDetail, interface, ip_interface_brief};

/// Re-tag a dot1Q sub-interface from `from` to `to` as the native VLAN.
pub fn plan(detail: &InterfaceDetail, from: u16, to: u16) -> Option<Vec<String>> {
    if detail.dot1q_vlan() != Some(from) {
        return None;
    }
    Some(vec![
        format!("interface {}", detail.name),
        format!("encapsulation dot1Q {to} native"),
    ])
}

/// Migrate every sub-interface tagged `from`. Returns the interfaces changed.
pub async fn migrate<D: DeviceSession>(device: Option<&mut D>, from: u16, to: u16) -> Result<Vec<String>> {
    let Some(device) = device else {
        return Ok(Vec::new());
    };
    device.connect().await?;
    let brief = ip_interface_brief::parse(&device.execute(ip_interface_brief::COMMAND).await?)?;

    let mut changed = Vec::new();
    for row in brief.iter().filter(|row| row.is_subinterface()) {
        debug!("{}: inspecting {}", device.name(), row.interface);
        let detail = interface::parse(&device.execute(&interface::command(&row.interface)).await?)?;
        let Some(commands) = plan(&detail, from, to) else {
            continue;
        };
        info!("{}: {} dot1Q {} -> {}", device.name(), detail.name, from, to);
        device.configure(&commands).await?;
        changed.push(detail.name);
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Encapsulation;
    use crate::tasks::mock::ScriptedDevice;

    fn detail(encapsulation: Option<Encapsulation>) -> InterfaceDetail {
        InterfaceDetail {
            name: "GigabitEthernet0/0.1".to_string(),
            oper_status: "up".to_string(),
            line_protocol: "up".to_string(),
            encapsulation,
        }
    }

    #[test]
    fn test_plan() {
        let matching = detail(Some(Encapsulation::Dot1q {
            first: 1,
            second: None,
        }));
        assert_eq!(
            plan(&matching, 1, 128).unwrap(),
            vec!["interface GigabitEthernet0/0.1", "encapsulation dot1Q 128 native"]
        );
        assert_eq!(plan(&matching, 20, 128), None);
        assert_eq!(plan(&detail(Some(Encapsulation::Other("ARPA".into()))), 1, 128), None);
        assert_eq!(plan(&detail(None), 1, 128), None);
    }

    #[tokio::test]
    async fn test_migrate_only_subinterfaces() {
        let brief = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     10.0.0.1        YES NVRAM  up                    up
GigabitEthernet0/0.1   10.1.1.1        YES manual up                    up
GigabitEthernet0/0.20  10.20.0.1       YES manual up                    up
";
        let mut device = ScriptedDevice::new("rtr1")
            .with_output("show ip interface brief", brief)
            .with_output(
                "show interfaces GigabitEthernet0/0.1",
                "GigabitEthernet0/0.1 is up, line protocol is up\n  Encapsulation 802.1Q Virtual LAN, Vlan ID  1.\n",
            )
            .with_output(
                "show interfaces GigabitEthernet0/0.20",
                "GigabitEthernet0/0.20 is up, line protocol is up\n  Encapsulation 802.1Q Virtual LAN, Vlan ID  20.\n",
            );
        let changed = migrate(Some(&mut device), 1, 128).await.unwrap();
        assert_eq!(changed, vec!["GigabitEthernet0/0.1"]);
        assert!(!device.executed.contains(&"show interfaces GigabitEthernet0/0".to_string()));
        assert_eq!(device.configured().len(), 2);
    }
}
