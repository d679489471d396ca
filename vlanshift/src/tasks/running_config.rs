//! Retrieve the running configuration.

use crate::device::DeviceSession;
use crate::error::Result;
use crate::parsers::{ConfigTree, running_config};

/// Fetch and parse `show running-config`.
pub async fn learn<D: DeviceSession>(device: Option<&mut D>) -> Result<Option<ConfigTree>> {
    let Some(device) = device else {
        return Ok(None);
    };
    device.connect().await?;
    let output = device.execute(running_config::COMMAND).await?;
    Ok(Some(ConfigTree::parse(&output)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::mock::ScriptedDevice;

    #[tokio::test]
    async fn test_learn() {
        let mut device = ScriptedDevice::new("sw1").with_output(
            "show running-config",
            "hostname sw1\n!\ninterface Vlan1\n ip address 10.0.0.2 255.255.255.0\n!\nend\n",
        );
        let tree = learn(Some(&mut device)).await.unwrap().unwrap();
        assert!(tree.contains("hostname sw1"));
        assert!(tree.interface("Vlan1").unwrap().contains("ip address 10.0.0.2 255.255.255.0"));
        assert_eq!(device.connects, 1);
    }

    #[tokio::test]
    async fn test_absent_device() {
        assert!(learn::<ScriptedDevice>(None).await.unwrap().is_none());
    }
}
