//! Replace one global configuration line.

use log::{debug, info};

use crate::device::DeviceSession;
use crate::error::Result;

pub const DEFAULT_SEARCH: &str = "ip tacacs source-interface Vlan1";
pub const DEFAULT_REPLACEMENT: &str = "ip tacacs source-interface Vlan128";

/// Filtered show command used to look for `search`.
pub fn command(search: &str) -> String {
    format!("show running-config | include {search}")
}

/// `no <search>` followed by `<replacement>` when `output` contains `search`.
pub fn plan(output: &str, search: &str, replacement: &str) -> Option<[String; 2]> {
    output
        .contains(search)
        .then(|| [format!("no {search}"), replacement.to_string()])
}

/// Swap `search` for `replacement` if the running config has it.
///
/// The two lines go out as separate configuration batches. Returns whether
/// anything was changed.
pub async fn apply<D: DeviceSession>(
    device: Option<&mut D>,
    search: &str,
    replacement: &str,
) -> Result<bool> {
    let Some(device) = device else {
        return Ok(false);
    };
    device.connect().await?;
    let output = device.execute(&command(search)).await?;
    debug!("{}: output of {:?}: {:?}", device.name(), search, output);

    let Some([remove, add]) = plan(&output, search, replacement) else {
        return Ok(false);
    };
    device.configure(&[remove]).await?;
    device.configure(&[add]).await?;
    info!("{}: replaced {:?} with {:?}", device.name(), search, replacement);
    Ok(true)
}
